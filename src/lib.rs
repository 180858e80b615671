//! fsh: a small line-oriented filesystem shell.
//!
//! A line is split into piped stages, each stage's path arguments are
//! classified (Singleton or Wildcard) and checked against the command's
//! [`ArgumentContract`](crate::commands::ArgumentContract), and the stages run
//! in order with each one's text output feeding the next. The last stage's
//! output is printed or redirected to a file.
//!
//! # Architecture
//!
//! - **[`parse`]**: Line parsing: pipe splitting, redirection, tokenizer, stage types.
//! - **[`path`]**: Path classification, resolution against the working directory, wildcard expansion.
//! - **[`eval`]**: Command registry, argument binding, the interpreter [`Session`](crate::eval::Session).
//! - **[`commands`]**: Command specs: cp, mv, rm, rmdir, mkdir, cd, pwd, ls, cat, more, help, args, date, exit.
//! - **[`config`]**: Configuration loading: embedded defaults + user overlay merge.
//! - **[`logging`]**: Session log at `~/.local/share/fsh/fsh.log`.

/// Command spec trait and the built-in command set.
pub mod commands;
/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Console port for prompts, paging and notices.
pub mod console;
/// `ShellError` and `PathError`.
pub mod error;
/// Registry, binding and session state.
pub mod eval;
/// Filesystem port.
pub mod fs;
/// File-based session logging.
pub mod logging;
/// Line parsing: pipes, redirection, tokens, stage types.
pub mod parse;
/// Path classification, resolution and wildcard expansion.
pub mod path;

use console::Console;
use eval::Session;

/// Build the registry from default config and run one line.
///
/// This is the main entry point for tests and simple usage.
/// For the interactive shell with user config, build the registry directly.
pub fn run_line(line: &str, session: &mut Session, console: &mut dyn Console) -> error::Result<()> {
    let config = config::Config::default_config();
    let registry = eval::CommandRegistry::from_config(&config);
    registry.run_line(line, session, console)
}
