//! The command set: one `CommandSpec` per supported command.
//!
//! Each spec declares an [`ArgumentContract`] that the parser and binder
//! enforce before `run` is ever called, so `run` only sees arguments that are
//! already resolved to absolute paths (or literal words).

/// `cat`: concatenate files, piped input, or interactive lines.
pub mod cat;
/// `cp` and `mv`.
pub mod copy;
/// `cd`, `pwd`, `mkdir`.
pub mod dirs;
/// `help`, `args`, `date`, `exit`.
pub mod info;
/// `ls`.
pub mod list;
/// `more` and its pager state machine.
pub mod more;
/// `rm` and `rmdir`, with the recursive-delete confirmation.
pub mod remove;

use std::path::{Path, PathBuf};

use crate::error::{Result, ShellError};
use crate::eval::CommandContext;

/// What a single argument position must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// A literal word, not a path (e.g. the command name given to `help`).
    NoPathCheck,
    /// Exactly one path; wildcards are rejected.
    MustBeSingleton,
    /// One path, or a wildcard expanded to every match.
    MustBeSingletonOrWildcard,
    /// One path naming an existing directory.
    MustResolveToDirectory,
}

impl Requirement {
    pub fn is_path(self) -> bool {
        self != Requirement::NoPathCheck
    }

    pub fn allows_wildcard(self) -> bool {
        self == Requirement::MustBeSingletonOrWildcard
    }
}

/// How requirements are laid out across argument positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgShape {
    /// Every argument carries the same requirement.
    Uniform(Requirement),
    /// All but the last argument are sources; the last is the destination.
    /// Several sources, or a directory source, need a directory destination.
    SourcesThenDestination {
        sources: Requirement,
        destination: Requirement,
    },
}

/// Declared argument contract of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentContract {
    pub min: usize,
    /// `None` means unbounded.
    pub max: Option<usize>,
    /// Options the command accepts, e.g. `-r`.
    pub flags: &'static [&'static str],
    pub shape: ArgShape,
}

impl ArgumentContract {
    pub const fn uniform(min: usize, max: Option<usize>, requirement: Requirement) -> Self {
        Self {
            min,
            max,
            flags: &[],
            shape: ArgShape::Uniform(requirement),
        }
    }

    pub const fn with_flags(mut self, flags: &'static [&'static str]) -> Self {
        self.flags = flags;
        self
    }

    /// Requirement for the operand at `index` out of `count`.
    pub fn requirement(&self, index: usize, count: usize) -> Requirement {
        match self.shape {
            ArgShape::Uniform(r) => r,
            ArgShape::SourcesThenDestination {
                sources,
                destination,
            } => {
                if index + 1 == count {
                    destination
                } else {
                    sources
                }
            }
        }
    }

    /// Human-readable arity, e.g. `"at least 2"` or `"0 to 1"`.
    pub fn arity(&self) -> String {
        match self.max {
            None => format!("at least {}", self.min),
            Some(max) if max == self.min => format!("exactly {max}"),
            Some(max) => format!("{} to {max}", self.min),
        }
    }
}

/// An argument after resolution against the live working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedArgument {
    Literal(String),
    /// A Singleton, as an absolute path.
    Path(PathBuf),
    /// A Wildcard's matches, in listing order.
    Expanded(Vec<PathBuf>),
}

impl ResolvedArgument {
    pub fn paths(&self) -> &[PathBuf] {
        match self {
            ResolvedArgument::Literal(_) => &[],
            ResolvedArgument::Path(p) => std::slice::from_ref(p),
            ResolvedArgument::Expanded(ps) => ps,
        }
    }
}

/// A bound stage: what a command's `run` receives.
#[derive(Debug, Clone, Default)]
pub struct Call {
    pub command: String,
    pub flags: Vec<String>,
    pub args: Vec<ResolvedArgument>,
    /// Captured output of the previous stage, if any.
    pub piped: Option<String>,
}

impl Call {
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    /// All paths across all arguments, flattened in order.
    pub fn paths(&self) -> Vec<&Path> {
        self.args
            .iter()
            .flat_map(|a| a.paths().iter().map(PathBuf::as_path))
            .collect()
    }

    /// The literal at `index`, if that argument is a literal.
    pub fn literal(&self, index: usize) -> Option<&str> {
        match self.args.get(index) {
            Some(ResolvedArgument::Literal(s)) => Some(s),
            _ => None,
        }
    }
}

/// Help metadata for one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpEntry {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
}

/// Trait for command implementations.
///
/// Implementations return the command's textual output, which the executor
/// pipes to the next stage, prints, or writes to a redirection target.
pub trait CommandSpec: Send + Sync {
    fn name(&self) -> &'static str;

    /// One-line synopsis, e.g. `cp SOURCE... DEST`.
    fn usage(&self) -> &'static str;

    fn summary(&self) -> &'static str;

    fn contract(&self) -> ArgumentContract;

    fn run(&self, call: &Call, ctx: &mut CommandContext<'_>) -> Result<String>;

    fn help_entry(&self) -> HelpEntry {
        HelpEntry {
            name: self.name(),
            usage: self.usage(),
            summary: self.summary(),
        }
    }
}

/// Final component of a path for messages, falling back to the full path.
pub(crate) fn display_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => crate::error::display_arg(&name.to_string_lossy()),
        None => path.display().to_string(),
    }
}

/// Wrap an I/O failure as `"{cmd}: cannot {action} {name}: {err}"`.
pub(crate) fn io_failure(cmd: &str, action: &str, path: &Path, err: std::io::Error) -> ShellError {
    ShellError::execution(format!("{cmd}: cannot {action} {}: {err}", display_name(path)))
}

/// Shared sandbox for command unit tests.
#[cfg(test)]
pub(crate) mod harness {
    use std::path::PathBuf;

    use super::{Call, CommandSpec, HelpEntry, ResolvedArgument};
    use crate::config::Settings;
    use crate::console::ScriptedConsole;
    use crate::error::Result;
    use crate::eval::{CommandContext, Session};
    use crate::fs::{FileSystem, OsFileSystem};

    pub struct Harness {
        pub tmp: tempfile::TempDir,
        pub session: Session,
        pub console: ScriptedConsole,
        pub settings: Settings,
        pub catalogue: Vec<HelpEntry>,
    }

    impl Harness {
        pub fn new() -> Self {
            Self::with_input(Vec::<String>::new())
        }

        pub fn with_input<I, S>(input: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            let tmp = tempfile::tempdir().unwrap();
            let session = Session::new(tmp.path(), tmp.path(), Box::new(OsFileSystem));
            Self {
                tmp,
                session,
                console: ScriptedConsole::new(input),
                settings: Settings::default(),
                catalogue: Vec::new(),
            }
        }

        /// Swap the session's filesystem, keeping the sandbox as cwd and home.
        pub fn with_fs(mut self, fs: impl FileSystem + 'static) -> Self {
            self.session = Session::new(self.tmp.path(), self.tmp.path(), Box::new(fs));
            self
        }

        pub fn path(&self, rel: &str) -> PathBuf {
            self.tmp.path().join(rel)
        }

        pub fn file(&self, rel: &str, contents: &str) -> PathBuf {
            let path = self.path(rel);
            std::fs::write(&path, contents).unwrap();
            path
        }

        pub fn dir(&self, rel: &str) -> PathBuf {
            let path = self.path(rel);
            std::fs::create_dir_all(&path).unwrap();
            path
        }

        /// A call whose arguments are the given sandbox-relative paths.
        pub fn call(&self, command: &str, flags: &[&str], rels: &[&str]) -> Call {
            Call {
                command: command.into(),
                flags: flags.iter().map(|f| f.to_string()).collect(),
                args: rels
                    .iter()
                    .map(|r| ResolvedArgument::Path(self.path(r)))
                    .collect(),
                piped: None,
            }
        }

        pub fn run(&mut self, spec: &dyn CommandSpec, call: &Call) -> Result<String> {
            let mut ctx = CommandContext {
                session: &mut self.session,
                console: &mut self.console,
                catalogue: &self.catalogue,
                settings: &self.settings,
            };
            spec.run(call, &mut ctx)
        }
    }
}
