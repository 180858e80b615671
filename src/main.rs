//! fsh: interactive filesystem shell.
//!
//! Usage:
//!   fsh                  read lines from stdin until `exit` or end of input
//!   fsh -c LINE          run one line and exit
//!   fsh --dump-config    print the merged configuration as TOML

use clap::Parser;
use fsh::config::Config;
use fsh::console::{Console, StdConsole};
use fsh::eval::{CommandRegistry, Session};

#[derive(Parser, Debug)]
#[command(version, about = "Line-oriented filesystem shell", long_about = None)]
struct Cli {
    /// Run one line and exit
    #[arg(short = 'c', value_name = "LINE", conflicts_with = "dump_config")]
    command: Option<String>,

    /// Print the merged configuration as TOML and exit
    #[arg(long)]
    dump_config: bool,
}

// ─── Entry point ─────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    let config = Config::load();

    if cli.dump_config {
        match config.to_toml() {
            Ok(text) => print!("{text}"),
            Err(e) => {
                eprintln!("fsh: cannot render config: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    fsh::logging::init(&config.settings.log_level);

    let mut session = match Session::from_env() {
        Ok(session) => session,
        Err(e) => {
            eprintln!("fsh: cannot determine working directory: {e}");
            std::process::exit(1);
        }
    };
    let registry = CommandRegistry::from_config(&config);
    let mut console = StdConsole;

    match cli.command {
        None => repl(&registry, &mut session, &mut console),
        Some(line) => {
            if let Err(e) = registry.run_line(&line, &mut session, &mut console)
                && !e.is_halt()
            {
                console.warn(&format!("fsh: {e}"));
                std::process::exit(1);
            }
        }
    }
}

// ─── Read loop ───────────────────────────────────────

fn repl(registry: &CommandRegistry, session: &mut Session, console: &mut dyn Console) {
    log::info!("session start in {}", session.cwd().display());
    loop {
        let prompt = format!("{} : ", session.cwd().display());
        let line = match console.read_line(&prompt) {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                console.warn(&format!("fsh: cannot read input: {e}"));
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match registry.run_line(&line, session, console) {
            Ok(()) => {}
            Err(e) if e.is_halt() => break,
            Err(e) => console.warn(&format!("fsh: {e}")),
        }
    }
    log::info!("session end");
}
