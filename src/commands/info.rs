use chrono::{Local, NaiveDateTime};

use super::{ArgumentContract, Call, CommandSpec, HelpEntry, Requirement};
use crate::error::{Result, ShellError, display_arg};
use crate::eval::CommandContext;

const OPTIONAL_COMMAND: ArgumentContract = ArgumentContract::uniform(0, Some(1), Requirement::NoPathCheck);
const NO_ARGUMENTS: ArgumentContract = ArgumentContract::uniform(0, Some(0), Requirement::NoPathCheck);

/// Entries selected by an optional command-name argument.
fn select<'a>(cmd: &str, call: &Call, catalogue: &'a [HelpEntry]) -> Result<Vec<&'a HelpEntry>> {
    match call.literal(0) {
        None => Ok(catalogue.iter().collect()),
        Some(name) => catalogue
            .iter()
            .find(|e| e.name == name)
            .map(|e| vec![e])
            .ok_or_else(|| {
                ShellError::argument(format!(
                    "{cmd}: {} is not a supported command",
                    display_arg(name)
                ))
            }),
    }
}

pub struct HelpSpec;

impl CommandSpec for HelpSpec {
    fn name(&self) -> &'static str {
        "help"
    }

    fn usage(&self) -> &'static str {
        "help [COMMAND]"
    }

    fn summary(&self) -> &'static str {
        "Describe one command, or all of them."
    }

    fn contract(&self) -> ArgumentContract {
        OPTIONAL_COMMAND
    }

    fn run(&self, call: &Call, ctx: &mut CommandContext<'_>) -> Result<String> {
        let entries = select(self.name(), call, ctx.catalogue)?;
        Ok(entries
            .iter()
            .map(|e| format!("{}\n    {}", e.usage, e.summary))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

pub struct ArgsSpec;

impl CommandSpec for ArgsSpec {
    fn name(&self) -> &'static str {
        "args"
    }

    fn usage(&self) -> &'static str {
        "args [COMMAND]"
    }

    fn summary(&self) -> &'static str {
        "Show the argument synopsis of one command, or all of them."
    }

    fn contract(&self) -> ArgumentContract {
        OPTIONAL_COMMAND
    }

    fn run(&self, call: &Call, ctx: &mut CommandContext<'_>) -> Result<String> {
        let entries = select(self.name(), call, ctx.catalogue)?;
        Ok(entries
            .iter()
            .map(|e| e.usage)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

/// `Thu, 15 Oct 2026 09:30:00`
pub fn format_date(at: &NaiveDateTime) -> String {
    at.format("%a, %-d %b %Y %H:%M:%S").to_string()
}

pub struct DateSpec;

impl CommandSpec for DateSpec {
    fn name(&self) -> &'static str {
        "date"
    }

    fn usage(&self) -> &'static str {
        "date"
    }

    fn summary(&self) -> &'static str {
        "Print the local date and time."
    }

    fn contract(&self) -> ArgumentContract {
        NO_ARGUMENTS
    }

    fn run(&self, _call: &Call, _ctx: &mut CommandContext<'_>) -> Result<String> {
        Ok(format_date(&Local::now().naive_local()))
    }
}

pub struct ExitSpec;

impl CommandSpec for ExitSpec {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn usage(&self) -> &'static str {
        "exit"
    }

    fn summary(&self) -> &'static str {
        "Leave the shell."
    }

    fn contract(&self) -> ArgumentContract {
        NO_ARGUMENTS
    }

    fn run(&self, _call: &Call, _ctx: &mut CommandContext<'_>) -> Result<String> {
        Err(ShellError::Halt)
    }
}
