use log::debug;

use super::{ArgumentContract, Call, CommandSpec, Requirement, display_name, io_failure};
use crate::error::{Result, ShellError};
use crate::eval::CommandContext;
use crate::fs::EntryKind;

pub struct CatSpec;

impl CatSpec {
    /// Collect console lines until the sentinel or end of input.
    fn read_interactive(ctx: &mut CommandContext<'_>) -> Result<String> {
        let sentinel = ctx.settings.cat_sentinel.as_str();
        ctx.console
            .write(&format!("Accepting input from user: (type '{sentinel}' to terminate)"));

        let mut text = String::new();
        loop {
            let line = ctx
                .console
                .read_line("")
                .map_err(|e| ShellError::execution(format!("cat: cannot read input: {e}")))?;
            match line {
                Some(line) if line != sentinel => {
                    text.push_str(&line);
                    text.push('\n');
                }
                _ => break,
            }
        }
        debug!("cat: read {} byte(s) interactively", text.len());
        Ok(text)
    }
}

impl CommandSpec for CatSpec {
    fn name(&self) -> &'static str {
        "cat"
    }

    fn usage(&self) -> &'static str {
        "cat [PATH...]"
    }

    fn summary(&self) -> &'static str {
        "Concatenate files. With no argument, echo piped input or read lines until the stop word."
    }

    fn contract(&self) -> ArgumentContract {
        ArgumentContract::uniform(0, None, Requirement::MustBeSingletonOrWildcard)
    }

    fn run(&self, call: &Call, ctx: &mut CommandContext<'_>) -> Result<String> {
        if call.args.is_empty() {
            return match &call.piped {
                Some(piped) => Ok(piped.clone()),
                None => Self::read_interactive(ctx),
            };
        }

        let fs = ctx.fs();
        let mut text = String::new();
        for path in call.paths() {
            match fs.stat(path) {
                EntryKind::Dir => {
                    return Err(ShellError::execution(format!(
                        "cat: {}: Is a directory",
                        display_name(path)
                    )));
                }
                EntryKind::Missing => {
                    return Err(ShellError::execution(format!(
                        "cat: {}: No such file or directory",
                        display_name(path)
                    )));
                }
                EntryKind::File => {
                    let contents = fs
                        .read_to_string(path)
                        .map_err(|e| io_failure("cat", "read", path, e))?;
                    text.push_str(&contents);
                }
            }
        }
        Ok(text)
    }
}
