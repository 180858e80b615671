use log::info;

use super::{ArgumentContract, Call, CommandSpec, Requirement, display_name, io_failure};
use crate::error::{Result, ShellError};
use crate::eval::CommandContext;
use crate::fs::EntryKind;

pub struct CdSpec;

impl CommandSpec for CdSpec {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn usage(&self) -> &'static str {
        "cd [DIR]"
    }

    fn summary(&self) -> &'static str {
        "Change the working directory. With no argument, go home."
    }

    fn contract(&self) -> ArgumentContract {
        ArgumentContract::uniform(0, Some(1), Requirement::MustResolveToDirectory)
    }

    fn run(&self, call: &Call, ctx: &mut CommandContext<'_>) -> Result<String> {
        let target = match call.paths().first() {
            Some(path) => path.to_path_buf(),
            None => ctx.session.home().to_path_buf(),
        };
        ctx.session.change_dir(&target)?;
        Ok(String::new())
    }
}

pub struct PwdSpec;

impl CommandSpec for PwdSpec {
    fn name(&self) -> &'static str {
        "pwd"
    }

    fn usage(&self) -> &'static str {
        "pwd"
    }

    fn summary(&self) -> &'static str {
        "Print the working directory."
    }

    fn contract(&self) -> ArgumentContract {
        ArgumentContract::uniform(0, Some(0), Requirement::NoPathCheck)
    }

    fn run(&self, _call: &Call, ctx: &mut CommandContext<'_>) -> Result<String> {
        Ok(ctx.session.cwd().display().to_string())
    }
}

pub struct MkdirSpec;

impl CommandSpec for MkdirSpec {
    fn name(&self) -> &'static str {
        "mkdir"
    }

    fn usage(&self) -> &'static str {
        "mkdir DIR..."
    }

    fn summary(&self) -> &'static str {
        "Create directories, including missing parents."
    }

    fn contract(&self) -> ArgumentContract {
        ArgumentContract::uniform(1, None, Requirement::MustBeSingleton)
    }

    fn run(&self, call: &Call, ctx: &mut CommandContext<'_>) -> Result<String> {
        let fs = ctx.fs();
        for path in call.paths() {
            if fs.stat(path) != EntryKind::Missing {
                return Err(ShellError::execution(format!(
                    "mkdir: cannot create directory {}: already exists",
                    display_name(path)
                )));
            }
            fs.create_dir(path)
                .map_err(|e| io_failure("mkdir", "create directory", path, e))?;
            info!("mkdir: {}", path.display());
        }
        Ok(String::new())
    }
}
