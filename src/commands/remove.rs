use std::path::Path;

use log::{info, warn};

use super::{ArgumentContract, Call, CommandSpec, Requirement, display_name, io_failure};
use crate::console::Console;
use crate::error::{Result, ShellError};
use crate::eval::CommandContext;
use crate::fs::EntryKind;

/// Answer to a yes/no prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// First character `y` or `Y`.
    Proceed,
    /// First character `n` or `N`.
    Declined,
    /// Anything else, including end of input.
    Aborted,
}

/// Ask once; there is no retry on an unrecognised answer.
pub fn confirm(console: &mut dyn Console, prompt: &str) -> Confirmation {
    match console.read_line(prompt) {
        Ok(Some(answer)) => match answer.chars().next() {
            Some('y' | 'Y') => Confirmation::Proceed,
            Some('n' | 'N') => Confirmation::Declined,
            _ => Confirmation::Aborted,
        },
        Ok(None) => Confirmation::Aborted,
        Err(e) => {
            warn!("confirmation prompt failed: {e}");
            Confirmation::Aborted
        }
    }
}

/// `rm` and `rmdir`.
pub struct RemoveSpec {
    directories_only: bool,
}

impl RemoveSpec {
    pub fn rm() -> Self {
        Self {
            directories_only: false,
        }
    }

    pub fn rmdir() -> Self {
        Self {
            directories_only: true,
        }
    }

    fn remove_directory(&self, path: &Path, recursive: bool, ctx: &mut CommandContext<'_>) -> Result<()> {
        let cmd = self.name();
        let fs = ctx.session.fs();
        let empty = fs
            .list_dir(path)
            .map_err(|e| io_failure(cmd, "read", path, e))?
            .is_empty();

        if empty {
            return fs.remove_dir(path).map_err(|e| io_failure(cmd, "remove", path, e));
        }
        if !recursive {
            let name = display_name(path);
            let prompt = format!("{cmd}: {name} is not empty, remove it and everything in it? [y/n] ");
            match confirm(&mut *ctx.console, &prompt) {
                Confirmation::Proceed => {}
                Confirmation::Declined => {
                    info!("{cmd}: declined removal of {}", path.display());
                    ctx.console.write(&format!("{cmd}: aborted, {name} left in place"));
                    return Ok(());
                }
                Confirmation::Aborted => {
                    warn!("{cmd}: no confirmation for {}", path.display());
                    ctx.console
                        .warn(&format!("{cmd}: no confirmation given, {name} left in place"));
                    return Ok(());
                }
            }
        }
        fs.remove_dir_all(path).map_err(|e| io_failure(cmd, "remove", path, e))
    }
}

impl CommandSpec for RemoveSpec {
    fn name(&self) -> &'static str {
        if self.directories_only { "rmdir" } else { "rm" }
    }

    fn usage(&self) -> &'static str {
        if self.directories_only {
            "rmdir [-r] DIR..."
        } else {
            "rm [-r] PATH..."
        }
    }

    fn summary(&self) -> &'static str {
        if self.directories_only {
            "Remove directories. A non-empty directory needs -r or confirmation."
        } else {
            "Remove files and empty directories. A non-empty directory needs -r or confirmation."
        }
    }

    fn contract(&self) -> ArgumentContract {
        let requirement = if self.directories_only {
            Requirement::MustBeSingleton
        } else {
            Requirement::MustBeSingletonOrWildcard
        };
        ArgumentContract::uniform(1, None, requirement).with_flags(&["-r"])
    }

    fn run(&self, call: &Call, ctx: &mut CommandContext<'_>) -> Result<String> {
        let cmd = self.name();
        let recursive = call.has_flag("-r");
        for path in call.paths() {
            match ctx.fs().stat(path) {
                EntryKind::Missing => {
                    return Err(ShellError::execution(format!(
                        "{cmd}: cannot remove {}: No such file or directory",
                        display_name(path)
                    )));
                }
                EntryKind::File if self.directories_only => {
                    return Err(ShellError::execution(format!(
                        "{cmd}: cannot remove {}: Not a directory",
                        display_name(path)
                    )));
                }
                EntryKind::File => ctx
                    .fs()
                    .remove_file(path)
                    .map_err(|e| io_failure(cmd, "remove", path, e))?,
                EntryKind::Dir => self.remove_directory(path, recursive, ctx)?,
            }
            info!("{cmd}: {}", path.display());
        }
        Ok(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::harness::Harness;
    use crate::console::ScriptedConsole;

    #[test]
    fn confirm_reads_first_character() {
        let mut console = ScriptedConsole::new(["yes", "N", "", "maybe"]);
        assert_eq!(confirm(&mut console, "? "), Confirmation::Proceed);
        assert_eq!(confirm(&mut console, "? "), Confirmation::Declined);
        assert_eq!(confirm(&mut console, "? "), Confirmation::Aborted);
        assert_eq!(confirm(&mut console, "? "), Confirmation::Aborted);
        // Input exhausted
        assert_eq!(confirm(&mut console, "? "), Confirmation::Aborted);
    }

    #[test]
    fn rm_removes_files() {
        let mut h = Harness::new();
        h.file("a.txt", "");
        h.file("b.txt", "");
        let call = h.call("rm", &[], &["a.txt", "b.txt"]);
        h.run(&RemoveSpec::rm(), &call).unwrap();
        assert!(!h.path("a.txt").exists());
        assert!(!h.path("b.txt").exists());
    }

    #[test]
    fn rm_missing_is_execution_error() {
        let mut h = Harness::new();
        let call = h.call("rm", &[], &["ghost.txt"]);
        let err = h.run(&RemoveSpec::rm(), &call).unwrap_err();
        assert!(matches!(err, ShellError::Execution(_)));
    }

    #[test]
    fn rm_removes_empty_directory_without_prompt() {
        let mut h = Harness::new();
        h.dir("empty");
        let call = h.call("rm", &[], &["empty"]);
        h.run(&RemoveSpec::rm(), &call).unwrap();
        assert!(!h.path("empty").exists());
        assert!(h.console.prompts.is_empty());
    }

    #[test]
    fn recursive_flag_skips_prompt() {
        let mut h = Harness::new();
        h.dir("full");
        h.file("full/x.txt", "x");
        let call = h.call("rmdir", &["-r"], &["full"]);
        h.run(&RemoveSpec::rmdir(), &call).unwrap();
        assert!(!h.path("full").exists());
        assert!(h.console.prompts.is_empty());
    }

    #[test]
    fn confirmed_yes_removes_tree() {
        let mut h = Harness::with_input(["y"]);
        h.dir("full/nested");
        h.file("full/nested/x.txt", "x");
        let call = h.call("rmdir", &[], &["full"]);
        h.run(&RemoveSpec::rmdir(), &call).unwrap();
        assert!(!h.path("full").exists());
        assert_eq!(h.console.prompts.len(), 1);
    }

    #[test]
    fn declined_leaves_directory() {
        let mut h = Harness::with_input(["n"]);
        h.dir("full");
        h.file("full/x.txt", "x");
        let call = h.call("rmdir", &[], &["full"]);
        assert_eq!(h.run(&RemoveSpec::rmdir(), &call).unwrap(), "");
        assert!(h.path("full/x.txt").exists());
        assert!(h.console.output().contains("aborted"));
    }

    #[test]
    fn unrecognised_answer_warns_and_keeps_directory() {
        let mut h = Harness::with_input(["whatever"]);
        h.dir("full");
        h.file("full/x.txt", "x");
        let call = h.call("rm", &[], &["full"]);
        h.run(&RemoveSpec::rm(), &call).unwrap();
        assert!(h.path("full").exists());
        assert_eq!(h.console.warnings.len(), 1);
    }

    #[test]
    fn rmdir_on_file_is_not_a_directory() {
        let mut h = Harness::new();
        h.file("f.txt", "");
        let call = h.call("rmdir", &[], &["f.txt"]);
        let err = h.run(&RemoveSpec::rmdir(), &call).unwrap_err();
        assert!(matches!(&err, ShellError::Execution(m) if m.contains("Not a directory")));
        assert!(h.path("f.txt").exists());
    }
}
