use std::path::{Path, PathBuf};

use log::{info, warn};

use super::{ArgShape, ArgumentContract, Call, CommandSpec, Requirement, display_name, io_failure};
use crate::error::{Result, ShellError};
use crate::eval::CommandContext;
use crate::fs::EntryKind;

const CONTRACT: ArgumentContract = ArgumentContract {
    min: 2,
    max: None,
    flags: &[],
    shape: ArgShape::SourcesThenDestination {
        sources: Requirement::MustBeSingletonOrWildcard,
        destination: Requirement::MustBeSingleton,
    },
};

/// `cp` and `mv`. A move is a copy followed by removal of every source that
/// was copied.
pub struct CopySpec {
    remove_sources: bool,
}

impl CopySpec {
    pub fn copy() -> Self {
        Self {
            remove_sources: false,
        }
    }

    pub fn moving() -> Self {
        Self {
            remove_sources: true,
        }
    }
}

impl CommandSpec for CopySpec {
    fn name(&self) -> &'static str {
        if self.remove_sources { "mv" } else { "cp" }
    }

    fn usage(&self) -> &'static str {
        if self.remove_sources {
            "mv SOURCE... DEST"
        } else {
            "cp SOURCE... DEST"
        }
    }

    fn summary(&self) -> &'static str {
        if self.remove_sources {
            "Move files to DEST, or into DEST when it is a directory."
        } else {
            "Copy files to DEST, or into DEST when it is a directory."
        }
    }

    fn contract(&self) -> ArgumentContract {
        CONTRACT
    }

    fn run(&self, call: &Call, ctx: &mut CommandContext<'_>) -> Result<String> {
        let cmd = self.name();
        let paths = call.paths();
        let Some((destination, sources)) = paths.split_last() else {
            return Err(ShellError::argument(format!("{cmd}: missing destination")));
        };

        let fs = ctx.session.fs();
        let into_directory = fs.stat(destination) == EntryKind::Dir;

        // Every copy must succeed before any source is removed.
        let mut copied: Vec<&Path> = Vec::with_capacity(sources.len());
        for &source in sources {
            match fs.stat(source) {
                EntryKind::Dir => {
                    let notice = format!("{cmd}: directory {} was ignored", display_name(source));
                    warn!("{notice}");
                    ctx.console.warn(&notice);
                    continue;
                }
                EntryKind::Missing => {
                    return Err(ShellError::execution(format!(
                        "{cmd}: cannot copy {}: No such file or directory",
                        display_name(source)
                    )));
                }
                EntryKind::File => {}
            }

            let target = target_for(source, destination, into_directory);
            if target == source {
                return Err(ShellError::execution(format!(
                    "{cmd}: {} and {} are the same file",
                    display_name(source),
                    display_name(&target)
                )));
            }
            fs.copy_file(source, &target)
                .map_err(|e| io_failure(cmd, "copy", source, e))?;
            info!("{cmd}: {} -> {}", source.display(), target.display());
            copied.push(source);
        }

        if self.remove_sources {
            for source in copied {
                if let Err(e) = fs.remove_file(source) {
                    warn!("{cmd}: copied {} but could not remove it: {e}", source.display());
                }
            }
        }
        Ok(String::new())
    }
}

fn target_for(source: &Path, destination: &Path, into_directory: bool) -> PathBuf {
    match source.file_name() {
        Some(name) if into_directory => destination.join(name),
        _ => destination.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::harness::Harness;
    use crate::fs::stub::StubFileSystem;

    #[test]
    fn copies_file_to_new_name() {
        let mut h = Harness::new();
        h.file("a.txt", "alpha");
        let call = h.call("cp", &[], &["a.txt", "b.txt"]);
        assert_eq!(h.run(&CopySpec::copy(), &call).unwrap(), "");
        assert_eq!(std::fs::read_to_string(h.path("b.txt")).unwrap(), "alpha");
        assert!(h.path("a.txt").exists());
    }

    #[test]
    fn copies_into_directory_keeping_names() {
        let mut h = Harness::new();
        h.file("a.txt", "a");
        h.file("b.txt", "b");
        h.dir("dest");
        let call = h.call("cp", &[], &["a.txt", "b.txt", "dest"]);
        h.run(&CopySpec::copy(), &call).unwrap();
        assert_eq!(std::fs::read_to_string(h.path("dest/a.txt")).unwrap(), "a");
        assert_eq!(std::fs::read_to_string(h.path("dest/b.txt")).unwrap(), "b");
    }

    #[test]
    fn overwrites_existing_destination() {
        let mut h = Harness::new();
        h.file("a.txt", "new");
        h.file("b.txt", "old");
        let call = h.call("cp", &[], &["a.txt", "b.txt"]);
        h.run(&CopySpec::copy(), &call).unwrap();
        assert_eq!(std::fs::read_to_string(h.path("b.txt")).unwrap(), "new");
    }

    #[test]
    fn directory_source_is_skipped_with_warning() {
        let mut h = Harness::new();
        h.file("a.txt", "a");
        h.dir("sub");
        h.dir("dest");
        let call = h.call("cp", &[], &["a.txt", "sub", "dest"]);
        h.run(&CopySpec::copy(), &call).unwrap();
        assert!(h.path("dest/a.txt").exists());
        assert!(!h.path("dest/sub").exists());
        assert_eq!(h.console.warnings.len(), 1);
        assert!(h.console.warnings[0].contains("ignored"));
    }

    #[test]
    fn missing_source_is_execution_error() {
        let mut h = Harness::new();
        let call = h.call("cp", &[], &["ghost.txt", "b.txt"]);
        let err = h.run(&CopySpec::copy(), &call).unwrap_err();
        assert!(matches!(&err, ShellError::Execution(m) if m.contains("ghost.txt")));
    }

    #[test]
    fn copy_onto_itself_is_execution_error() {
        let mut h = Harness::new();
        h.file("a.txt", "a");
        let call = h.call("cp", &[], &["a.txt", "."]);
        let err = h.run(&CopySpec::copy(), &call).unwrap_err();
        assert!(matches!(&err, ShellError::Execution(m) if m.contains("same file")));
        assert_eq!(std::fs::read_to_string(h.path("a.txt")).unwrap(), "a");
    }

    #[test]
    fn move_removes_sources() {
        let mut h = Harness::new();
        h.file("a.txt", "a");
        h.dir("dest");
        let call = h.call("mv", &[], &["a.txt", "dest"]);
        h.run(&CopySpec::moving(), &call).unwrap();
        assert!(!h.path("a.txt").exists());
        assert!(h.path("dest/a.txt").exists());
    }

    #[test]
    fn move_keeps_source_when_removal_fails() {
        let mut h = Harness::new().with_fs(StubFileSystem::denying_removal());
        h.file("a.txt", "a");
        h.dir("dest");
        let call = h.call("mv", &[], &["a.txt", "dest"]);
        assert_eq!(h.run(&CopySpec::moving(), &call).unwrap(), "");
        assert_eq!(std::fs::read_to_string(h.path("dest/a.txt")).unwrap(), "a");
        assert!(h.path("a.txt").exists());
        assert!(h.console.warnings.is_empty());
    }

    #[test]
    fn failed_move_removes_nothing() {
        let mut h = Harness::new();
        h.file("a.txt", "a");
        h.dir("dest");
        let call = h.call("mv", &[], &["a.txt", "ghost.txt", "dest"]);
        assert!(h.run(&CopySpec::moving(), &call).is_err());
        assert!(h.path("a.txt").exists());
    }
}
