use std::path::Path;

use super::{ArgumentContract, Call, CommandSpec, Requirement, ResolvedArgument, display_name, io_failure};
use crate::error::{Result, ShellError};
use crate::eval::CommandContext;
use crate::fs::{EntryKind, FileSystem};

pub struct LsSpec;

impl CommandSpec for LsSpec {
    fn name(&self) -> &'static str {
        "ls"
    }

    fn usage(&self) -> &'static str {
        "ls [PATH]"
    }

    fn summary(&self) -> &'static str {
        "List a directory, one name per line; directories end in '/'."
    }

    fn contract(&self) -> ArgumentContract {
        ArgumentContract::uniform(0, Some(1), Requirement::MustBeSingletonOrWildcard)
    }

    fn run(&self, call: &Call, ctx: &mut CommandContext<'_>) -> Result<String> {
        let fs = ctx.fs();
        let lines = match call.args.first() {
            None => children(fs, ctx.session.cwd(), "")?,
            Some(ResolvedArgument::Expanded(paths)) => {
                let mut lines = Vec::new();
                for path in paths {
                    match fs.stat(path) {
                        EntryKind::Dir => {
                            lines.push(format!("{}/:", entry_name(path)));
                            lines.extend(children(fs, path, "  ")?);
                        }
                        _ => lines.push(entry_name(path)),
                    }
                }
                lines
            }
            Some(arg) => {
                let Some(path) = arg.paths().first() else {
                    return Ok(String::new());
                };
                match fs.stat(path) {
                    EntryKind::Dir => children(fs, path, "")?,
                    EntryKind::File => vec![entry_name(path)],
                    EntryKind::Missing => {
                        return Err(ShellError::execution(format!(
                            "ls: cannot access {}: No such file or directory",
                            display_name(path)
                        )));
                    }
                }
            }
        };
        Ok(lines.join("\n"))
    }
}

fn entry_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.display().to_string(),
    }
}

fn children(fs: &dyn FileSystem, dir: &Path, indent: &str) -> Result<Vec<String>> {
    let names = fs.list_dir(dir).map_err(|e| io_failure("ls", "read", dir, e))?;
    Ok(names
        .into_iter()
        .map(|name| {
            let suffix = if fs.stat(&dir.join(&name)) == EntryKind::Dir { "/" } else { "" };
            format!("{indent}{name}{suffix}")
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::harness::Harness;

    #[test]
    fn lists_working_directory_sorted() {
        let mut h = Harness::new();
        h.file("b.txt", "");
        h.file("a.txt", "");
        h.dir("sub");
        let out = h.run(&LsSpec, &Call::default()).unwrap();
        assert_eq!(out, "a.txt\nb.txt\nsub/");
    }

    #[test]
    fn lists_named_directory() {
        let mut h = Harness::new();
        h.dir("sub/inner");
        h.file("sub/x.txt", "");
        let call = h.call("ls", &[], &["sub"]);
        assert_eq!(h.run(&LsSpec, &call).unwrap(), "inner/\nx.txt");
    }

    #[test]
    fn single_file_lists_its_name() {
        let mut h = Harness::new();
        h.file("a.txt", "");
        let call = h.call("ls", &[], &["a.txt"]);
        assert_eq!(h.run(&LsSpec, &call).unwrap(), "a.txt");
    }

    #[test]
    fn missing_path_is_execution_error() {
        let mut h = Harness::new();
        let call = h.call("ls", &[], &["nope"]);
        assert!(matches!(h.run(&LsSpec, &call), Err(ShellError::Execution(_))));
    }

    #[test]
    fn expanded_directories_get_headers() {
        let mut h = Harness::new();
        h.file("a.txt", "");
        h.dir("d.dir");
        h.file("d.dir/x.txt", "");
        let call = Call {
            args: vec![ResolvedArgument::Expanded(vec![h.path("a.txt"), h.path("d.dir")])],
            ..Call::default()
        };
        assert_eq!(h.run(&LsSpec, &call).unwrap(), "a.txt\nd.dir/:\n  x.txt");
    }
}
