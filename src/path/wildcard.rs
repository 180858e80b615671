use std::path::{Path, PathBuf};

use log::debug;
use regex::Regex;

use crate::error::{PathError, display_arg};
use crate::fs::{EntryKind, FileSystem};
use crate::path::classify::split_pattern;
use crate::path::resolve::resolve;

/// Whether a command's wildcard matches may include directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WildcardPolicy {
    FilesOnly,
    FilesAndDirectories,
}

/// Translate a wildcard filename into an anchored regex:
/// `*` matches any run of characters, everything else is literal.
pub fn pattern_to_regex(filename: &str) -> Result<Regex, regex::Error> {
    let body = filename
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    Regex::new(&format!("^{body}$"))
}

/// Expand a Wildcard argument to the absolute paths it matches, in the
/// directory's listing order.
pub fn expand(
    raw: &str,
    cwd: &Path,
    home: &Path,
    fs: &dyn FileSystem,
    policy: WildcardPolicy,
) -> Result<Vec<PathBuf>, PathError> {
    let no_match = || PathError::NoMatch(display_arg(raw));

    let (directory, filename) = split_pattern(raw);
    let dir = if directory.is_empty() {
        resolve(".", cwd, home)
    } else {
        resolve(directory, cwd, home)
    };
    let matcher = pattern_to_regex(filename).map_err(|_| PathError::Invalid(display_arg(raw)))?;

    let names = fs.list_dir(&dir).map_err(|e| {
        debug!("wildcard {raw}: cannot list {}: {e}", dir.display());
        no_match()
    })?;

    let matches: Vec<PathBuf> = names
        .iter()
        .filter(|name| matcher.is_match(name))
        .map(|name| dir.join(name))
        .filter(|path| {
            policy == WildcardPolicy::FilesAndDirectories || fs.stat(path) != EntryKind::Dir
        })
        .collect();

    debug!("wildcard {raw} -> {} match(es) in {}", matches.len(), dir.display());
    if matches.is_empty() {
        return Err(no_match());
    }
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::OsFileSystem;
    use crate::fs::stub::StubFileSystem;

    fn sandbox(files: &[&str], dirs: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for d in dirs {
            std::fs::create_dir_all(dir.path().join(d)).unwrap();
        }
        for f in files {
            std::fs::write(dir.path().join(f), f).unwrap();
        }
        dir
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn regex_translation() {
        let re = pattern_to_regex("*.txt").unwrap();
        assert!(re.is_match("a.txt"));
        assert!(re.is_match(".txt"));
        assert!(!re.is_match("a.txt.bak"));
        assert!(!re.is_match("atxt"));

        let re = pattern_to_regex("report.*").unwrap();
        assert!(re.is_match("report.pdf"));
        assert!(re.is_match("report."));
        assert!(!re.is_match("xreport.pdf"));
    }

    #[test]
    fn regex_escapes_literals() {
        let re = pattern_to_regex("a+(b).*").unwrap();
        assert!(re.is_match("a+(b).c"));
        assert!(!re.is_match("aa(b).c"));
    }

    #[test]
    fn expands_in_listing_order() {
        let dir = sandbox(&["b.txt", "a.txt", "note.md"], &[]);
        let found = expand(
            "*.txt",
            dir.path(),
            dir.path(),
            &OsFileSystem,
            WildcardPolicy::FilesOnly,
        )
        .unwrap();
        assert_eq!(names(&found), vec!["a.txt", "b.txt"]);
        assert!(found.iter().all(|p| p.is_absolute()));
    }

    #[test]
    fn expansion_keeps_filesystem_listing_order() {
        let dir = sandbox(&["a.txt", "b.txt", "c.txt", "note.md"], &[]);
        let fs = StubFileSystem::listing(&["c.txt", "note.md", "a.txt", "b.txt"]);
        let found = expand("*.txt", dir.path(), dir.path(), &fs, WildcardPolicy::FilesOnly).unwrap();
        assert_eq!(names(&found), vec!["c.txt", "a.txt", "b.txt"]);
    }

    #[test]
    fn expands_in_subdirectory() {
        let dir = sandbox(&["sub/x.rs", "sub/y.rs", "z.rs"], &["sub"]);
        let found = expand(
            "sub/*.rs",
            dir.path(),
            dir.path(),
            &OsFileSystem,
            WildcardPolicy::FilesOnly,
        )
        .unwrap();
        assert_eq!(names(&found), vec!["x.rs", "y.rs"]);
        assert!(found.iter().all(|p| p.starts_with(dir.path().join("sub"))));
    }

    #[test]
    fn files_only_policy_drops_directories() {
        let dir = sandbox(&["a.d"], &["b.d"]);
        let files = expand("*.d", dir.path(), dir.path(), &OsFileSystem, WildcardPolicy::FilesOnly).unwrap();
        assert_eq!(names(&files), vec!["a.d"]);

        let all = expand(
            "*.d",
            dir.path(),
            dir.path(),
            &OsFileSystem,
            WildcardPolicy::FilesAndDirectories,
        )
        .unwrap();
        assert_eq!(names(&all), vec!["a.d", "b.d"]);
    }

    #[test]
    fn zero_matches_is_no_match() {
        let dir = sandbox(&["note.md"], &[]);
        let err = expand("*.txt", dir.path(), dir.path(), &OsFileSystem, WildcardPolicy::FilesOnly)
            .unwrap_err();
        assert!(matches!(&err, PathError::NoMatch(p) if p.contains("*.txt")), "{err:?}");
    }

    #[test]
    fn unlistable_directory_is_no_match() {
        let dir = sandbox(&[], &[]);
        let err = expand(
            "missing/*.txt",
            dir.path(),
            dir.path(),
            &OsFileSystem,
            WildcardPolicy::FilesOnly,
        )
        .unwrap_err();
        assert!(matches!(err, PathError::NoMatch(_)));
    }
}
