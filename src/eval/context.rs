use std::io;
use std::path::{Path, PathBuf};

use crate::commands::HelpEntry;
use crate::config::Settings;
use crate::console::Console;
use crate::error::{PathError, Result, ShellError};
use crate::fs::{EntryKind, FileSystem};
use crate::path::{self, WildcardPolicy};

/// Interpreter session state: the working directory, the home directory and
/// the filesystem every path is checked against.
///
/// The working directory is only ever replaced whole, by [`Session::change_dir`].
pub struct Session {
    cwd: PathBuf,
    home: PathBuf,
    fs: Box<dyn FileSystem>,
}

impl Session {
    /// `cwd` and `home` must be absolute.
    pub fn new(cwd: impl Into<PathBuf>, home: impl Into<PathBuf>, fs: Box<dyn FileSystem>) -> Self {
        Self {
            cwd: path::resolve::normalize(&cwd.into()),
            home: path::resolve::normalize(&home.into()),
            fs,
        }
    }

    /// Session rooted at the process's current directory and `$HOME`, on the
    /// real filesystem.
    pub fn from_env() -> io::Result<Self> {
        let cwd = std::env::current_dir()?;
        let home = match shellexpand::tilde("~") {
            expanded if expanded != "~" => PathBuf::from(expanded.as_ref()),
            _ => cwd.clone(),
        };
        Ok(Self::new(cwd, home, Box::new(crate::fs::OsFileSystem)))
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    /// Resolve a Singleton argument against the current working directory.
    pub fn resolve(&self, raw: &str) -> PathBuf {
        path::resolve(raw, &self.cwd, &self.home)
    }

    /// Expand a Wildcard argument against the current working directory.
    pub fn expand(&self, raw: &str, policy: WildcardPolicy) -> std::result::Result<Vec<PathBuf>, PathError> {
        path::expand(raw, &self.cwd, &self.home, self.fs.as_ref(), policy)
    }

    /// Switch the working directory to `target`.
    ///
    /// Either `target` is an existing directory and becomes the new working
    /// directory, or an error is returned and the old value is kept.
    pub fn change_dir(&mut self, target: &Path) -> Result<()> {
        let target = path::resolve::normalize(&self.cwd.join(target));
        match self.fs.stat(&target) {
            EntryKind::Dir => {
                log::debug!("cd {} -> {}", self.cwd.display(), target.display());
                self.cwd = target;
                Ok(())
            }
            EntryKind::File => Err(ShellError::execution(format!(
                "cd: {}: Not a directory",
                target.display()
            ))),
            EntryKind::Missing => Err(ShellError::execution(format!(
                "cd: {}: No such file or directory",
                target.display()
            ))),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("cwd", &self.cwd)
            .field("home", &self.home)
            .finish_non_exhaustive()
    }
}

/// Everything a command may touch while it runs.
pub struct CommandContext<'a> {
    pub session: &'a mut Session,
    pub console: &'a mut dyn Console,
    /// Help metadata for every enabled command, sorted by name.
    pub catalogue: &'a [HelpEntry],
    pub settings: &'a Settings,
}

impl CommandContext<'_> {
    pub fn fs(&self) -> &dyn FileSystem {
        self.session.fs()
    }
}
