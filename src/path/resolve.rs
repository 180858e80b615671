use std::path::{Component, Path, PathBuf};

/// Turn a Singleton argument into an absolute path.
///
/// The word is taken as written: quotes were consumed by the tokenizer, so
/// any that remain are part of the name.
/// `~` and `~/rest` expand against `home`; other relative paths are joined
/// onto `cwd`. The result is lexically normalised (`.` dropped, `..` pops one
/// component and stops at the root), so `..` in `/` is `/`. Never touches the
/// filesystem and is idempotent.
pub fn resolve(raw: &str, cwd: &Path, home: &Path) -> PathBuf {
    let expanded = shellexpand::tilde_with_context(raw, || Some(home.to_string_lossy()));
    let path = Path::new(expanded.as_ref());
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&cwd.join(path))
    }
}

/// Lexically collapse `.` and `..` components.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
