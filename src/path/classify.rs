use std::sync::LazyLock;

use regex::Regex;

use crate::error::{PathError, display_arg};
use crate::parse::tokenize::strip_quotes;
use crate::parse::types::PathClass;

/// Characters that never appear in a Singleton path.
///
/// `<`, `>`, `|` and `"` are shell syntax here; `*` and `?` are wildcard
/// metacharacters; NUL is rejected by every host.
const RESERVED: &[char] = &['\0', '<', '>', '"', '|', '?', '*'];

/// `(* | name).(* | ext)`: a whole basename or a whole extension may be `*`,
/// literal parts may not contain `< > : " / \ | ? *` or NUL.
static WILDCARD_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(\*|[^<>:"/\\|?*\x00]+)\.(\*|[^<>:"/\\|?*\x00]+)$"#)
        .expect("wildcard name pattern is valid")
});

/// Classify a raw argument as a Singleton path, a Wildcard, or Invalid.
///
/// Exact paths are recognised first so that literal names with unusual but
/// legal characters never go through glob handling; only strings that fail
/// that test are tried as `directory/pattern`.
pub fn classify(raw: &str) -> Result<PathClass, PathError> {
    let invalid = || PathError::Invalid(display_arg(raw));

    if raw == "'" || raw == "\"" {
        return Err(invalid());
    }
    let path = strip_quotes(raw);
    if path.is_empty() {
        return Err(invalid());
    }
    if path == "~" || path == ".." || is_singleton(path) {
        return Ok(PathClass::Singleton);
    }

    let (directory, filename) = split_pattern(path);
    if (directory.is_empty() || is_singleton(directory)) && WILDCARD_NAME.is_match(filename) {
        return Ok(PathClass::Wildcard);
    }
    Err(invalid())
}

fn is_singleton(path: &str) -> bool {
    !path.is_empty() && !path.contains(RESERVED)
}

/// Split at the last path separator into `(directory, filename)`.
///
/// The directory keeps its trailing separator; it is empty when the pattern
/// has no separator at all (meaning the working directory).
pub fn split_pattern(path: &str) -> (&str, &str) {
    match path.rfind(std::path::is_separator) {
        Some(idx) => path.split_at(idx + 1),
        None => ("", path),
    }
}
