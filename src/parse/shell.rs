use super::tokenize::tokenize;
use super::types::{PathClass, RedirectKind, RedirectionSpec};
use crate::error::{Result, ShellError, display_arg};
use crate::path::classify;

/// Split a line into stage texts at `|`.
///
/// With `quote_aware` set, a `|` inside single or double quotes is part of
/// the word. Without it every `|` splits, which is the legacy behaviour kept
/// for compatibility (a quoted `|` then leaves an unterminated quote behind).
///
/// Errors on an empty line or an empty stage.
pub fn split_pipeline(line: &str, quote_aware: bool) -> Result<Vec<String>> {
    if line.trim().is_empty() {
        return Err(ShellError::syntax("empty command"));
    }

    let mut parts = Vec::new();
    let mut buf = String::new();
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
                buf.push(c);
            }
            None if quote_aware && (c == '"' || c == '\'') => {
                quote = Some(c);
                buf.push(c);
            }
            None if c == '|' => parts.push(std::mem::take(&mut buf)),
            None => buf.push(c),
        }
    }
    parts.push(buf);

    let parts: Vec<String> = parts.into_iter().map(|p| p.trim().to_string()).collect();
    if parts.iter().any(String::is_empty) {
        return Err(ShellError::syntax("empty command in pipeline"));
    }
    Ok(parts)
}

/// Find output redirection operators outside quotes.
/// Returns `(byte offset, operator)` for each; `>>` is matched before `>`.
fn find_redirections(stage: &str) -> Vec<(usize, RedirectKind)> {
    let mut found = Vec::new();
    let mut quote: Option<char> = None;
    let mut chars = stage.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '>' => {
                if chars.peek().is_some_and(|&(_, next)| next == '>') {
                    chars.next();
                    found.push((i, RedirectKind::Append));
                } else {
                    found.push((i, RedirectKind::Truncate));
                }
            }
            None => {}
        }
    }
    found
}

/// Split one stage into its words and its redirection.
///
/// The first word is the command. Errors when the stage has no command, more
/// than one redirection operator, a dangling operator, or a target that is
/// not exactly one Singleton path.
pub fn split_stage(stage: &str) -> Result<(Vec<String>, RedirectionSpec)> {
    let redirections = find_redirections(stage);
    if redirections.len() > 1 {
        return Err(ShellError::syntax("cannot redirect output to multiple files"));
    }

    let (command_text, redirection) = match redirections.first() {
        None => (stage, RedirectionSpec::none()),
        Some(&(offset, kind)) => {
            let op = kind.as_str();
            let target_text = &stage[offset + op.len()..];
            let mut targets = tokenize(target_text)?;
            let target = match targets.len() {
                0 => {
                    return Err(ShellError::syntax(format!(
                        "missing file name after {op}"
                    )));
                }
                1 => targets.remove(0),
                _ => {
                    return Err(ShellError::syntax(format!(
                        "ambiguous redirect after {op}: {}",
                        target_text.trim()
                    )));
                }
            };
            if classify(&target) != Ok(PathClass::Singleton) {
                return Err(ShellError::syntax(format!(
                    "{} is not a valid file for redirection",
                    display_arg(&target)
                )));
            }
            (
                &stage[..offset],
                RedirectionSpec {
                    kind,
                    target: Some(target),
                },
            )
        }
    };

    let words = tokenize(command_text)?;
    if words.is_empty() {
        return Err(ShellError::syntax("missing command"));
    }
    Ok((words, redirection))
}
