use crate::error::{Result, ShellError};

/// Split a stage into words.
///
/// Whitespace outside quotes separates words. `"..."` and `'...'` contribute
/// their content verbatim (no escapes, no nesting) and join any adjacent
/// unquoted characters into the same word, so `a"b c"` is the single word
/// `ab c`. Words that end up empty, such as a lone `""`, are dropped.
/// An unterminated quote is a syntax error.
pub fn tokenize(text: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut buf = String::new();
    let mut quote: Option<char> = None;

    for c in text.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => buf.push(c),
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c.is_whitespace() => {
                if !buf.is_empty() {
                    words.push(std::mem::take(&mut buf));
                }
            }
            None => buf.push(c),
        }
    }

    if let Some(q) = quote {
        return Err(ShellError::syntax(format!("unterminated quote ({q})")));
    }
    if !buf.is_empty() {
        words.push(buf);
    }
    Ok(words)
}

/// Remove one layer of matching surrounding quotes, if present.
pub fn strip_quotes(word: &str) -> &str {
    let bytes = word.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' || first == b'\'') && first == last {
            return &word[1..word.len() - 1];
        }
    }
    word
}
