//! Error taxonomy shared by the parser, the binder and the command set.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ShellError>;

/// Everything that can abort a pipeline.
///
/// [`ShellError::Halt`] is not a failure: it is the user asking the read loop
/// to stop, and callers check for it with [`ShellError::is_halt`].
#[derive(Debug, Error)]
pub enum ShellError {
    /// Malformed line: empty input, bad redirection placement, unmatched quote.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// Arity or path-contract violation, or an unsupported command name.
    #[error("{0}")]
    Argument(String),

    /// Classification or wildcard expansion failure.
    #[error(transparent)]
    Path(#[from] PathError),

    /// The underlying filesystem operation failed.
    #[error("{0}")]
    Execution(String),

    /// Explicit user exit request.
    #[error("halt requested")]
    Halt,
}

impl ShellError {
    pub fn syntax(msg: impl Into<String>) -> Self {
        ShellError::Syntax(msg.into())
    }

    pub fn argument(msg: impl Into<String>) -> Self {
        ShellError::Argument(msg.into())
    }

    pub fn execution(msg: impl Into<String>) -> Self {
        ShellError::Execution(msg.into())
    }

    /// True for the exit request, false for every genuine failure.
    pub fn is_halt(&self) -> bool {
        matches!(self, ShellError::Halt)
    }

    /// Short label used in log records.
    pub fn kind(&self) -> &'static str {
        match self {
            ShellError::Syntax(_) => "syntax",
            ShellError::Argument(_) => "argument",
            ShellError::Path(_) => "path",
            ShellError::Execution(_) => "execution",
            ShellError::Halt => "halt",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// The argument is neither a concrete path nor a supported wildcard.
    #[error("{0} is not a valid path")]
    Invalid(String),

    /// The wildcard's directory could not be listed or nothing matched.
    #[error("{0}: no such file or directory")]
    NoMatch(String),
}

/// Render a user-supplied word for an error message, quoting it when it
/// contains whitespace or shell metacharacters.
pub fn display_arg(raw: &str) -> String {
    match shlex::try_quote(raw) {
        Ok(quoted) => quoted.into_owned(),
        Err(_) => raw.to_string(),
    }
}
