//! Types produced by the pipeline parser and consumed by the executor.

/// Structural classification of a path-bearing argument.
///
/// Whether a Singleton names a file or a directory is decided later, against
/// the live filesystem, when the stage is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// One concrete path with no wildcard metacharacter.
    Singleton,
    /// A `*` pattern in the final segment of a valid directory.
    Wildcard,
}

/// One argument of a stage, as written on the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    /// A declared option such as `-r`.
    Flag(String),
    /// A word the command interprets itself (e.g. a command name for `help`).
    Literal(String),
    /// A word that names one or more filesystem paths.
    Path { raw: String, class: PathClass },
}

impl Argument {
    /// The word as typed (quotes already stripped).
    pub fn raw(&self) -> &str {
        match self {
            Argument::Flag(s) | Argument::Literal(s) => s,
            Argument::Path { raw, .. } => raw,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedirectKind {
    /// Print to the console.
    #[default]
    None,
    /// `>`: overwrite the target.
    Truncate,
    /// `>>`: append to the target after a newline.
    Append,
}

impl RedirectKind {
    /// The operator's shell syntax.
    pub fn as_str(&self) -> &'static str {
        match self {
            RedirectKind::None => "",
            RedirectKind::Truncate => ">",
            RedirectKind::Append => ">>",
        }
    }
}

/// Where a stage's output goes.
///
/// `target` is the raw Singleton word following the operator; it is resolved
/// against the working directory when the stage is bound.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RedirectionSpec {
    pub kind: RedirectKind,
    pub target: Option<String>,
}

impl RedirectionSpec {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_none(&self) -> bool {
        self.kind == RedirectKind::None
    }
}

/// One command with its arguments and optional redirection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub command: String,
    pub args: Vec<Argument>,
    pub redirection: RedirectionSpec,
}

impl Stage {
    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.args.iter().filter_map(|a| match a {
            Argument::Flag(f) => Some(f.as_str()),
            _ => None,
        })
    }

    /// Arguments other than flags, in order.
    pub fn operands(&self) -> impl Iterator<Item = &Argument> {
        self.args.iter().filter(|a| !matches!(a, Argument::Flag(_)))
    }
}

/// Stages chained by `|`, in execution order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    pub stages: Vec<Stage>,
}

impl Pipeline {
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
