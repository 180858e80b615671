pub mod shell;
pub mod tokenize;
pub mod types;

pub use shell::{split_pipeline, split_stage};
pub use tokenize::{strip_quotes, tokenize};
pub use types::{Argument, PathClass, Pipeline, RedirectKind, RedirectionSpec, Stage};
