//! Path handling: structural classification, absolute resolution and
//! wildcard expansion.

pub mod classify;
pub mod resolve;
pub mod wildcard;

pub use classify::classify;
pub use resolve::resolve;
pub use wildcard::{WildcardPolicy, expand};
