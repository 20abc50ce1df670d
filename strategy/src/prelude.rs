//! Common imports for working with strategies.
//!
//! ```rust,ignore
//! use uklad_strategy::prelude::*;
//! ```

pub use crate::branch::BranchRule;
pub use crate::debug::Sink;
pub use crate::error::{Error, Result};
pub use crate::rule::{Rule, Tagged};
pub use crate::traverse::{bottom_up, bottom_up_once, sall, top_down, top_down_once};

// Re-exports from dependencies
pub use uklad_term::{Children, Sexp, Term};
