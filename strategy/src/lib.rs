//! Strategy combinators for controlled rewriting.
//!
//! A *rule* is a function that transforms one expression into another. A
//! *strategy* says how rules should be applied: in sequence, until a fixed
//! point, only under a condition, down or up a tree. Separating the two lets
//! the transformation itself (the math) stay independent from the algorithm
//! that applies it.
//!
//! # Module Organization
//!
//! - [`rule`] - deterministic combinators over [`Rule`] (`Expr -> Expr`)
//! - [`branch`] - nondeterministic combinators over [`BranchRule`]
//!   (`Expr -> lazy sequence of Expr`)
//! - [`traverse`] - generic tree traversal (`sall`, `top_down`, `bottom_up`)
//!   over any type implementing [`uklad_term::Term`]
//! - [`debug`] - the injectable sink used by the `debug` combinators
//! - [`util`] - sequence helpers for the branching algebra
//!
//! # Failure convention
//!
//! A deterministic rule signals "did not apply" by returning its input
//! unchanged (by equality); a branching rule signals it by yielding nothing.
//! These are the only failure signals the combinators understand. Rules must
//! not panic to signal non-applicability; adapt partial or fallible functions
//! with [`rule::null_safe`] / [`rule::tryit`].

pub mod branch;
pub mod debug;
pub mod error;
pub mod prelude;
pub mod rule;
pub mod traverse;
pub mod util;


pub use branch::BranchRule;
pub use error::{Error, Result};
pub use rule::{Rule, Tagged};
