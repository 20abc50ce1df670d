//! Error types for fallible rewrite rules.

use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures surfaced by user-supplied rules.
///
/// Combinators are transparent pass-throughs for rule errors; only
/// [`tryit`](crate::rule::tryit) absorbs them, converting any error into a
/// no-op application.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// A fallible rule failed during evaluation.
    #[snafu(display("rule {rule:?} failed: {message}"))]
    RuleFailure { rule: String, message: String },
}
