//! Structural reflection over tree-shaped expressions.
//!
//! Generic traversal code needs exactly three capabilities from an expression
//! type: read its operator, read its ordered children, and build a new value
//! from an operator plus new children. The [`Term`] trait packages those three
//! operations so that rewrite machinery can walk any expression shape without
//! compile-time knowledge of its structure.
//!
//! Leaves are represented by failure: a value whose type (or variant) has no
//! decomposition reports [`Error::UnsupportedType`] from [`Term::operator`] /
//! [`Term::arguments`], and traversal treats it as an atom.
//!
//! A ready-made implementation for plain ordered-sequence expressions, where
//! the operator is the first element and the arguments are the rest, is
//! provided by [`Sexp`].

use smallvec::SmallVec;
use snafu::Snafu;

pub mod sexp;

pub use sexp::Sexp;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Ordered immediate children of a term.
///
/// Most expression nodes are small; four inline slots cover the common
/// arities without allocation.
pub type Children<E> = SmallVec<[E; 4]>;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Value has no decomposition; callers must treat it as a leaf.
    #[snafu(display("no decomposition for {what}: value is a leaf"))]
    UnsupportedType { what: &'static str },
}

/// Decompose/reconstruct capability for an expression type.
///
/// Implementations must uphold the round-trip law: whenever
/// [`operator`](Term::operator) succeeds,
///
/// ```text
/// Term::reconstruct(e.operator()?, e.arguments()?) == e
/// ```
///
/// `operator` and `arguments` fail with [`Error::UnsupportedType`] on exactly
/// the same set of values (the leaves). Each expression type decides for
/// itself which of its values are leaves; for enum-shaped expressions that is
/// typically a per-variant decision, not a per-type one.
pub trait Term: Sized {
    /// Opaque operator tag, round-trippable through [`Term::reconstruct`].
    type Oper;

    /// The operator of a composite value, or [`Error::UnsupportedType`] for
    /// leaves.
    fn operator(&self) -> Result<Self::Oper>;

    /// The ordered immediate children. May be empty for 0-ary constructors,
    /// which are still composite (they have an operator).
    fn arguments(&self) -> Result<Children<Self>>;

    /// Build a value from an operator and new children. Inverse of
    /// decomposition.
    fn reconstruct(op: Self::Oper, children: Children<Self>) -> Self;

    /// Operator and children in one step.
    fn decompose(&self) -> Result<(Self::Oper, Children<Self>)> {
        Ok((self.operator()?, self.arguments()?))
    }
}
