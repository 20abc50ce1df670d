//! Sequence-shaped expressions: operator first, arguments after.
//!
//! [`Sexp`] is the default [`Term`] carrier for callers that do not have their
//! own expression type yet. A non-empty list decomposes into its head (the
//! operator) and tail (the arguments); atoms and the empty list are leaves.

use crate::{Children, Result, Term, UnsupportedTypeSnafu};

/// A tree of atoms and ordered lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Sexp<A> {
    /// A leaf value, opaque to traversal.
    Atom(A),
    /// An ordered sequence; the first element acts as the operator.
    List(Vec<Sexp<A>>),
}

impl<A> Sexp<A> {
    /// Wrap a leaf value.
    pub fn atom(value: A) -> Self {
        Sexp::Atom(value)
    }

    /// Build a list node from its elements (operator included).
    pub fn list(items: impl IntoIterator<Item = Sexp<A>>) -> Self {
        Sexp::List(items.into_iter().collect())
    }

    /// True for [`Sexp::Atom`].
    pub fn is_atom(&self) -> bool {
        matches!(self, Sexp::Atom(_))
    }
}

impl<A> From<A> for Sexp<A> {
    fn from(value: A) -> Self {
        Sexp::Atom(value)
    }
}

impl<A: Clone> Term for Sexp<A> {
    type Oper = Sexp<A>;

    fn operator(&self) -> Result<Self::Oper> {
        match self {
            Sexp::List(items) if !items.is_empty() => Ok(items[0].clone()),
            Sexp::List(_) => UnsupportedTypeSnafu { what: "empty list" }.fail(),
            Sexp::Atom(_) => UnsupportedTypeSnafu { what: "atom" }.fail(),
        }
    }

    fn arguments(&self) -> Result<Children<Self>> {
        match self {
            Sexp::List(items) if !items.is_empty() => Ok(items[1..].iter().cloned().collect()),
            Sexp::List(_) => UnsupportedTypeSnafu { what: "empty list" }.fail(),
            Sexp::Atom(_) => UnsupportedTypeSnafu { what: "atom" }.fail(),
        }
    }

    fn reconstruct(op: Self::Oper, children: Children<Self>) -> Self {
        Sexp::List(std::iter::once(op).chain(children).collect())
    }
}
