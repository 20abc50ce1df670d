//! Branching traversal over any [`Term`] expression type.
//!
//! The same shapes as the deterministic [`crate::traverse`], obtained by
//! substituting the branching `chain`/`notempty`/`sall`. Where the
//! deterministic `sall` maps one rule result over each child, the branching
//! `sall` enumerates the cartesian product of every child's alternatives.

use uklad_term::{Children, Term};

use super::{BranchIter, BranchRule, chain, notempty};

/// Enumerates `reconstruct(op, combo)` for every combination of per-child
/// alternatives, rightmost child varying fastest.
struct Product<E: Term> {
    op: E::Oper,
    alternatives: Vec<Vec<E>>,
    indices: Vec<usize>,
    done: bool,
}

impl<E> Iterator for Product<E>
where
    E: Term + Clone,
    E::Oper: Clone,
{
    type Item = E;

    fn next(&mut self) -> Option<E> {
        if self.done {
            return None;
        }
        let combo: Children<E> = self
            .indices
            .iter()
            .zip(&self.alternatives)
            .map(|(&index, alternatives)| alternatives[index].clone())
            .collect();

        // Odometer advance; wrapping past the leftmost digit ends the product.
        let mut position = self.alternatives.len();
        loop {
            if position == 0 {
                self.done = true;
                break;
            }
            position -= 1;
            self.indices[position] += 1;
            if self.indices[position] < self.alternatives[position].len() {
                break;
            }
            self.indices[position] = 0;
        }

        Some(E::reconstruct(self.op.clone(), combo))
    }
}

/// Strategic all: apply `rule` to every immediate child, yielding one result
/// per combination of child alternatives.
///
/// A child with no alternatives empties the whole product. Leaves (no
/// decomposition) yield themselves once.
pub fn sall<E>(rule: BranchRule<E>) -> BranchRule<E>
where
    E: Term + Clone + 'static,
    E::Oper: Clone + 'static,
{
    BranchRule::new("sall", move |expr: &E| {
        let Ok((op, children)) = expr.decompose() else {
            return Box::new(std::iter::once(expr.clone())) as BranchIter<E>;
        };
        let alternatives: Vec<Vec<E>> =
            children.iter().map(|child| rule.apply(child).collect()).collect();
        if alternatives.iter().any(Vec::is_empty) {
            return Box::new(std::iter::empty()) as BranchIter<E>;
        }
        let indices = vec![0; alternatives.len()];
        Box::new(Product { op, alternatives, indices, done: false }) as BranchIter<E>
    })
}

/// Apply `rule` at the current node (keeping the node when it yields
/// nothing), then recurse into the children of every candidate.
pub fn top_down<E>(rule: BranchRule<E>) -> BranchRule<E>
where
    E: Term + Clone + 'static,
    E::Oper: Clone + 'static,
{
    let inner = rule;
    BranchRule::new("top_down", move |expr: &E| {
        chain(vec![notempty(inner.clone()), sall(top_down(inner.clone()))]).apply(expr)
    })
}

/// Recurse into children first, then apply `rule` at the current node
/// (keeping the node when it yields nothing).
pub fn bottom_up<E>(rule: BranchRule<E>) -> BranchRule<E>
where
    E: Term + Clone + 'static,
    E::Oper: Clone + 'static,
{
    let inner = rule;
    BranchRule::new("bottom_up", move |expr: &E| {
        chain(vec![sall(bottom_up(inner.clone())), notempty(inner.clone())]).apply(expr)
    })
}
