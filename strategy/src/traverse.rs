//! Generic tree traversal over any [`Term`] expression type.
//!
//! The traversal functions know nothing about concrete expression shapes:
//! [`sall`] decomposes a node, maps the rule over the children, and
//! reconstructs; the recursive traversals are compositions of `sall` with
//! [`chain`] / [`do_one`]. Any value without a decomposition is a leaf and
//! passes through unchanged — traversal never fails on reaching an atom.

use uklad_term::Term;

use crate::rule::{Rule, chain, do_one};

/// Strategic all: apply `rule` to every immediate child of an expression,
/// leaving the operator and the tree shape otherwise untouched.
///
/// Leaves (values reporting `UnsupportedType` from the term interface) are
/// returned unchanged; the error never reaches the caller.
pub fn sall<E>(rule: Rule<E>) -> Rule<E>
where
    E: Term + Clone + 'static,
{
    Rule::new("sall", move |expr: &E| match expr.decompose() {
        Err(_) => expr.clone(),
        Ok((op, children)) => {
            let rewritten = children.iter().map(|child| rule.apply(child)).collect();
            E::reconstruct(op, rewritten)
        }
    })
}

/// Apply `rule` at the current node first, then traverse into children:
/// `chain(rule, sall(top_down(rule)))`.
pub fn top_down<E>(rule: Rule<E>) -> Rule<E>
where
    E: Term + Clone + 'static,
{
    let inner = rule;
    Rule::new("top_down", move |expr: &E| {
        chain(vec![inner.clone(), sall(top_down(inner.clone()))]).apply(expr)
    })
}

/// Traverse into children first, then apply `rule` at the current node:
/// `chain(sall(bottom_up(rule)), rule)`.
pub fn bottom_up<E>(rule: Rule<E>) -> Rule<E>
where
    E: Term + Clone + 'static,
{
    let inner = rule;
    Rule::new("bottom_up", move |expr: &E| {
        chain(vec![sall(bottom_up(inner.clone())), inner.clone()]).apply(expr)
    })
}

/// Like [`top_down`], but stop at the first effect: once either "apply
/// here" or "recurse into children" changes the expression, nothing further
/// is attempted on that path.
pub fn top_down_once<E>(rule: Rule<E>) -> Rule<E>
where
    E: Term + Clone + PartialEq + 'static,
{
    let inner = rule;
    Rule::new("top_down_once", move |expr: &E| {
        do_one(vec![inner.clone(), sall(top_down_once(inner.clone()))]).apply(expr)
    })
}

/// Like [`bottom_up`], but stop at the first effect.
pub fn bottom_up_once<E>(rule: Rule<E>) -> Rule<E>
where
    E: Term + Clone + PartialEq + 'static,
{
    let inner = rule;
    Rule::new("bottom_up_once", move |expr: &E| {
        do_one(vec![sall(bottom_up_once(inner.clone())), inner.clone()]).apply(expr)
    })
}
