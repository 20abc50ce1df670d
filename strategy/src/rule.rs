//! Deterministic rewrite rules and their combinators.
//!
//! A [`Rule`] is a total function `Expr -> Expr`. Returning the input
//! unchanged (by equality) is the one and only signal that the rule did not
//! apply; [`do_one`] uses it to pick the first effective rule and [`exhaust`]
//! uses it to detect convergence. Every combinator here takes rules and
//! returns a new rule, so strategies compose freely.

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use crate::debug::{self, Sink};

/// A named, total rewrite step over expressions of type `E`.
///
/// Cheap to clone: the payload is reference-counted. The name is carried for
/// the tracing hooks and the debug sink.
pub struct Rule<E> {
    name: Cow<'static, str>,
    run: Rc<dyn Fn(&E) -> E>,
}

impl<E> Clone for Rule<E> {
    fn clone(&self) -> Self {
        Self { name: self.name.clone(), run: Rc::clone(&self.run) }
    }
}

impl<E> fmt::Debug for Rule<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Rule").field(&self.name).finish()
    }
}

impl<E> Rule<E> {
    /// Wrap a function as a named rule.
    pub fn new(name: impl Into<Cow<'static, str>>, run: impl Fn(&E) -> E + 'static) -> Self {
        Self { name: name.into(), run: Rc::new(run) }
    }

    /// Display name, used by [`onaction`] hooks and the debug sink.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Apply the rule.
    pub fn apply(&self, expr: &E) -> E {
        (self.run)(expr)
    }
}

/// Rule that returns its input unchanged.
pub fn identity<E: Clone + 'static>() -> Rule<E> {
    Rule::new("identity", |expr: &E| expr.clone())
}

/// Apply `rules` left to right, each consuming the previous output.
///
/// An empty list behaves as [`identity`].
pub fn chain<E: Clone + 'static>(rules: Vec<Rule<E>>) -> Rule<E> {
    Rule::new("chain", move |expr: &E| {
        let mut current = expr.clone();
        for rule in &rules {
            current = rule.apply(&current);
        }
        current
    })
}

/// Try each rule in order and return the result of the first one whose
/// output differs from the input. If none differ, the input is returned
/// unchanged.
pub fn do_one<E: Clone + PartialEq + 'static>(rules: Vec<Rule<E>>) -> Rule<E> {
    Rule::new("do_one", move |expr: &E| {
        for rule in &rules {
            let result = rule.apply(expr);
            if result != *expr {
                tracing::trace!(rule = rule.name(), "do_one picked rule");
                return result;
            }
        }
        expr.clone()
    })
}

/// Apply `rule` to its own output until a fixed point (`rule(x) == x`).
///
/// Performs no cycle detection: an oscillating rule loops forever. Ensuring
/// termination is the caller's obligation (the branching
/// [`branch::exhaust`](crate::branch::exhaust) does guard against revisits).
pub fn exhaust<E: Clone + PartialEq + 'static>(rule: Rule<E>) -> Rule<E> {
    Rule::new("exhaust", move |expr: &E| {
        let mut current = expr.clone();
        let mut steps = 0usize;
        loop {
            let next = rule.apply(&current);
            if next == current {
                tracing::trace!(rule = rule.name(), steps, "exhaust reached fixed point");
                return current;
            }
            steps += 1;
            current = next;
        }
    })
}

/// Apply `rule` only when `pred` holds; otherwise return the input unchanged.
pub fn condition<E, P>(pred: P, rule: Rule<E>) -> Rule<E>
where
    E: Clone + 'static,
    P: Fn(&E) -> bool + 'static,
{
    Rule::new("condition", move |expr: &E| if pred(expr) { rule.apply(expr) } else { expr.clone() })
}

/// Dispatch on `key(x)` through `table`, defaulting to [`identity`] when the
/// key is absent.
pub fn switch<E, K, F>(key: F, table: HashMap<K, Rule<E>>) -> Rule<E>
where
    E: Clone + 'static,
    K: Eq + Hash + 'static,
    F: Fn(&E) -> K + 'static,
{
    Rule::new("switch", move |expr: &E| match table.get(&key(expr)) {
        Some(rule) => rule.apply(expr),
        None => expr.clone(),
    })
}

/// Expression types that expose a runtime tag for per-variant dispatch.
///
/// The tag plays the role a runtime type would in a dynamic language: one
/// expression family, many dispatchable variants. No global registry is
/// involved; whichever module introduces an expression type implements the
/// trait next to it.
pub trait Tagged {
    type Tag: Eq + Hash;

    fn tag(&self) -> Self::Tag;
}

/// [`switch`] specialized so the key is the expression's runtime tag.
pub fn typed<E>(table: HashMap<E::Tag, Rule<E>>) -> Rule<E>
where
    E: Tagged + Clone + 'static,
    E::Tag: 'static,
{
    switch(|expr: &E| expr.tag(), table)
}

/// Cache `rule`'s results by input value.
///
/// The cache is unbounded and lives as long as the returned rule: nothing is
/// ever evicted, which is a deliberate (and documented) leak for
/// long-running processes. Not safe for rules with side effects, since the
/// cache short-circuits re-execution.
pub fn memoize<E>(rule: Rule<E>) -> Rule<E>
where
    E: Clone + Eq + Hash + 'static,
{
    let cache: RefCell<HashMap<E, E>> = RefCell::new(HashMap::new());
    Rule::new("memoize", move |expr: &E| {
        if let Some(hit) = cache.borrow().get(expr) {
            tracing::trace!(rule = rule.name(), "memoize cache hit");
            return hit.clone();
        }
        let result = rule.apply(expr);
        cache.borrow_mut().insert(expr.clone(), result.clone());
        result
    })
}

/// Adapt a partial function into a total rule: `None` becomes a no-op.
pub fn null_safe<E, F>(name: impl Into<Cow<'static, str>>, partial: F) -> Rule<E>
where
    E: Clone + 'static,
    F: Fn(&E) -> Option<E> + 'static,
{
    Rule::new(name, move |expr: &E| partial(expr).unwrap_or_else(|| expr.clone()))
}

/// Adapt a fallible function into a total rule: any error becomes a no-op.
///
/// This is the only combinator that absorbs rule errors; everywhere else
/// they propagate to the caller.
pub fn tryit<E, Err, F>(name: impl Into<Cow<'static, str>>, fallible: F) -> Rule<E>
where
    E: Clone + 'static,
    Err: fmt::Display,
    F: Fn(&E) -> Result<E, Err> + 'static,
{
    let name = name.into();
    let for_log = name.clone();
    Rule::new(name, move |expr: &E| match fallible(expr) {
        Ok(result) => result,
        Err(error) => {
            tracing::debug!(rule = %for_log, %error, "rule failed, keeping input");
            expr.clone()
        }
    })
}

/// Invoke `action(rule, input, output)` whenever `rule` has an effect.
///
/// The rule's result is returned either way; the hook fires only when the
/// output differs from the input.
pub fn onaction<E, A>(rule: Rule<E>, action: A) -> Rule<E>
where
    E: Clone + PartialEq + 'static,
    A: Fn(&Rule<E>, &E, &E) + 'static,
{
    Rule::new("onaction", move |expr: &E| {
        let result = rule.apply(expr);
        if result != *expr {
            action(&rule, expr, &result);
        }
        result
    })
}

/// [`onaction`] specialization printing a `Rule / In / Out` record to
/// standard output on every effectful application.
pub fn debug<E>(rule: Rule<E>) -> Rule<E>
where
    E: Clone + PartialEq + fmt::Debug + 'static,
{
    debug_to(rule, debug::stdout_sink())
}

/// Like [`debug`], with an injected sink.
pub fn debug_to<E>(rule: Rule<E>, sink: Sink) -> Rule<E>
where
    E: Clone + PartialEq + fmt::Debug + 'static,
{
    onaction(rule, move |rule: &Rule<E>, input: &E, output: &E| {
        debug::write_record(&sink, rule.name(), input, output);
    })
}

/// Apply every rule to the input and keep the result with the smallest
/// natural ordering. Ties keep the earliest rule's result; an empty rule
/// list behaves as [`identity`].
pub fn minimize<E>(rules: Vec<Rule<E>>) -> Rule<E>
where
    E: Clone + Ord + 'static,
{
    minimize_by(rules, |expr: &E| expr.clone())
}

/// [`minimize`] under an explicit objective (e.g. negate it to maximize).
pub fn minimize_by<E, O, F>(rules: Vec<Rule<E>>, objective: F) -> Rule<E>
where
    E: Clone + 'static,
    O: Ord,
    F: Fn(&E) -> O + 'static,
{
    Rule::new("minimize", move |expr: &E| {
        let mut best: Option<(O, E)> = None;
        for rule in &rules {
            let result = rule.apply(expr);
            let score = objective(&result);
            // Strict comparison: ties keep the earliest rule's result.
            let replace = match &best {
                Some((best_score, _)) => score < *best_score,
                None => true,
            };
            if replace {
                best = Some((score, result));
            }
        }
        match best {
            Some((_, result)) => result,
            None => expr.clone(),
        }
    })
}
