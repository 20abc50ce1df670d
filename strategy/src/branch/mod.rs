//! Nondeterministic rewrite rules and their combinators.
//!
//! A [`BranchRule`] maps an expression to a *lazy* sequence of candidate
//! results; yielding nothing means "no branch fired". Laziness is load
//! bearing: [`do_one`] stops probing rules as soon as one yields, and
//! [`exhaust`]'s search over the rewrite graph can be abandoned by the
//! consumer at any point without doing unbounded work. The combinators are
//! therefore implemented as explicit iterator state machines rather than
//! eager collections.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use crate::debug::{self, Sink};
use crate::rule::Rule;

pub mod traverse;

/// Lazy sequence of candidate rewrites.
pub type BranchIter<E> = Box<dyn Iterator<Item = E>>;

/// A named rewrite step producing zero or more candidate results.
///
/// Cheap to clone: the payload is reference-counted.
pub struct BranchRule<E> {
    name: Cow<'static, str>,
    run: Rc<dyn Fn(&E) -> BranchIter<E>>,
}

impl<E> Clone for BranchRule<E> {
    fn clone(&self) -> Self {
        Self { name: self.name.clone(), run: Rc::clone(&self.run) }
    }
}

impl<E> fmt::Debug for BranchRule<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BranchRule").field(&self.name).finish()
    }
}

impl<E> BranchRule<E> {
    /// Wrap a generator function as a named branching rule.
    pub fn new(name: impl Into<Cow<'static, str>>, run: impl Fn(&E) -> BranchIter<E> + 'static) -> Self {
        Self { name: name.into(), run: Rc::new(run) }
    }

    /// Display name, used by [`onaction`] hooks and the debug sink.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Produce the candidate sequence for `expr`. No work happens until the
    /// returned iterator is pulled.
    pub fn apply(&self, expr: &E) -> BranchIter<E> {
        (self.run)(expr)
    }
}

/// Yields exactly the input.
pub fn identity<E: Clone + 'static>() -> BranchRule<E> {
    BranchRule::new("identity", |expr: &E| Box::new(std::iter::once(expr.clone())) as BranchIter<E>)
}

/// Lift a deterministic rule into a branching rule yielding exactly one
/// result.
pub fn yieldify<E: Clone + 'static>(rule: Rule<E>) -> BranchRule<E> {
    BranchRule::new("yieldify", move |expr: &E| Box::new(std::iter::once(rule.apply(expr))) as BranchIter<E>)
}

/// Nondeterministic sequential composition.
///
/// Every output of the first rule is fed through the chain of the remaining
/// rules; the overall sequence enumerates, depth first, every path through
/// the pipeline. An empty list yields the input once.
pub fn chain<E: Clone + 'static>(rules: Vec<BranchRule<E>>) -> BranchRule<E> {
    BranchRule::new("chain", move |expr: &E| chain_iter(&rules, expr))
}

fn chain_iter<E: Clone + 'static>(rules: &[BranchRule<E>], expr: &E) -> BranchIter<E> {
    let Some((head, tail)) = rules.split_first() else {
        return Box::new(std::iter::once(expr.clone()));
    };
    let tail = tail.to_vec();
    Box::new(head.apply(expr).flat_map(move |next| chain_iter(&tail, &next)))
}

/// Streams the results of the first rule that yields anything.
///
/// Rules after the committed one are never invoked; rules that yield nothing
/// are skipped over. Probing happens only as the consumer pulls.
struct DoOne<E> {
    input: E,
    pending: std::vec::IntoIter<BranchRule<E>>,
    current: Option<BranchIter<E>>,
    committed: bool,
}

impl<E: Clone + 'static> Iterator for DoOne<E> {
    type Item = E;

    fn next(&mut self) -> Option<E> {
        loop {
            if let Some(current) = self.current.as_mut() {
                match current.next() {
                    Some(item) => {
                        self.committed = true;
                        return Some(item);
                    }
                    None if self.committed => return None,
                    None => self.current = None,
                }
            }
            let rule = self.pending.next()?;
            self.current = Some(rule.apply(&self.input));
        }
    }
}

/// Yield all results of the first rule (in argument order) that yields at
/// least one result.
pub fn do_one<E: Clone + 'static>(rules: Vec<BranchRule<E>>) -> BranchRule<E> {
    BranchRule::new("do_one", move |expr: &E| {
        Box::new(DoOne {
            input: expr.clone(),
            pending: rules.clone().into_iter(),
            current: None,
            committed: false,
        }) as BranchIter<E>
    })
}

/// Union of several rules' outputs, deduplicated by equality.
struct Multiplex<E> {
    input: E,
    pending: std::vec::IntoIter<BranchRule<E>>,
    current: Option<BranchIter<E>>,
    seen: HashSet<E>,
}

impl<E: Clone + Eq + Hash + 'static> Iterator for Multiplex<E> {
    type Item = E;

    fn next(&mut self) -> Option<E> {
        loop {
            if let Some(current) = self.current.as_mut() {
                for item in current.by_ref() {
                    if self.seen.insert(item.clone()) {
                        return Some(item);
                    }
                }
                self.current = None;
            }
            let rule = self.pending.next()?;
            self.current = Some(rule.apply(&self.input));
        }
    }
}

/// Multiplex many branching rules into one: the concatenation of all result
/// sequences with duplicates dropped (first occurrence wins).
pub fn multiplex<E: Clone + Eq + Hash + 'static>(rules: Vec<BranchRule<E>>) -> BranchRule<E> {
    BranchRule::new("multiplex", move |expr: &E| {
        Box::new(Multiplex {
            input: expr.clone(),
            pending: rules.clone().into_iter(),
            current: None,
            seen: HashSet::new(),
        }) as BranchIter<E>
    })
}

struct Frame<E> {
    node: E,
    successors: BranchIter<E>,
    expanded: bool,
}

/// Depth-first fixed-point search over the rewrite graph.
///
/// `seen` bounds the search: each expression is expanded at most once, so
/// cyclic rewrite graphs terminate. A popped frame that discovered no new
/// successor is a dead end of the search and gets yielded.
struct Exhaust<E> {
    rule: BranchRule<E>,
    seen: HashSet<E>,
    stack: Vec<Frame<E>>,
}

impl<E: Clone + Eq + Hash + 'static> Iterator for Exhaust<E> {
    type Item = E;

    fn next(&mut self) -> Option<E> {
        loop {
            let frame = self.stack.last_mut()?;
            match frame.successors.next() {
                Some(next) => {
                    if self.seen.insert(next.clone()) {
                        frame.expanded = true;
                        tracing::trace!(rule = self.rule.name(), depth = self.stack.len(), "exhaust expands");
                        let successors = self.rule.apply(&next);
                        self.stack.push(Frame { node: next, successors, expanded: false });
                    }
                }
                None => {
                    if let Some(done) = self.stack.pop()
                        && !done.expanded
                    {
                        return Some(done.node);
                    }
                }
            }
        }
    }
}

/// Re-apply `rule` to every newly produced, not-yet-seen result, yielding
/// the expressions from which no further distinct rewrite is reachable.
///
/// The seen-set (seeded with the input) bounds revisits, not the size of the
/// reachable set itself. An input with no distinct successors yields itself
/// once.
pub fn exhaust<E: Clone + Eq + Hash + 'static>(rule: BranchRule<E>) -> BranchRule<E> {
    let inner = rule;
    BranchRule::new("exhaust", move |expr: &E| {
        let mut seen = HashSet::new();
        seen.insert(expr.clone());
        let successors = inner.apply(expr);
        Box::new(Exhaust {
            rule: inner.clone(),
            seen,
            stack: vec![Frame { node: expr.clone(), successors, expanded: false }],
        }) as BranchIter<E>
    })
}

/// Delegate to `rule` iff `pred` holds; otherwise yield nothing.
pub fn condition<E, P>(pred: P, rule: BranchRule<E>) -> BranchRule<E>
where
    E: Clone + 'static,
    P: Fn(&E) -> bool + 'static,
{
    BranchRule::new("condition", move |expr: &E| {
        if pred(expr) { rule.apply(expr) } else { Box::new(std::iter::empty()) }
    })
}

/// Keep only the results satisfying `pred`, preserving order.
pub fn sfilter<E, P>(pred: P, rule: BranchRule<E>) -> BranchRule<E>
where
    E: Clone + 'static,
    P: Fn(&E) -> bool + 'static,
{
    let pred = Rc::new(pred);
    BranchRule::new("sfilter", move |expr: &E| {
        let pred = Rc::clone(&pred);
        Box::new(rule.apply(expr).filter(move |item| pred(item))) as BranchIter<E>
    })
}

struct NotEmpty<E> {
    inner: BranchIter<E>,
    fallback: Option<E>,
    yielded: bool,
}

impl<E> Iterator for NotEmpty<E> {
    type Item = E;

    fn next(&mut self) -> Option<E> {
        match self.inner.next() {
            Some(item) => {
                self.yielded = true;
                self.fallback = None;
                Some(item)
            }
            None if !self.yielded => {
                self.yielded = true;
                self.fallback.take()
            }
            None => None,
        }
    }
}

/// Pass `rule`'s results through; if it yields nothing, yield the input
/// itself as a fallback.
pub fn notempty<E: Clone + 'static>(rule: BranchRule<E>) -> BranchRule<E> {
    BranchRule::new("notempty", move |expr: &E| {
        Box::new(NotEmpty { inner: rule.apply(expr), fallback: Some(expr.clone()), yielded: false })
            as BranchIter<E>
    })
}

/// Invoke `action(rule, input, result)` for every yielded result that
/// differs from the input. Results pass through untouched.
pub fn onaction<E, A>(rule: BranchRule<E>, action: A) -> BranchRule<E>
where
    E: Clone + PartialEq + 'static,
    A: Fn(&BranchRule<E>, &E, &E) + 'static,
{
    let action = Rc::new(action);
    let inner = rule;
    BranchRule::new("onaction", move |expr: &E| {
        let input = expr.clone();
        let action = Rc::clone(&action);
        let rule = inner.clone();
        Box::new(inner.apply(expr).map(move |result| {
            if result != input {
                action(&rule, &input, &result);
            }
            result
        })) as BranchIter<E>
    })
}

/// [`onaction`] specialization printing a `Rule / In / Out` record to
/// standard output for every differing result.
pub fn debug<E>(rule: BranchRule<E>) -> BranchRule<E>
where
    E: Clone + PartialEq + fmt::Debug + 'static,
{
    debug_to(rule, debug::stdout_sink())
}

/// Like [`debug`], with an injected sink.
pub fn debug_to<E>(rule: BranchRule<E>, sink: Sink) -> BranchRule<E>
where
    E: Clone + PartialEq + fmt::Debug + 'static,
{
    onaction(rule, move |rule: &BranchRule<E>, input: &E, output: &E| {
        debug::write_record(&sink, rule.name(), input, output);
    })
}
