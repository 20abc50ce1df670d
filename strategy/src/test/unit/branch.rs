//! Unit tests for the branching combinator library.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::branch::{
    BranchIter, BranchRule, chain, condition, debug_to, do_one, exhaust, identity, multiplex,
    notempty, onaction, sfilter, yieldify,
};
use crate::rule::Rule;

fn collect(rule: &BranchRule<i64>, input: i64) -> Vec<i64> {
    rule.apply(&input).collect()
}

/// Yields `x + 1` and `x + 2`.
fn succ_pair() -> BranchRule<i64> {
    BranchRule::new("succ_pair", |x: &i64| {
        let x = *x;
        Box::new([x + 1, x + 2].into_iter()) as BranchIter<i64>
    })
}

fn barren() -> BranchRule<i64> {
    BranchRule::new("barren", |_: &i64| Box::new(std::iter::empty()) as BranchIter<i64>)
}

#[test]
fn identity_yields_exactly_the_input() {
    assert_eq!(collect(&identity(), 5), vec![5]);
}

#[test]
fn yieldify_yields_the_rules_single_result() {
    let rule = yieldify(Rule::new("inc", |x: &i64| x + 1));
    assert_eq!(collect(&rule, 5), vec![6]);
}

#[test]
fn empty_chain_yields_the_input_once() {
    assert_eq!(collect(&chain(vec![]), 5), vec![5]);
}

#[test]
fn chain_threads_outputs_through_the_pipeline() {
    let scale = BranchRule::new("scale", |x: &i64| {
        Box::new(std::iter::once(x * 10)) as BranchIter<i64>
    });
    assert_eq!(collect(&chain(vec![succ_pair(), scale]), 0), vec![10, 20]);
}

#[test]
fn chain_enumerates_every_path_depth_first() {
    assert_eq!(collect(&chain(vec![succ_pair(), succ_pair()]), 0), vec![2, 3, 3, 4]);
}

#[test]
fn do_one_skips_rules_that_yield_nothing() {
    assert_eq!(collect(&do_one(vec![barren(), succ_pair()]), 0), vec![1, 2]);
}

#[test]
fn do_one_with_nothing_to_yield_is_empty() {
    assert_eq!(collect(&do_one(vec![barren(), barren()]), 0), vec![]);
}

#[test]
fn do_one_never_probes_past_the_first_yielding_rule() {
    let calls = Rc::new(Cell::new(0usize));
    let seen = Rc::clone(&calls);
    let tracked = BranchRule::new("tracked", move |x: &i64| {
        seen.set(seen.get() + 1);
        Box::new(std::iter::once(*x)) as BranchIter<i64>
    });

    let rule = do_one(vec![succ_pair(), tracked]);
    assert_eq!(collect(&rule, 0), vec![1, 2]);
    assert_eq!(calls.get(), 0);
}

#[test]
fn branch_rules_do_no_work_until_pulled() {
    let calls = Rc::new(Cell::new(0usize));
    let seen = Rc::clone(&calls);
    let tracked = BranchRule::new("tracked", move |x: &i64| {
        seen.set(seen.get() + 1);
        Box::new(std::iter::once(x + 1)) as BranchIter<i64>
    });

    let rule = do_one(vec![tracked]);
    let mut results = rule.apply(&0);
    assert_eq!(calls.get(), 0);
    assert_eq!(results.next(), Some(1));
    assert_eq!(calls.get(), 1);
}

#[test]
fn multiplex_drops_duplicates_keeping_first_occurrence() {
    let shifted = BranchRule::new("shifted", |x: &i64| {
        let x = *x;
        Box::new([x + 2, x + 3].into_iter()) as BranchIter<i64>
    });
    assert_eq!(collect(&multiplex(vec![succ_pair(), shifted]), 0), vec![1, 2, 3]);
}

#[test]
fn condition_yields_nothing_when_the_predicate_fails() {
    let rule = condition(|x: &i64| *x > 0, identity());
    assert_eq!(collect(&rule, -1), vec![]);
    assert_eq!(collect(&rule, 1), vec![1]);
}

#[test]
fn sfilter_keeps_matching_results_in_order() {
    let spread = BranchRule::new("spread", |x: &i64| {
        let x = *x;
        Box::new(x + 1..=x + 4) as BranchIter<i64>
    });
    let rule = sfilter(|x: &i64| x % 2 == 0, spread);
    assert_eq!(collect(&rule, 0), vec![2, 4]);
}

#[test]
fn notempty_passes_results_through() {
    assert_eq!(collect(&notempty(succ_pair()), 0), vec![1, 2]);
}

#[test]
fn notempty_falls_back_to_the_input() {
    assert_eq!(collect(&notempty(barren()), 7), vec![7]);
}

/// Decrement toward zero, one branch at a time.
fn dec_branch() -> BranchRule<i64> {
    BranchRule::new("dec_branch", |x: &i64| {
        let x = *x;
        if x > 0 {
            Box::new(std::iter::once(x - 1)) as BranchIter<i64>
        } else {
            Box::new(std::iter::empty()) as BranchIter<i64>
        }
    })
}

#[test]
fn exhaust_walks_a_chain_to_its_fixed_point() {
    assert_eq!(collect(&exhaust(dec_branch()), 5), vec![0]);
}

#[test]
fn exhaust_yields_the_input_when_nothing_is_reachable() {
    assert_eq!(collect(&exhaust(dec_branch()), 0), vec![0]);
}

#[test]
fn exhaust_terminates_on_cycles() {
    // 0 <-> 1 oscillation: the seen-set stops the revisit.
    let flip = BranchRule::new("flip", |x: &i64| {
        Box::new(std::iter::once(1 - *x)) as BranchIter<i64>
    });
    assert_eq!(collect(&exhaust(flip), 0), vec![1]);
}

#[test]
fn exhaust_explores_every_branch() {
    let step = BranchRule::new("step", |x: &i64| {
        let x = *x;
        if x < 4 {
            Box::new([x + 1, x + 2].into_iter()) as BranchIter<i64>
        } else {
            Box::new(std::iter::empty()) as BranchIter<i64>
        }
    });
    // Dead ends reachable from 0 are exactly 4 and 5, depth-first order.
    assert_eq!(collect(&exhaust(step), 0), vec![4, 5]);
}

#[test]
fn onaction_fires_for_each_differing_result() {
    let log: Rc<RefCell<Vec<(i64, i64)>>> = Rc::default();
    let seen = Rc::clone(&log);
    let keep_or_inc = BranchRule::new("keep_or_inc", |x: &i64| {
        let x = *x;
        Box::new([x, x + 1].into_iter()) as BranchIter<i64>
    });
    let rule = onaction(keep_or_inc, move |_rule: &BranchRule<i64>, input: &i64, output: &i64| {
        seen.borrow_mut().push((*input, *output));
    });

    assert_eq!(collect(&rule, 3), vec![3, 4]);
    assert_eq!(log.borrow().as_slice(), &[(3, 4)]);
}

#[test]
fn debug_records_differing_results_on_the_sink() {
    let buffer: Rc<RefCell<Vec<u8>>> = Rc::default();
    let rule = debug_to(succ_pair(), buffer.clone());

    let _ = collect(&rule, 0);
    let written = String::from_utf8(buffer.borrow().clone()).unwrap();
    assert_eq!(written, "Rule: succ_pair\nIn:  0\nOut: 1\n\nRule: succ_pair\nIn:  0\nOut: 2\n\n");
}
