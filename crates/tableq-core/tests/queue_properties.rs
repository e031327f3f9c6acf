//! Property-based tests for waitlist invariants using proptest.
//!
//! Properties tested:
//! 1. Contiguity: positions are exactly 1..=N after every operation
//! 2. Uniqueness: no username appears twice
//! 3. FIFO: enqueue appends, remove-top takes position 1
//! 4. Insert placement: insert_at(u, p) puts u at index p and shifts the rest
//! 5. Failed operations leave the queue unchanged

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::needless_pass_by_value
)]

use proptest::prelude::*;
use tableq_core::{Error, WaitQueue};

// =============================================================================
// STRATEGIES
// =============================================================================

/// Small name pool so duplicates and misses happen often.
fn username_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("alice".to_string()),
        Just("bob".to_string()),
        Just("carol".to_string()),
        Just("dave".to_string()),
        Just("erin".to_string()),
        "[a-z]{3,6}",
    ]
}

#[derive(Debug, Clone)]
enum Op {
    Enqueue(String),
    RemoveByName(String),
    RemoveTop,
    Clear,
    InsertAt(String, usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => username_strategy().prop_map(Op::Enqueue),
        2 => username_strategy().prop_map(Op::RemoveByName),
        2 => Just(Op::RemoveTop),
        1 => Just(Op::Clear),
        3 => (username_strategy(), 0..8usize).prop_map(|(u, p)| Op::InsertAt(u, p)),
    ]
}

/// Apply an op to both the queue and a plain Vec model.
fn apply(queue: &mut WaitQueue, model: &mut Vec<String>, op: &Op) -> Result<(), Error> {
    match op {
        Op::Enqueue(u) => {
            queue.enqueue(u)?;
            model.push(u.clone());
        }
        Op::RemoveByName(u) => {
            queue.remove_by_name(u)?;
            model.retain(|m| m != u);
        }
        Op::RemoveTop => {
            let removed = queue.remove_top()?;
            assert_eq!(removed, model.remove(0));
        }
        Op::Clear => {
            queue.clear();
            model.clear();
        }
        Op::InsertAt(u, p) => {
            queue.insert_at(u, *p)?;
            model.insert(p - 1, u.clone());
        }
    }
    Ok(())
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_invariants_hold_after_every_operation(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut queue = WaitQueue::new();
        let mut model: Vec<String> = Vec::new();

        for op in &ops {
            let before = queue.clone();
            match apply(&mut queue, &mut model, op) {
                Ok(()) => {}
                Err(_) => prop_assert_eq!(&queue, &before, "failed {:?} changed the queue", op),
            }

            prop_assert!(queue.is_consistent(), "inconsistent after {:?}", op);
            prop_assert_eq!(queue.snapshot(), model.clone());

            let positions: Vec<usize> = queue.entries().iter().map(|e| e.position).collect();
            let expected: Vec<usize> = (1..=queue.len()).collect();
            prop_assert_eq!(positions, expected);
        }
    }

    #[test]
    fn prop_enqueue_assigns_max_plus_one(names in prop::collection::hash_set("[a-z]{3,8}", 1..20)) {
        let mut queue = WaitQueue::new();
        for (idx, name) in names.iter().enumerate() {
            let position = queue.enqueue(name).unwrap();
            prop_assert_eq!(position, idx + 1);
        }
    }

    #[test]
    fn prop_remove_top_is_fifo(names in prop::collection::hash_set("[a-z]{3,8}", 1..20)) {
        let names: Vec<String> = names.into_iter().collect();
        let mut queue = WaitQueue::new();
        for name in &names {
            queue.enqueue(name).unwrap();
        }
        for name in &names {
            prop_assert_eq!(&queue.remove_top().unwrap(), name);
        }
        prop_assert_eq!(queue.remove_top(), Err(Error::QueueEmpty));
    }

    #[test]
    fn prop_insert_at_places_exactly(
        names in prop::collection::hash_set("[a-z]{3,8}", 0..12),
        slot in 0usize..100,
    ) {
        let names: Vec<String> = names.into_iter().collect();
        let mut queue = WaitQueue::new();
        for name in &names {
            queue.enqueue(name).unwrap();
        }

        let position = slot % (names.len() + 1) + 1;
        queue.insert_at("new-comer", position).unwrap();

        let snapshot = queue.snapshot();
        prop_assert_eq!(&snapshot[position - 1], "new-comer");
        prop_assert_eq!(&snapshot[..position - 1], &names[..position - 1]);
        prop_assert_eq!(&snapshot[position..], &names[position - 1..]);
        prop_assert!(queue.is_consistent());
    }

    #[test]
    fn prop_remove_by_name_twice_fails_second(names in prop::collection::hash_set("[a-z]{3,8}", 1..12), pick in 0usize..100) {
        let names: Vec<String> = names.into_iter().collect();
        let mut queue = WaitQueue::new();
        for name in &names {
            queue.enqueue(name).unwrap();
        }
        let target = &names[pick % names.len()];

        queue.remove_by_name(target).unwrap();
        let after_first = queue.clone();
        prop_assert_eq!(queue.remove_by_name(target), Err(Error::NotQueued(target.clone())));
        prop_assert_eq!(queue, after_first);
    }
}
