#![cfg(test)]

// Property tests for ChainTable kept inside the crate so they can inspect
// chains directly.

use crate::chain_table::{bucket_index, ChainTable};
use core::num::NonZeroUsize;
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

#[derive(Clone, Debug)]
enum Op {
    Put(i32, i32),
    Get(i32),
    Remove(i32),
    Contains(i32),
}

// Keys come from a small pool (plus the extremes) so updates, collisions
// and removals of present keys are frequent.
fn arb_key() -> impl Strategy<Value = i32> {
    prop_oneof![
        8 => -12i32..12,
        1 => Just(i32::MIN),
        1 => Just(i32::MAX),
    ]
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        3 => (arb_key(), any::<i32>()).prop_map(|(k, v)| Op::Put(k, v)),
        2 => arb_key().prop_map(Op::Get),
        2 => arb_key().prop_map(Op::Remove),
        1 => arb_key().prop_map(Op::Contains),
    ];
    proptest::collection::vec(op, 1..80)
}

// Structural invariants:
// - every chain terminates within `len` steps (no cycles),
// - each entry sits in the bucket its key hashes to,
// - no key appears twice anywhere,
// - chain lengths sum to `len`.
fn check_structure(t: &ChainTable, capacity: NonZeroUsize) -> Result<(), TestCaseError> {
    let mut seen = HashSet::new();
    let mut total = 0;
    for b in 0..t.bucket_count() {
        let chain: Vec<_> = t.chain(b).take(t.len() + 1).collect();
        prop_assert!(chain.len() <= t.len(), "chain {} does not terminate", b);
        for (k, _) in chain.iter() {
            prop_assert_eq!(bucket_index(*k, capacity), b);
            prop_assert!(seen.insert(*k), "duplicate key {}", k);
        }
        total += chain.len();
    }
    prop_assert_eq!(total, t.len());
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap.
// - `put` returns the model's previous value; `len` grows only on fresh keys.
// - `get`/`contains_key` agree with the model.
// - `remove` returns the model's value exactly once.
// - Structure stays sound after every step.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(capacity in 1usize..=9, ops in arb_ops()) {
        let cap = NonZeroUsize::new(capacity).unwrap();
        let mut sut = ChainTable::new(capacity);
        let mut model: HashMap<i32, i32> = HashMap::new();

        for op in ops {
            match op {
                Op::Put(k, v) => {
                    prop_assert_eq!(sut.put(bucket_index(k, cap), k, v), model.insert(k, v));
                }
                Op::Get(k) => {
                    prop_assert_eq!(sut.get(bucket_index(k, cap), k), model.get(&k).copied());
                }
                Op::Remove(k) => {
                    prop_assert_eq!(sut.remove(bucket_index(k, cap), k), model.remove(&k));
                }
                Op::Contains(k) => {
                    prop_assert_eq!(sut.contains_key(bucket_index(k, cap), k), model.contains_key(&k));
                }
            }
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
            check_structure(&sut, cap)?;
        }
    }
}

// Property: with a single bucket every key collides, so the chain order is
// exactly first-insertion order of the surviving keys.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_single_bucket_keeps_insertion_order(ops in arb_ops()) {
        let mut sut = ChainTable::new(1);
        let mut order: Vec<(i32, i32)> = Vec::new();

        for op in ops {
            match op {
                Op::Put(k, v) => {
                    sut.put(0, k, v);
                    match order.iter_mut().find(|(ok, _)| *ok == k) {
                        Some(slot) => slot.1 = v,
                        None => order.push((k, v)),
                    }
                }
                Op::Remove(k) => {
                    sut.remove(0, k);
                    order.retain(|(ok, _)| *ok != k);
                }
                Op::Get(_) | Op::Contains(_) => {}
            }
            let chain: Vec<_> = sut.chain(0).collect();
            prop_assert_eq!(&chain, &order);
        }
    }
}
