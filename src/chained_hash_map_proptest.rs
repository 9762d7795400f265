#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so the djb2
// and collision variants can share one scenario runner.

use crate::chained_hash_map::ChainedHashMap;
use crate::error::Error;
use core::hash::{BuildHasher, Hasher};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// keys, pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i64),
    Remove(usize),
    Get(usize),
    Contains(String),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (usize, f64, Vec<String>, Vec<OpI>)> {
    let config = (
        1usize..=8,
        prop_oneof![Just(0.25), Just(0.5), Just(0.7), Just(1.0)],
    );
    (config, proptest::collection::vec("[a-z]{0,5}", 1..=8)).prop_flat_map(
        |((capacity, load_factor), pool)| {
            let idxs: Vec<usize> = (0..pool.len()).collect();
            let idx = proptest::sample::select(idxs);
            let contains_pool = proptest::sample::select(pool.clone());
            let op = prop_oneof![
                (idx.clone(), any::<i64>()).prop_map(|(i, v)| OpI::Insert(i, v)),
                idx.clone().prop_map(OpI::Remove),
                idx.clone().prop_map(OpI::Get),
                prop_oneof![
                    contains_pool.prop_map(|s: String| s),
                    "[a-z]{0,5}".prop_map(|s| s)
                ]
                .prop_map(OpI::Contains),
                Just(OpI::Iterate),
            ];
            proptest::collection::vec(op, 1..60)
                .prop_map(move |ops| (capacity, load_factor, pool.clone(), ops))
        },
    )
}

// State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - insert returns the previous value exactly when the model holds one;
//   `len` never counts a key twice.
// - get/remove report a KeyNotFound carrying the key iff the model
//   misses; a miss never changes the table.
// - `iter` yields each live entry exactly once; the pair set equals the
//   model's pair set.
// - Capacity only grows, stays positive, and any growth lands occupancy
//   back within the load factor.
fn run_scenario<S: BuildHasher>(
    mut sut: ChainedHashMap<S>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i64> = HashMap::new();

    for op in ops {
        let len_before = sut.len();
        let capacity_before = sut.capacity();

        match op {
            OpI::Insert(i, v) => {
                let k = &pool[i];
                let previous = sut.insert(k, v);
                let model_previous = model.insert(k.clone(), v);
                prop_assert_eq!(previous, model_previous);
                if sut.capacity() > capacity_before {
                    // Growth must land the pre-insert occupancy back
                    // within the threshold.
                    prop_assert!(
                        len_before as f64 / sut.capacity() as f64 <= sut.load_factor()
                    );
                }
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                match model.remove(k) {
                    Some(mv) => prop_assert_eq!(sut.remove(k), Ok(mv)),
                    None => {
                        prop_assert_eq!(sut.remove(k), Err(Error::KeyNotFound(k.clone())));
                        prop_assert_eq!(sut.len(), len_before);
                    }
                }
            }
            OpI::Get(i) => {
                let k = &pool[i];
                match model.get(k) {
                    Some(&mv) => prop_assert_eq!(sut.get(k), Ok(mv)),
                    None => prop_assert_eq!(sut.get(k), Err(Error::KeyNotFound(k.clone()))),
                }
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
            }
            OpI::Iterate => {
                let s_pairs: BTreeSet<(String, i64)> =
                    sut.iter().map(|(k, v)| (k.to_owned(), v)).collect();
                let m_pairs: BTreeSet<(String, i64)> =
                    model.iter().map(|(k, &v)| (k.clone(), v)).collect();
                prop_assert_eq!(sut.iter().count(), model.len());
                prop_assert_eq!(s_pairs, m_pairs);
            }
        }

        // Post-conditions after each op
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.capacity() >= capacity_before);
        prop_assert!(sut.capacity() > 0);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((capacity, load_factor, pool, ops) in arb_scenario()) {
        let sut = ChainedHashMap::with_capacity_and_load_factor(capacity, load_factor)
            .expect("generated configuration is valid");
        run_scenario(sut, &pool, ops)?;
    }
}

// Collision variant using a constant hasher, so every key shares one
// chain and equality resolution does all the work.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((capacity, load_factor, pool, ops) in arb_scenario()) {
        let sut = ChainedHashMap::with_hasher(capacity, load_factor, ConstBuildHasher)
            .expect("generated configuration is valid");
        run_scenario(sut, &pool, ops)?;
    }
}
