#![cfg(test)]

// Property tests for the two engines, kept inside the crate so they can reach
// engine-level handles and structural checks.

use crate::chained_table::ChainedTable;
use crate::config::TableConfig;
use crate::error::{Error, Put};
use crate::order::{DefaultHashing, KeyHasher};
use crate::rb_tree::RbTree;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::{BuildHasher, Hasher};
use std::ops::Bound::{Excluded, Included, Unbounded};

#[derive(Clone, Debug)]
enum TreeOp {
    Insert(u16, i32),
    Remove(u16),
    PollFirst,
    PollLast,
    Nearest(u16),
    Walk,
}

fn arb_tree_ops() -> impl Strategy<Value = Vec<TreeOp>> {
    // Narrow key range so removes and replaces hit live keys often.
    let key = 0u16..200;
    let op = prop_oneof![
        4 => (key.clone(), any::<i32>()).prop_map(|(k, v)| TreeOp::Insert(k, v)),
        3 => key.clone().prop_map(TreeOp::Remove),
        1 => Just(TreeOp::PollFirst),
        1 => Just(TreeOp::PollLast),
        2 => key.prop_map(TreeOp::Nearest),
        1 => Just(TreeOp::Walk),
    ];
    proptest::collection::vec(op, 1..200)
}

fn key_at<V>(tree: &RbTree<u16, V>, id: Result<crate::rb_tree::NodeId, Error>) -> Result<u16, Error> {
    id.map(|id| *tree.get(id).map(|(k, _)| k).unwrap_or(&u16::MAX))
}

fn model_or<T>(model_empty: bool, found: Option<T>) -> Result<T, Error> {
    match found {
        Some(t) => Ok(t),
        None if model_empty => Err(Error::Empty),
        None => Err(Error::NotFound),
    }
}

// Property: state-machine equivalence of RbTree against BTreeMap.
// - insert reports Inserted/Replaced exactly as the model does.
// - remove and the poll ends hand back the model's entry.
// - floor/ceiling/lower/higher agree with BTreeMap range queries,
//   including the Empty/NotFound split.
// - After every op the red-black invariants hold and len matches.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_rb_tree_matches_btreemap(ops in arb_tree_ops()) {
        let mut sut: RbTree<u16, i32> = RbTree::new();
        let mut model: BTreeMap<u16, i32> = BTreeMap::new();

        for op in ops {
            match op {
                TreeOp::Insert(k, v) => {
                    let expected = match model.insert(k, v) {
                        Some(old) => Put::Replaced(old),
                        None => Put::Inserted,
                    };
                    prop_assert_eq!(sut.insert(k, v), Ok(expected));
                }
                TreeOp::Remove(k) => {
                    prop_assert_eq!(sut.remove(&k), model.remove_entry(&k));
                }
                TreeOp::PollFirst => {
                    let got = sut.first().and_then(|id| sut.delete(id));
                    prop_assert_eq!(got, model.pop_first());
                }
                TreeOp::PollLast => {
                    let got = sut.last().and_then(|id| sut.delete(id));
                    prop_assert_eq!(got, model.pop_last());
                }
                TreeOp::Nearest(k) => {
                    let empty = model.is_empty();
                    let floor = model.range(..=k).next_back().map(|(k, _)| *k);
                    let ceiling = model.range(k..).next().map(|(k, _)| *k);
                    let lower = model.range(..k).next_back().map(|(k, _)| *k);
                    let higher = model.range((Excluded(k), Unbounded)).next().map(|(k, _)| *k);
                    prop_assert_eq!(key_at(&sut, sut.floor(&k)), model_or(empty, floor));
                    prop_assert_eq!(key_at(&sut, sut.ceiling(&k)), model_or(empty, ceiling));
                    prop_assert_eq!(key_at(&sut, sut.lower(&k)), model_or(empty, lower));
                    prop_assert_eq!(key_at(&sut, sut.higher(&k)), model_or(empty, higher));
                    prop_assert_eq!(sut.find(&k).is_some(), model.contains_key(&k));
                }
                TreeOp::Walk => {
                    let fwd: Vec<(u16, i32)> = sut.iter().map(|(k, v)| (*k, *v)).collect();
                    let want: Vec<(u16, i32)> = model.iter().map(|(k, v)| (*k, *v)).collect();
                    prop_assert_eq!(&fwd, &want);
                    let mut back: Vec<(u16, i32)> = sut.iter().rev().map(|(k, v)| (*k, *v)).collect();
                    back.reverse();
                    prop_assert_eq!(back, want);
                    // successor chain from first() visits everything once
                    let mut n = 0;
                    let mut cur = sut.first();
                    while let Some(id) = cur {
                        n += 1;
                        cur = sut.successor(id);
                    }
                    prop_assert_eq!(n, model.len());
                }
            }

            prop_assert!(sut.validate().is_ok());
            prop_assert_eq!(sut.len(), model.len());
        }
    }
}

// Property: a range-bounded nearest query is consistent with the model for
// every query point in a dense window, on a tree built from arbitrary keys.
proptest! {
    #![proptest_config(ProptestConfig { cases: 48, .. ProptestConfig::default() })]
    #[test]
    fn prop_nearest_queries_dense(keys in proptest::collection::btree_set(0i32..400, 1..80)) {
        let mut sut: RbTree<i32, ()> = RbTree::new();
        for &k in &keys {
            sut.insert(k, ()).unwrap();
        }
        let model: BTreeSet<i32> = keys;
        for at in -2..402 {
            let floor = model.range((Unbounded, Included(at))).next_back().copied();
            let got = sut.floor(&at).ok().and_then(|id| sut.get(id)).map(|(k, _)| *k);
            prop_assert_eq!(got, floor);
            let higher = model.range((Excluded(at), Unbounded)).next().copied();
            let got = sut.higher(&at).ok().and_then(|id| sut.get(id)).map(|(k, _)| *k);
            prop_assert_eq!(got, higher);
        }
    }
}

#[derive(Clone, Debug)]
enum TableOp {
    Insert(usize, i32),
    Remove(usize),
    Get(usize),
    Iterate,
    Clear,
}

fn arb_table_scenario() -> impl Strategy<Value = (Vec<String>, Vec<TableOp>)> {
    proptest::collection::vec("[a-z]{0,6}", 1..=64).prop_flat_map(|pool| {
        let idx = 0..pool.len();
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| TableOp::Insert(i, v)),
            3 => idx.clone().prop_map(TableOp::Remove),
            2 => idx.prop_map(TableOp::Get),
            1 => Just(TableOp::Iterate),
            1 => Just(TableOp::Clear),
        ];
        proptest::collection::vec(op, 1..300).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn run_table_state_machine<H>(
    mut sut: ChainedTable<String, i32, H>,
    pool: Vec<String>,
    ops: Vec<TableOp>,
) -> Result<(), TestCaseError>
where
    H: KeyHasher<String>,
{
    let mut model: HashMap<String, i32> = HashMap::new();
    let mut last_capacity = sut.capacity();

    for op in ops {
        match op {
            TableOp::Insert(i, v) => {
                let k = pool[i].clone();
                let expected = match model.insert(k.clone(), v) {
                    Some(old) => Put::Replaced(old),
                    None => Put::Inserted,
                };
                prop_assert_eq!(sut.insert(k, v), Ok(expected));
            }
            TableOp::Remove(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.remove(k), model.remove_entry(k));
            }
            TableOp::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k));
                prop_assert_eq!(sut.contains_key(k), model.contains_key(k));
            }
            TableOp::Iterate => {
                let mut seen = BTreeSet::new();
                for (k, v) in sut.iter() {
                    prop_assert!(seen.insert(k.clone()), "entry yielded twice");
                    prop_assert_eq!(model.get(k), Some(v));
                }
                prop_assert_eq!(seen.len(), model.len());
            }
            TableOp::Clear => {
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.capacity(), last_capacity);
            }
        }

        // Capacity never shrinks and stays under the ceiling.
        prop_assert!(sut.capacity() >= last_capacity);
        prop_assert!(sut.capacity() <= sut.config().ceiling());
        last_capacity = sut.capacity();

        let expected_load = sut.len() as f64 / sut.capacity() as f64;
        prop_assert!((sut.load() - expected_load).abs() < 1e-6);
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
    }
    Ok(())
}

// Property: state-machine equivalence of ChainedTable against
// std::collections::HashMap, starting from a tiny bucket array so growth
// happens mid-sequence.
// - Resizes never lose or duplicate entries.
// - The running load stays equal to len / capacity.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_chained_table_matches_hashmap((pool, ops) in arb_table_scenario()) {
        let sut: ChainedTable<String, i32> = ChainedTable::with_config_and_hasher(
            TableConfig::default().capacity(2).check_interval(7),
            DefaultHashing::default(),
        );
        run_table_state_machine(sut, pool, ops)?;
    }
}

// Collision variant: every key hashes to 0, so every entry shares one chain
// and only equality tells them apart.
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
    #![proptest_config(ProptestConfig { cases: 32, .. ProptestConfig::default() })]
    #[test]
    fn prop_chained_table_with_collisions((pool, ops) in arb_table_scenario()) {
        let sut = ChainedTable::with_config_and_hasher(
            TableConfig::default().capacity(4).max_capacity(16),
            DefaultHashing::with_build_hasher(ConstBuildHasher),
        );
        run_table_state_machine(sut, pool, ops)?;
    }
}
