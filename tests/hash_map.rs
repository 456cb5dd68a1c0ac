// HashMap / HashSet integration suite.
//
// Core invariants exercised:
// - Membership: contains reflects the most recent put/remove of each key.
// - Growth: a small table doubles under load and never loses or duplicates
//   entries while doing so.
// - Capacity: clear keeps the bucket array; nothing ever shrinks it.
// - Set add rejects duplicates without touching the set.
use assoc_containers::{Error, FnHashing, HashMap, HashSet, Put, TableConfig};
use std::collections::BTreeMap;

// Test: 26 keys into a map that starts with 4 buckets.
// Verifies: at least one doubling, and every key keeps its last value.
#[test]
fn small_map_doubles_and_keeps_values() {
    let mut m = HashMap::with_config(TableConfig::default().capacity(4).load_factor(0.75));
    for (i, c) in ('a'..='z').enumerate() {
        assert_eq!(m.put(c.to_string(), i), Ok(Put::Inserted));
    }
    assert!(m.capacity() >= 8, "capacity {}", m.capacity());
    assert_eq!(m.capacity() % 4, 0);
    for (i, c) in ('a'..='z').enumerate() {
        assert_eq!(m.get(&c.to_string()), Some(&i));
    }
}

// Test: adding the same element twice.
// Verifies: Ok then AlreadyExists, final size 1.
#[test]
fn set_add_twice() {
    let mut s = HashSet::new();
    assert_eq!(s.add(42u64), Ok(()));
    assert_eq!(s.add(42u64), Err(Error::AlreadyExists));
    assert_eq!(s.len(), 1);
}

// Test: non-positive hints fall back to defaults.
#[test]
fn zero_hints_use_defaults() {
    let m: HashMap<u8, u8> = HashMap::with_config(
        TableConfig::default()
            .capacity(0)
            .load_factor(-1.0)
            .check_interval(0),
    );
    assert_eq!(m.capacity(), assoc_containers::DEFAULT_CAPACITY);
    assert_eq!(m.config().threshold(), assoc_containers::DEFAULT_LOAD_FACTOR);
    assert_eq!(m.config().interval(), assoc_containers::DEFAULT_CHECK_INTERVAL);
}

// Test: membership follows the latest operation on each key.
#[test]
fn membership_follows_latest_operation() {
    let mut m = HashMap::with_config(TableConfig::default().capacity(2));
    let mut model = BTreeMap::new();
    let mut x = 7u64;
    for _ in 0..5_000 {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        let k = (x >> 33) % 700;
        if x & 1 == 0 {
            let _ = m.put(k, x);
            model.insert(k, x);
        } else {
            assert_eq!(m.remove(&k).ok(), model.remove(&k));
        }
    }
    assert_eq!(m.len(), model.len());
    for (k, v) in &model {
        assert_eq!(m.get(k), Some(v));
    }
    let mut seen: Vec<u64> = m.keys().copied().collect();
    seen.sort_unstable();
    assert_eq!(seen, model.keys().copied().collect::<Vec<_>>());
}

// Test: clear on an empty map and on a grown map.
// Verifies: size 0 afterward and capacity unchanged.
#[test]
fn clear_keeps_capacity() {
    let mut m: HashMap<u32, u32> = HashMap::new();
    m.clear();
    assert_eq!(m.len(), 0);
    assert_eq!(m.capacity(), 16);

    m.extend((0..200).map(|i| (i, i)));
    let cap = m.capacity();
    assert!(cap > 16);
    m.clear();
    assert_eq!(m.len(), 0);
    assert_eq!(m.capacity(), cap);
    assert_eq!(m.iter().count(), 0);
    assert_eq!(m.remove(&1), Err(Error::Empty));
}

// Test: export to a snapshot and rebuild.
// Verifies: the rebuilt set has exactly the same members.
#[test]
fn snapshot_round_trip() {
    let s: HashSet<String> = (0..100).map(|i| format!("item-{i}")).collect();
    let rebuilt: HashSet<String> = s.snapshot().collect();
    assert_eq!(rebuilt.len(), 100);
    assert!(s.iter().all(|k| rebuilt.contains(k)));
}

// Test: a ceiling caps growth; the table then degrades to longer chains.
#[test]
fn ceiling_caps_growth() {
    let mut m = HashMap::with_config(TableConfig::default().capacity(4).max_capacity(32));
    for i in 0..1_000u32 {
        m.put(i, i).unwrap();
    }
    assert_eq!(m.capacity(), 32);
    assert!((0..1_000).all(|i| m.get(&i) == Some(&i)));
}

// Test: caller hash and equality closures.
// Verifies: keys equal under the closure share one entry.
#[test]
fn closure_hashing_for_sets() {
    let hashing = FnHashing::new(|k: &i64| k.unsigned_abs(), |a: &i64, b: &i64| a.abs() == b.abs());
    let mut s: HashSet<i64, _> = HashSet::with_hasher(hashing);
    assert_eq!(s.add(-3), Ok(()));
    assert_eq!(s.add(3), Err(Error::AlreadyExists));
    assert!(s.contains(&3));
    assert_eq!(s.remove(&3), Ok(-3));
    assert!(s.is_empty());
}

// Test: try_with_config mirrors with_config for reasonable sizes.
#[test]
fn fallible_constructor() {
    let m: Result<HashMap<u8, u8>, Error> = HashMap::try_with_config(TableConfig::default().capacity(64));
    assert_eq!(m.map(|m| m.capacity()), Ok(64));
}
