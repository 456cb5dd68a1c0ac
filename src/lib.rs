//! assoc-containers: ordered and hashed associative containers with
//! status-style errors, snapshot iteration and an optional coarse lock.
//!
//! Internal Design:
//!
//! Summary
//! - Two engines, four façades, one wrapper.
//! - Engines:
//!   - `RbTree<K, V, C>`: red-black tree over a slotmap arena. Nodes hold
//!     non-owning parent/child handles; rotations and fixups rewrite
//!     handles, never move nodes.
//!   - `ChainedTable<K, V, H>`: separate-chaining hash table whose entries
//!     live in a slotmap arena and whose buckets hold chain heads. Growth is
//!     driven by a running load estimate checked once per interval of
//!     mutations.
//! - Façades: `TreeMap`/`TreeSet` over `RbTree`, `HashMap`/`HashSet` over
//!   `ChainedTable`. Sets store `()` values.
//! - `Locked<C>` puts any of them behind a re-entrant mutex.
//!
//! Constraints
//! - Engines are single-threaded and assume exclusive access per call.
//! - Every fallible operation returns `Result<_, Error>`; a failed call
//!   leaves the container as it was.
//! - `put` on an existing key replaces in place; set `add` of a present
//!   element reports `AlreadyExists` and changes nothing.
//! - Comparators and hashers are caller-supplied through the
//!   [`Comparator`] and [`KeyHasher`] traits; closures implement both
//!   shapes.
//!
//! Reentrancy policy
//! - Engine methods run caller code (comparator, hash, equality) while
//!   links may be half-updated. A debug-only guard turns a nested call into
//!   the same engine into a panic. Release builds carry no guard.
//! - `Locked` uses a re-entrant lock, so the thread holding it may call
//!   back into the same wrapper, e.g. while consuming a `LockedIter`.
//!
//! Hasher and rehashing invariants
//! - Each hash entry stores the `u64` hash computed on insert; growth
//!   relinks by the stored hash and never calls the hash function again.
//!
//! Tree deletion
//! - Removing a node with two children moves its in-order predecessor's
//!   entry into that node and unlinks the predecessor's slot instead.
//!
//! Notes and non-goals
//! - No persistent (path-copying) variants and no range views.
//! - No shrinking: `clear` keeps the bucket array.
//! - Linear containers (vectors, deques, lists, strings) are left to `std`.
//!
//! Logging
//! - The crate logs through the `log` facade and never installs a logger.
//!   Resizes are `debug`, skipped growth and bulk releases are `trace`,
//!   allocation failures are `warn`.

mod config;
mod engine_proptest;
mod error;
mod hash_map;
mod hash_set;
mod order;
mod reentrancy;
mod snapshot;
mod sync;
mod tree_map;
mod tree_set;

pub mod chained_table;
pub mod rb_tree;

// Public surface
pub use config::{
    TableConfig, DEFAULT_CAPACITY, DEFAULT_CHECK_INTERVAL, DEFAULT_LOAD_FACTOR, MAX_CAPACITY,
};
pub use error::{Error, Put, Result, Violation};
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use order::{Comparator, DefaultHashing, FnHashing, KeyHasher, NaturalOrder};
pub use rb_tree::Color;
pub use snapshot::Snapshot;
pub use sync::{Locked, LockedIter, SyncHashMap, SyncHashSet, SyncTreeMap, SyncTreeSet};
pub use tree_map::TreeMap;
pub use tree_set::TreeSet;

/// Borrowing iterators of the façades.
pub mod iter {
    pub use crate::hash_map::Iter as HashMapIter;
    pub use crate::hash_set::Iter as HashSetIter;
    pub use crate::tree_map::Iter as TreeMapIter;
    pub use crate::tree_set::Iter as TreeSetIter;
}
