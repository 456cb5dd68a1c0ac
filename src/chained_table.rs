//! ChainedTable: separate-chaining hash engine shared by `HashMap` and
//! `HashSet`.
//!
//! Entries live in a slotmap arena; each bucket holds the head of a singly
//! linked chain threaded through the entries' `next` handles. New entries are
//! prepended to their chain.
//!
//! Load tracking
//! - `load` is a running estimate of `len / capacity`, bumped by
//!   `1 / capacity` on every insert and lowered by the same on every removal,
//!   so checking it never walks the table.
//! - The load check itself only runs once per check interval of mutations.
//!   The interval is `min(config.interval(), capacity)`, which keeps small
//!   tables from overfilling before their first check.
//! - When a due check finds `load >= threshold` and the table is below its
//!   ceiling, the bucket array doubles (clamped to the ceiling) and every
//!   entry is relinked into the new array.
//!
//! Rehash invariant
//! - Each entry stores the `u64` hash computed on insert; resizing relinks by
//!   the stored hash and never calls the caller's hash function.
//! - The new bucket array is reserved fallibly. If the reservation fails the
//!   resize is skipped and the table keeps its old capacity with every entry
//!   intact.

use crate::config::TableConfig;
use crate::error::{Error, Put, Result};
use crate::order::{DefaultHashing, KeyHasher};
use crate::reentrancy::DebugReentrancy;
use core::fmt;
use core::mem;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable handle of an entry inside one [`ChainedTable`].
    pub struct EntryId;
}

const MAX_ENTRIES: usize = (u32::MAX - 1) as usize;

#[derive(Clone, Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    hash: u64,
    next: Option<EntryId>,
}

#[derive(Clone)]
pub struct ChainedTable<K, V, H = DefaultHashing> {
    buckets: Vec<Option<EntryId>>,
    entries: SlotMap<EntryId, Entry<K, V>>,
    hasher: H,
    config: TableConfig,
    load: f64,
    mutations: usize,
    reentrancy: DebugReentrancy,
}

impl<K, V, H> ChainedTable<K, V, H>
where
    H: KeyHasher<K>,
{
    pub fn with_config_and_hasher(config: TableConfig, hasher: H) -> Self {
        let config = config.normalized();
        Self {
            buckets: vec![None; config.initial_capacity()],
            entries: SlotMap::with_key(),
            hasher,
            config,
            load: 0.0,
            mutations: 0,
            reentrancy: DebugReentrancy::new(),
        }
    }

    /// Like [`with_config_and_hasher`](Self::with_config_and_hasher), but
    /// reports `AllocationFailure` instead of aborting when the initial
    /// bucket array cannot be allocated.
    pub fn try_with_config_and_hasher(config: TableConfig, hasher: H) -> Result<Self> {
        let config = config.normalized();
        let buckets = alloc_buckets(config.initial_capacity()).ok_or(Error::AllocationFailure)?;
        Ok(Self {
            buckets,
            entries: SlotMap::with_key(),
            hasher,
            config,
            load: 0.0,
            mutations: 0,
            reentrancy: DebugReentrancy::new(),
        })
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Scan the key's chain.
    pub fn find(&self, key: &K) -> Option<EntryId> {
        let _g = self.reentrancy.enter();
        self.scan(self.hasher.hash(key), key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let id = self.find(key)?;
        self.entries.get(id).map(|e| &e.value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.find(key)?;
        self.entries.get_mut(id).map(|e| &mut e.value)
    }

    /// Insert `key`, or swap the value of the existing equal key in place.
    ///
    /// A due load check runs first and may grow the table. Fails only when
    /// the entry arena cannot address another entry; the table is then
    /// unchanged apart from a possible resize.
    pub fn insert(&mut self, key: K, value: V) -> Result<Put<V>> {
        self.run_due_check();

        let g = self.reentrancy.enter();
        let hash = self.hasher.hash(&key);
        if let Some(id) = self.scan(hash, &key) {
            let old = mem::replace(&mut self.entries[id].value, value);
            self.mutations += 1;
            return Ok(Put::Replaced(old));
        }
        drop(g);
        self.link(key, value, hash).map(|()| Put::Inserted)
    }

    /// Insert `key` only when no equal key is stored.
    ///
    /// The key is hashed once. On `AlreadyExists` nothing changes: no value
    /// swap, no mutation count, no load check.
    pub fn insert_new(&mut self, key: K, value: V) -> Result<()> {
        let hash = {
            let _g = self.reentrancy.enter();
            let hash = self.hasher.hash(&key);
            if self.scan(hash, &key).is_some() {
                return Err(Error::AlreadyExists);
            }
            hash
        };
        self.run_due_check();
        self.link(key, value, hash)
    }

    /// Unlink `key` from its chain and hand back the entry.
    pub fn remove(&mut self, key: &K) -> Option<(K, V)> {
        let _g = self.reentrancy.enter();
        let hash = self.hasher.hash(key);
        let idx = self.index(hash);
        let mut prev: Option<EntryId> = None;
        let mut cur = self.buckets[idx];
        let found = loop {
            let id = cur?;
            let e = &self.entries[id];
            if e.hash == hash && self.hasher.equivalent(&e.key, key) {
                break id;
            }
            prev = Some(id);
            cur = e.next;
        };

        let entry = self.entries.remove(found)?;
        match prev {
            None => self.buckets[idx] = entry.next,
            Some(p) => self.entries[p].next = entry.next,
        }
        self.load = (self.load - 1.0 / self.buckets.len() as f64).max(0.0);
        self.mutations += 1;
        Some((entry.key, entry.value))
    }

    fn scan(&self, hash: u64, key: &K) -> Option<EntryId> {
        let mut cur = self.buckets[self.index(hash)];
        while let Some(id) = cur {
            let e = &self.entries[id];
            if e.hash == hash && self.hasher.equivalent(&e.key, key) {
                return Some(id);
            }
            cur = e.next;
        }
        None
    }
}

impl<K, V, H> ChainedTable<K, V, H> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Running estimate of `len / capacity`.
    pub fn load(&self) -> f64 {
        self.load
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Load threshold that triggers growth.
    pub fn load_factor(&self) -> f64 {
        self.config.threshold()
    }

    pub fn entry(&self, id: EntryId) -> Option<(&K, &V)> {
        self.entries.get(id).map(|e| (&e.key, &e.value))
    }

    /// Length of the longest chain.
    pub fn longest_chain(&self) -> usize {
        self.buckets
            .iter()
            .map(|&head| {
                let mut n = 0;
                let mut cur = head;
                while let Some(id) = cur {
                    n += 1;
                    cur = self.entries[id].next;
                }
                n
            })
            .max()
            .unwrap_or(0)
    }

    /// Walk buckets in index order, each chain head to tail.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: &self.buckets,
            entries: &self.entries,
            bucket: 0,
            cur: None,
            remaining: self.entries.len(),
        }
    }

    /// Drop every entry. The bucket array keeps its size.
    pub fn clear(&mut self) {
        log::trace!("chained-table: clearing {} entries", self.entries.len());
        self.entries.clear();
        self.buckets.fill(None);
        self.load = 0.0;
        self.mutations = 0;
    }

    /// Empty the table, handing every entry to `f` in iteration order. The
    /// bucket array keeps its size.
    pub fn clear_with<F>(&mut self, mut f: F)
    where
        F: FnMut(K, V),
    {
        log::trace!("chained-table: releasing {} entries", self.entries.len());
        for idx in 0..self.buckets.len() {
            let mut cur = self.buckets[idx].take();
            while let Some(entry) = cur.and_then(|id| self.entries.remove(id)) {
                cur = entry.next;
                f(entry.key, entry.value);
            }
        }
        self.entries.clear();
        self.load = 0.0;
        self.mutations = 0;
    }

    fn run_due_check(&mut self) {
        if self.mutations >= self.check_interval() {
            self.mutations = 0;
            self.maybe_grow();
        }
    }

    /// Prepend a new entry to its chain.
    fn link(&mut self, key: K, value: V, hash: u64) -> Result<()> {
        if self.entries.len() >= MAX_ENTRIES {
            log::warn!("chained-table: entry arena full at {} entries", self.entries.len());
            return Err(Error::AllocationFailure);
        }
        let idx = self.index(hash);
        let id = self.entries.insert(Entry {
            key,
            value,
            hash,
            next: self.buckets[idx],
        });
        self.buckets[idx] = Some(id);
        self.load += 1.0 / self.buckets.len() as f64;
        self.mutations += 1;
        Ok(())
    }

    fn index(&self, hash: u64) -> usize {
        (hash % self.buckets.len() as u64) as usize
    }

    fn check_interval(&self) -> usize {
        self.config.interval().min(self.buckets.len())
    }

    fn maybe_grow(&mut self) {
        let capacity = self.buckets.len();
        if self.load < self.config.threshold() {
            return;
        }
        if capacity >= self.config.ceiling() {
            log::trace!(
                "chained-table: load {:.3} over threshold but capacity {} is at the ceiling",
                self.load,
                capacity
            );
            return;
        }
        let new_capacity = capacity.saturating_mul(2).min(self.config.ceiling());
        let Some(mut buckets) = alloc_buckets(new_capacity) else {
            log::warn!(
                "chained-table: could not allocate {} buckets, keeping {}",
                new_capacity,
                capacity
            );
            return;
        };

        for head in mem::take(&mut self.buckets) {
            let mut cur = head;
            while let Some(id) = cur {
                let entry = &mut self.entries[id];
                cur = entry.next;
                let idx = (entry.hash % new_capacity as u64) as usize;
                entry.next = buckets[idx];
                buckets[idx] = Some(id);
            }
        }
        self.buckets = buckets;
        // Halves on a plain doubling.
        self.load *= capacity as f64 / new_capacity as f64;
        log::debug!(
            "chained-table: resized {} -> {} buckets for {} entries",
            capacity,
            new_capacity,
            self.entries.len()
        );
    }
}

fn alloc_buckets(capacity: usize) -> Option<Vec<Option<EntryId>>> {
    let mut buckets = Vec::new();
    buckets.try_reserve_exact(capacity).ok()?;
    buckets.resize(capacity, None);
    Some(buckets)
}

impl<K: fmt::Debug, V: fmt::Debug, H> fmt::Debug for ChainedTable<K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Borrowing iterator over a [`ChainedTable`] in bucket order.
pub struct Iter<'a, K, V> {
    buckets: &'a [Option<EntryId>],
    entries: &'a SlotMap<EntryId, Entry<K, V>>,
    bucket: usize,
    cur: Option<EntryId>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(id) = self.cur {
                let entries = self.entries;
                let e = &entries[id];
                self.cur = e.next;
                self.remaining -= 1;
                return Some((&e.key, &e.value));
            }
            if self.bucket >= self.buckets.len() {
                return None;
            }
            self.cur = self.buckets[self.bucket];
            self.bucket += 1;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets,
            entries: self.entries,
            bucket: self.bucket,
            cur: self.cur,
            remaining: self.remaining,
        }
    }
}
