//! HashSet: unordered set over the chained hash engine.

use crate::chained_table::{self, ChainedTable};
use crate::config::TableConfig;
use crate::error::{Error, Result};
use crate::order::{DefaultHashing, KeyHasher};
use crate::snapshot::Snapshot;
use core::fmt;
use core::hash::Hash;

/// Unordered set of elements deduplicated by the hasher's equality.
///
/// ```
/// use assoc_containers::{Error, HashSet};
///
/// let mut s = HashSet::new();
/// assert_eq!(s.add("x"), Ok(()));
/// assert_eq!(s.add("x"), Err(Error::AlreadyExists));
/// assert_eq!(s.len(), 1);
/// ```
#[derive(Clone)]
pub struct HashSet<K, H = DefaultHashing> {
    table: ChainedTable<K, (), H>,
}

impl<K: Hash + Eq> HashSet<K> {
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    pub fn with_config(config: TableConfig) -> Self {
        Self::with_config_and_hasher(config, DefaultHashing::default())
    }

    pub fn try_with_config(config: TableConfig) -> Result<Self> {
        ChainedTable::try_with_config_and_hasher(config, DefaultHashing::default())
            .map(|table| Self { table })
    }
}

impl<K: Hash + Eq> Default for HashSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, H> HashSet<K, H>
where
    H: KeyHasher<K>,
{
    pub fn with_hasher(hasher: H) -> Self {
        Self::with_config_and_hasher(TableConfig::default(), hasher)
    }

    pub fn with_config_and_hasher(config: TableConfig, hasher: H) -> Self {
        Self {
            table: ChainedTable::with_config_and_hasher(config, hasher),
        }
    }

    /// Add `key`; `AlreadyExists` leaves the set unchanged.
    pub fn add(&mut self, key: K) -> Result<()> {
        self.table.insert_new(key, ())
    }

    pub fn contains(&self, key: &K) -> bool {
        self.table.contains_key(key)
    }

    /// Remove and return the stored element equal to `key`.
    pub fn remove(&mut self, key: &K) -> Result<K> {
        if self.table.is_empty() {
            return Err(Error::Empty);
        }
        self.table
            .remove(key)
            .map(|(k, ())| k)
            .ok_or(Error::NotFound)
    }
}

impl<K, H> HashSet<K, H> {
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Element views in bucket order; `Empty` when there is nothing to export.
    pub fn to_vec(&self) -> Result<Vec<&K>> {
        if self.table.is_empty() {
            return Err(Error::Empty);
        }
        Ok(self.iter().collect())
    }

    pub fn snapshot(&self) -> Snapshot<K>
    where
        K: Clone,
    {
        self.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn destroy_with<F>(mut self, mut f: F)
    where
        F: FnMut(K),
    {
        self.table.clear_with(|k, ()| f(k));
    }
}

/// Element iterator over a [`HashSet`] in bucket order.
pub struct Iter<'a, K> {
    inner: chained_table::Iter<'a, K, ()>,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K: fmt::Debug, H> fmt::Debug for HashSet<K, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K, H> Extend<K> for HashSet<K, H>
where
    H: KeyHasher<K>,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for k in iter {
            if let Err(e @ Error::AllocationFailure) = self.add(k) {
                log::warn!("hash-set: extend stopped after {} elements: {}", self.len(), e);
                break;
            }
        }
    }
}

impl<K: Hash + Eq> FromIterator<K> for HashSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut s = HashSet::new();
        s.extend(iter);
        s
    }
}

impl<'a, K, H> IntoIterator for &'a HashSet<K, H> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    /// Invariant: a duplicate add reports AlreadyExists and leaves size 1.
    #[test]
    fn add_twice() {
        let mut s = HashSet::new();
        assert_eq!(s.add("elem".to_string()), Ok(()));
        assert_eq!(s.add("elem".to_string()), Err(Error::AlreadyExists));
        assert_eq!(s.len(), 1);
    }

    /// Invariant: duplicates in an extend are skipped; only an allocation
    /// failure ends it early.
    #[test]
    fn extend_skips_duplicates() {
        let mut s = HashSet::with_config(TableConfig::default().capacity(2));
        s.extend([3u32, 3, 1, 3, 2, 1, 4]);
        let got: BTreeSet<u32> = s.iter().copied().collect();
        assert_eq!(got, (1..=4).collect());
        assert_eq!(s.len(), 4);
    }

    /// Invariant: a duplicate add does not count as a mutation, so it cannot
    /// trigger a resize on its own.
    #[test]
    fn duplicate_add_does_not_grow() {
        let mut s = HashSet::with_config(TableConfig::default().capacity(4));
        for k in 0..3u8 {
            s.add(k).unwrap();
        }
        for _ in 0..50 {
            assert_eq!(s.add(0), Err(Error::AlreadyExists));
        }
        assert_eq!(s.capacity(), 4);
    }

    #[test]
    fn remove_statuses() {
        let mut s: HashSet<i32> = HashSet::new();
        assert_eq!(s.remove(&1), Err(Error::Empty));
        s.add(1).unwrap();
        assert_eq!(s.remove(&2), Err(Error::NotFound));
        assert_eq!(s.remove(&1), Ok(1));
        assert!(s.is_empty());
        assert_eq!(s.to_vec(), Err(Error::Empty));
    }

    #[test]
    fn membership_survives_growth_and_clear() {
        let mut s: HashSet<u32> = (0..300).collect();
        assert!(s.capacity() > 16);
        assert!((0..300).all(|k| s.contains(&k)));
        let got: BTreeSet<u32> = s.iter().copied().collect();
        assert_eq!(got, (0..300).collect());
        let cap = s.capacity();
        s.clear();
        assert_eq!(s.len(), 0);
        assert_eq!(s.capacity(), cap);
        assert!(!s.contains(&1));
    }

    #[test]
    fn snapshot_and_destroy() {
        let s: HashSet<u16> = (0..10).collect();
        let snap: BTreeSet<u16> = s.snapshot().collect();
        let mut released = BTreeSet::new();
        s.destroy_with(|k| {
            released.insert(k);
        });
        assert_eq!(snap, released);
        assert_eq!(released.len(), 10);
    }
}
