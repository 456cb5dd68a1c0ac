//! HashMap: unordered map over the chained hash engine.

use crate::chained_table::{self, ChainedTable};
use crate::config::TableConfig;
use crate::error::{Error, Put, Result};
use crate::order::{DefaultHashing, KeyHasher};
use crate::snapshot::Snapshot;
use core::fmt;
use core::hash::Hash;

/// `(&K, &V)` iterator in bucket order.
pub type Iter<'a, K, V> = chained_table::Iter<'a, K, V>;

/// Unordered map with caller-controlled hashing and load-factor-driven
/// growth.
///
/// Iteration order is deterministic for a given sequence of operations but
/// otherwise unspecified, and changes when the table grows.
///
/// ```
/// use assoc_containers::{HashMap, Put, TableConfig};
///
/// let mut m = HashMap::with_config(TableConfig::default().capacity(4));
/// for i in 0..26u32 {
///     assert_eq!(m.put(i, i * 2), Ok(Put::Inserted));
/// }
/// assert!(m.capacity() > 4);
/// assert_eq!(m.put(3, 0), Ok(Put::Replaced(6)));
/// assert_eq!(m.remove(&3), Ok(0));
/// ```
#[derive(Clone)]
pub struct HashMap<K, V, H = DefaultHashing> {
    table: ChainedTable<K, V, H>,
}

impl<K: Hash + Eq, V> HashMap<K, V> {
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    pub fn with_config(config: TableConfig) -> Self {
        Self::with_config_and_hasher(config, DefaultHashing::default())
    }

    /// Like [`with_config`](Self::with_config), but reports
    /// `AllocationFailure` when the bucket array cannot be allocated.
    pub fn try_with_config(config: TableConfig) -> Result<Self> {
        ChainedTable::try_with_config_and_hasher(config, DefaultHashing::default())
            .map(|table| Self { table })
    }
}

impl<K: Hash + Eq, V> Default for HashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, H> HashMap<K, V, H>
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

    pub fn put(&mut self, key: K, value: V) -> Result<Put<V>> {
        self.table.insert(key, value)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.table.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.table.get_mut(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.table.contains_key(key)
    }

    /// Remove `key` and return its value; `Empty` on an empty map,
    /// `NotFound` when the key is absent.
    pub fn remove(&mut self, key: &K) -> Result<V> {
        if self.table.is_empty() {
            return Err(Error::Empty);
        }
        self.table
            .remove(key)
            .map(|(_, v)| v)
            .ok_or(Error::NotFound)
    }

    /// Remove `key` and return the stored key with its value.
    pub fn remove_entry(&mut self, key: &K) -> Result<(K, V)> {
        if self.table.is_empty() {
            return Err(Error::Empty);
        }
        self.table.remove(key).ok_or(Error::NotFound)
    }
}

impl<K, V, H> HashMap<K, V, H> {
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Current bucket count.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub fn load(&self) -> f64 {
        self.table.load()
    }

    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    pub fn config(&self) -> &TableConfig {
        self.table.config()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        self.table.iter()
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &K> + '_ {
        self.table.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> + '_ {
        self.table.iter().map(|(_, v)| v)
    }

    /// Entry views in bucket order; `Empty` when there is nothing to export.
    pub fn entries(&self) -> Result<Vec<(&K, &V)>> {
        if self.table.is_empty() {
            return Err(Error::Empty);
        }
        Ok(self.table.iter().collect())
    }

    pub fn snapshot(&self) -> Snapshot<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.table
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Drop every entry, keeping the bucket array.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Tear the map down, handing every entry to `f`.
    pub fn destroy_with<F>(mut self, f: F)
    where
        F: FnMut(K, V),
    {
        self.table.clear_with(f);
    }
}

impl<K: fmt::Debug, V: fmt::Debug, H> fmt::Debug for HashMap<K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.table, f)
    }
}

impl<K, V, H> Extend<(K, V)> for HashMap<K, V, H>
where
    H: KeyHasher<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            if let Err(e) = self.put(k, v) {
                log::warn!("hash-map: extend stopped after {} entries: {}", self.len(), e);
                break;
            }
        }
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for HashMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = HashMap::new();
        m.extend(iter);
        m
    }
}

impl<'a, K, V, H> IntoIterator for &'a HashMap<K, V, H> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
