//! TreeMap: ordered map over the red-black engine.

use crate::error::{Error, Put, Result, Violation};
use crate::order::{Comparator, NaturalOrder};
use crate::rb_tree::{self, Color, NodeId, RbTree};
use crate::snapshot::Snapshot;
use core::fmt;

/// Ascending `(&K, &V)` iterator.
pub type Iter<'a, K, V, C> = rb_tree::Iter<'a, K, V, C>;

/// Ordered map with nearest-key navigation.
///
/// Keys are kept in comparator order; `put` on an existing key replaces the
/// value in place and hands back the old one. All operations are
/// `O(log n)` worst case.
///
/// ```
/// use assoc_containers::{Put, TreeMap};
///
/// let mut m = TreeMap::new();
/// assert_eq!(m.put(20, "b"), Ok(Put::Inserted));
/// assert_eq!(m.put(10, "a"), Ok(Put::Inserted));
/// assert_eq!(m.put(20, "B"), Ok(Put::Replaced("b")));
/// assert_eq!(m.floor(&15), Ok((&10, &"a")));
/// assert_eq!(m.poll_last(), Ok((20, "B")));
/// ```
#[derive(Clone)]
pub struct TreeMap<K, V, C = NaturalOrder> {
    tree: RbTree<K, V, C>,
}

impl<K: Ord, V> TreeMap<K, V> {
    pub fn new() -> Self {
        Self {
            tree: RbTree::new(),
        }
    }
}

impl<K: Ord, V> Default for TreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> TreeMap<K, V, C>
where
    C: Comparator<K>,
{
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            tree: RbTree::with_comparator(cmp),
        }
    }

    pub fn put(&mut self, key: K, value: V) -> Result<Put<V>> {
        self.tree.insert(key, value)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let id = self.tree.find(key)?;
        self.tree.get(id).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.tree.find(key)?;
        self.tree.value_mut(id)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.find(key).is_some()
    }

    /// Remove `key` and return its value; `Empty` on an empty map,
    /// `NotFound` when the key is absent.
    pub fn remove(&mut self, key: &K) -> Result<V> {
        if self.tree.is_empty() {
            return Err(Error::Empty);
        }
        self.tree
            .remove(key)
            .map(|(_, v)| v)
            .ok_or(Error::NotFound)
    }

    /// Greatest entry with key `<= key`.
    pub fn floor(&self, key: &K) -> Result<(&K, &V)> {
        self.view(self.tree.floor(key))
    }

    /// Least entry with key `>= key`.
    pub fn ceiling(&self, key: &K) -> Result<(&K, &V)> {
        self.view(self.tree.ceiling(key))
    }

    /// Greatest entry with key `< key`.
    pub fn lower(&self, key: &K) -> Result<(&K, &V)> {
        self.view(self.tree.lower(key))
    }

    /// Least entry with key `> key`.
    pub fn higher(&self, key: &K) -> Result<(&K, &V)> {
        self.view(self.tree.higher(key))
    }

    pub fn validate(&self) -> Result<usize, Violation> {
        self.tree.validate()
    }
}

impl<K, V, C> TreeMap<K, V, C> {
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn first(&self) -> Result<(&K, &V)> {
        self.view(self.tree.first().ok_or(Error::Empty))
    }

    pub fn last(&self) -> Result<(&K, &V)> {
        self.view(self.tree.last().ok_or(Error::Empty))
    }

    /// Remove and return the least entry.
    pub fn poll_first(&mut self) -> Result<(K, V)> {
        let id = self.tree.first().ok_or(Error::Empty)?;
        self.tree.delete(id).ok_or(Error::Empty)
    }

    /// Remove and return the greatest entry.
    pub fn poll_last(&mut self) -> Result<(K, V)> {
        let id = self.tree.last().ok_or(Error::Empty)?;
        self.tree.delete(id).ok_or(Error::Empty)
    }

    pub fn iter(&self) -> Iter<'_, K, V, C> {
        self.tree.iter()
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator + '_ {
        self.tree.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator + '_ {
        self.tree.iter().map(|(_, v)| v)
    }

    /// Ascending entry views; `Empty` when there is nothing to export.
    /// The views borrow the map and are valid until its next mutation.
    pub fn entries(&self) -> Result<Vec<(&K, &V)>> {
        if self.tree.is_empty() {
            return Err(Error::Empty);
        }
        Ok(self.tree.iter().collect())
    }

    /// Ascending keys; `Empty` when there is nothing to export.
    pub fn key_array(&self) -> Result<Vec<&K>> {
        if self.tree.is_empty() {
            return Err(Error::Empty);
        }
        Ok(self.keys().collect())
    }

    /// Copy every entry out, in ascending order.
    pub fn snapshot(&self) -> Snapshot<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.tree
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Color of the root node, `None` when empty.
    pub fn root_color(&self) -> Option<Color> {
        self.tree.root_color()
    }

    pub fn height(&self) -> usize {
        self.tree.height()
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Tear the map down, handing every entry to `f` in ascending order.
    pub fn destroy_with<F>(mut self, f: F)
    where
        F: FnMut(K, V),
    {
        self.tree.clear_with(f);
    }

    fn view(&self, found: Result<NodeId>) -> Result<(&K, &V)> {
        found.and_then(|id| self.tree.get(id).ok_or(Error::NotFound))
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for TreeMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.tree, f)
    }
}

impl<K, V, C> Extend<(K, V)> for TreeMap<K, V, C>
where
    C: Comparator<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            if let Err(e) = self.put(k, v) {
                log::warn!("tree-map: extend stopped after {} entries: {}", self.len(), e);
                break;
            }
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for TreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = TreeMap::new();
        m.extend(iter);
        m
    }
}

impl<'a, K, V, C> IntoIterator for &'a TreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
