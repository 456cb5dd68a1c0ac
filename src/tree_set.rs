//! TreeSet: ordered set over the red-black engine.

use crate::error::{Error, Put, Result, Violation};
use crate::order::{Comparator, NaturalOrder};
use crate::rb_tree::{Color, NodeId, RbTree};
use crate::snapshot::Snapshot;
use core::fmt;

/// Ordered set; nodes carry only the key.
///
/// Unlike [`TreeMap::put`](crate::TreeMap::put), adding an element that is
/// already present changes nothing and reports `AlreadyExists`.
///
/// ```
/// use assoc_containers::{Error, TreeSet};
///
/// let mut s = TreeSet::new();
/// assert_eq!(s.add(3), Ok(()));
/// assert_eq!(s.add(3), Err(Error::AlreadyExists));
/// assert_eq!(s.ceiling(&1), Ok(&3));
/// ```
#[derive(Clone)]
pub struct TreeSet<K, C = NaturalOrder> {
    tree: RbTree<K, (), C>,
}

impl<K: Ord> TreeSet<K> {
    pub fn new() -> Self {
        Self {
            tree: RbTree::new(),
        }
    }
}

impl<K: Ord> Default for TreeSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C> TreeSet<K, C>
where
    C: Comparator<K>,
{
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            tree: RbTree::with_comparator(cmp),
        }
    }

    /// Add `key`; `AlreadyExists` if an equal element is present, in which
    /// case the stored element is kept and `key` is dropped.
    pub fn add(&mut self, key: K) -> Result<()> {
        match self.tree.insert(key, ())? {
            Put::Inserted => Ok(()),
            Put::Replaced(()) => Err(Error::AlreadyExists),
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.tree.find(key).is_some()
    }

    /// Remove and return the stored element equal to `key`.
    pub fn remove(&mut self, key: &K) -> Result<K> {
        if self.tree.is_empty() {
            return Err(Error::Empty);
        }
        self.tree
            .remove(key)
            .map(|(k, ())| k)
            .ok_or(Error::NotFound)
    }

    pub fn floor(&self, key: &K) -> Result<&K> {
        self.view(self.tree.floor(key))
    }

    pub fn ceiling(&self, key: &K) -> Result<&K> {
        self.view(self.tree.ceiling(key))
    }

    pub fn lower(&self, key: &K) -> Result<&K> {
        self.view(self.tree.lower(key))
    }

    pub fn higher(&self, key: &K) -> Result<&K> {
        self.view(self.tree.higher(key))
    }

    pub fn validate(&self) -> Result<usize, Violation> {
        self.tree.validate()
    }
}

impl<K, C> TreeSet<K, C> {
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn first(&self) -> Result<&K> {
        self.view(self.tree.first().ok_or(Error::Empty))
    }

    pub fn last(&self) -> Result<&K> {
        self.view(self.tree.last().ok_or(Error::Empty))
    }

    pub fn poll_first(&mut self) -> Result<K> {
        let id = self.tree.first().ok_or(Error::Empty)?;
        self.tree.delete(id).map(|(k, ())| k).ok_or(Error::Empty)
    }

    pub fn poll_last(&mut self) -> Result<K> {
        let id = self.tree.last().ok_or(Error::Empty)?;
        self.tree.delete(id).map(|(k, ())| k).ok_or(Error::Empty)
    }

    /// Ascending elements.
    pub fn iter(&self) -> Iter<'_, K, C> {
        Iter {
            inner: self.tree.iter(),
        }
    }

    /// Ascending element views; `Empty` when there is nothing to export.
    pub fn to_vec(&self) -> Result<Vec<&K>> {
        if self.tree.is_empty() {
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

    pub fn root_color(&self) -> Option<Color> {
        self.tree.root_color()
    }

    pub fn height(&self) -> usize {
        self.tree.height()
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Tear the set down, handing every element to `f` in ascending order.
    pub fn destroy_with<F>(mut self, mut f: F)
    where
        F: FnMut(K),
    {
        self.tree.clear_with(|k, ()| f(k));
    }

    fn view(&self, found: Result<NodeId>) -> Result<&K> {
        found.and_then(|id| self.tree.get(id).map(|(k, _)| k).ok_or(Error::NotFound))
    }
}

/// Ascending element iterator over a [`TreeSet`].
pub struct Iter<'a, K, C> {
    inner: crate::rb_tree::Iter<'a, K, (), C>,
}

impl<'a, K, C> Iterator for Iter<'a, K, C> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, C> DoubleEndedIterator for Iter<'_, K, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, C> ExactSizeIterator for Iter<'_, K, C> {}

impl<K: fmt::Debug, C> fmt::Debug for TreeSet<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K, C> Extend<K> for TreeSet<K, C>
where
    C: Comparator<K>,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for k in iter {
            if let Err(e @ Error::AllocationFailure) = self.add(k) {
                log::warn!("tree-set: extend stopped after {} elements: {}", self.len(), e);
                break;
            }
        }
    }
}

impl<K: Ord> FromIterator<K> for TreeSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut s = TreeSet::new();
        s.extend(iter);
        s
    }
}

impl<'a, K, C> IntoIterator for &'a TreeSet<K, C> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: the sample insert sequence iterates sorted, with a black
    /// root, and first/last bound every element.
    #[test]
    fn sample_sequence_in_order() {
        let s: TreeSet<i32> = [10, 18, 7, 15, 16, 30, 25, 40, 60, 2, 1, 70]
            .into_iter()
            .collect();
        let got: Vec<i32> = s.iter().copied().collect();
        assert_eq!(got, vec![1, 2, 7, 10, 15, 16, 18, 25, 30, 40, 60, 70]);
        assert_eq!(s.root_color(), Some(Color::Black));
        assert_eq!(s.first(), Ok(&1));
        assert_eq!(s.last(), Ok(&70));
        assert!(s.validate().is_ok());
    }

    #[test]
    fn duplicate_add_keeps_stored_element() {
        // Equal under the comparator, distinguishable by payload.
        let mut s = TreeSet::with_comparator(|a: &(i32, &str), b: &(i32, &str)| a.0.cmp(&b.0));
        assert_eq!(s.add((1, "first")), Ok(()));
        assert_eq!(s.add((1, "second")), Err(Error::AlreadyExists));
        assert_eq!(s.len(), 1);
        assert_eq!(s.first(), Ok(&(1, "first")));
    }

    #[test]
    fn remove_and_poll() {
        let mut s: TreeSet<u8> = (1..=5).collect();
        assert_eq!(s.remove(&3), Ok(3));
        assert_eq!(s.remove(&3), Err(Error::NotFound));
        assert_eq!(s.poll_first(), Ok(1));
        assert_eq!(s.poll_last(), Ok(5));
        assert_eq!(s.to_vec(), Ok(vec![&2, &4]));
        s.clear();
        assert_eq!(s.remove(&2), Err(Error::Empty));
        assert_eq!(s.poll_last(), Err(Error::Empty));
        assert_eq!(s.to_vec(), Err(Error::Empty));
        s.clear();
        assert_eq!(s.len(), 0);
    }

    #[test]
    fn navigation_on_set() {
        let s: TreeSet<i32> = [1, 2, 7, 10, 15, 16, 18, 25, 30, 40].into_iter().collect();
        assert_eq!(s.floor(&20), Ok(&18));
        assert_eq!(s.ceiling(&20), Ok(&25));
        assert_eq!(s.lower(&10), Ok(&7));
        assert_eq!(s.higher(&10), Ok(&15));
        assert_eq!(s.higher(&40), Err(Error::NotFound));
    }

    #[test]
    fn snapshot_and_destroy() {
        let s: TreeSet<String> = ["b", "a"].iter().map(|x| x.to_string()).collect();
        let mut snap = s.snapshot();
        assert_eq!(snap.try_next().as_deref(), Ok("a"));
        let mut released = Vec::new();
        s.destroy_with(|k| released.push(k));
        assert_eq!(released, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(snap.try_next().as_deref(), Ok("b"));
        assert_eq!(snap.try_next(), Err(Error::IterationEnd));
    }

    #[test]
    fn debug_formats_as_set() {
        let s: TreeSet<i32> = [2, 1].into_iter().collect();
        assert_eq!(format!("{:?}", s), "{1, 2}");
    }
}
