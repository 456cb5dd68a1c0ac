//! Point-in-time cursor over copied elements.

use crate::error::{Error, Result};

/// Owned copy of a container's elements taken in one call.
///
/// Later mutations of the source are not observed. Besides `Iterator`, the
/// cursor offers the status-style `has_next`/`try_next` pair.
#[derive(Clone, Debug)]
pub struct Snapshot<T> {
    items: std::vec::IntoIter<T>,
}

impl<T> Snapshot<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: items.into_iter(),
        }
    }

    pub fn has_next(&self) -> bool {
        self.items.len() > 0
    }

    /// Next element, or `Error::IterationEnd` once exhausted.
    pub fn try_next(&mut self) -> Result<T> {
        self.items.next().ok_or(Error::IterationEnd)
    }

    pub fn remaining(&self) -> usize {
        self.items.len()
    }

    /// The elements not yet consumed.
    pub fn as_slice(&self) -> &[T] {
        self.items.as_slice()
    }

    /// Peek at the `index`-th unconsumed element.
    pub fn get(&self, index: usize) -> Result<&T> {
        let rest = self.items.as_slice();
        rest.get(index).ok_or(Error::InvalidIndex {
            index,
            len: rest.len(),
        })
    }
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> FromIterator<T> for Snapshot<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T> Iterator for Snapshot<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.items.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

impl<T> DoubleEndedIterator for Snapshot<T> {
    fn next_back(&mut self) -> Option<T> {
        self.items.next_back()
    }
}

impl<T> ExactSizeIterator for Snapshot<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_reports_end() {
        let mut s = Snapshot::new(vec![1, 2]);
        assert!(s.has_next());
        assert_eq!(s.remaining(), 2);
        assert_eq!(s.try_next(), Ok(1));
        assert_eq!(s.as_slice(), &[2]);
        assert_eq!(s.get(0), Ok(&2));
        assert_eq!(s.get(1), Err(Error::InvalidIndex { index: 1, len: 1 }));
        assert_eq!(s.try_next(), Ok(2));
        assert!(!s.has_next());
        assert_eq!(s.try_next(), Err(Error::IterationEnd));
        assert_eq!(s.try_next(), Err(Error::IterationEnd));
    }

    #[test]
    fn empty_snapshot() {
        let mut s: Snapshot<u8> = Snapshot::default();
        assert!(!s.has_next());
        assert_eq!(s.next(), None);
    }

    #[test]
    fn collects_and_iterates() {
        let s: Snapshot<i32> = (1..=3).collect();
        assert_eq!(s.len(), 3);
        assert_eq!(s.rev().collect::<Vec<_>>(), vec![3, 2, 1]);
    }
}
