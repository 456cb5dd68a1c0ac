//! Coarse one-lock-per-call wrapper.
//!
//! [`Locked`] puts a container behind a `parking_lot::ReentrantMutex`. Each
//! public method takes the lock for the length of the call and releases it on
//! return. The one exception is [`Locked::iterate`], whose [`LockedIter`]
//! keeps the lock until it is dropped or released.
//!
//! The mutex is re-entrant, so a thread that already holds the lock (for
//! instance while walking a `LockedIter`) may call further methods on the
//! same wrapper. Mutable access goes through a `RefCell`; calling
//! [`Locked::with_mut`] from inside a `with`/`with_mut` closure on the same
//! wrapper is a borrow conflict and panics.

use crate::error::{Put, Result};
use crate::hash_map::HashMap;
use crate::hash_set::HashSet;
use crate::order::{Comparator, DefaultHashing, KeyHasher, NaturalOrder};
use crate::snapshot::Snapshot;
use crate::tree_map::TreeMap;
use crate::tree_set::TreeSet;
use core::cell::RefCell;
use core::fmt;
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

pub type SyncTreeMap<K, V, C = NaturalOrder> = Locked<TreeMap<K, V, C>>;
pub type SyncTreeSet<K, C = NaturalOrder> = Locked<TreeSet<K, C>>;
pub type SyncHashMap<K, V, H = DefaultHashing> = Locked<HashMap<K, V, H>>;
pub type SyncHashSet<K, H = DefaultHashing> = Locked<HashSet<K, H>>;

/// A container guarded by one re-entrant lock.
///
/// `Locked<C>` is `Sync` whenever `C: Send`.
pub struct Locked<C> {
    inner: ReentrantMutex<RefCell<C>>,
}

impl<C> Locked<C> {
    pub fn new(container: C) -> Self {
        Self {
            inner: ReentrantMutex::new(RefCell::new(container)),
        }
    }

    /// Run `f` with shared access under the lock.
    pub fn with<R>(&self, f: impl FnOnce(&C) -> R) -> R {
        let guard = self.inner.lock();
        let container = guard.borrow();
        f(&container)
    }

    /// Run `f` with exclusive access under the lock.
    ///
    /// # Panics
    ///
    /// If the calling thread is already inside `with` or `with_mut` on this
    /// wrapper.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        let guard = self.inner.lock();
        let mut container = guard.borrow_mut();
        f(&mut container)
    }

    /// Take a snapshot under the lock and keep holding the lock while it is
    /// consumed.
    pub fn iterate<T>(&self, f: impl FnOnce(&C) -> Snapshot<T>) -> LockedIter<'_, C, T> {
        let guard = self.inner.lock();
        let items = {
            let container = guard.borrow();
            f(&container)
        };
        LockedIter { guard, items }
    }

    pub fn into_inner(self) -> C {
        self.inner.into_inner().into_inner()
    }
}

impl<C: Default> Default for Locked<C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}

impl<C> From<C> for Locked<C> {
    fn from(container: C) -> Self {
        Self::new(container)
    }
}

impl<C: fmt::Debug> fmt::Debug for Locked<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Locked");
        let Some(guard) = self.inner.try_lock() else {
            return d.field("data", &format_args!("<locked>")).finish();
        };
        let res = match guard.try_borrow() {
            Ok(container) => d.field("data", &&*container).finish(),
            Err(_) => d.field("data", &format_args!("<borrowed>")).finish(),
        };
        res
    }
}

/// Snapshot cursor that holds the wrapper's lock.
///
/// Other threads block on the wrapper until this is dropped or
/// [`release`](Self::release)d. The owning thread may keep calling into the
/// wrapper.
pub struct LockedIter<'a, C, T> {
    guard: ReentrantMutexGuard<'a, RefCell<C>>,
    items: Snapshot<T>,
}

impl<'a, C, T> LockedIter<'a, C, T> {
    pub fn has_next(&self) -> bool {
        self.items.has_next()
    }

    pub fn try_next(&mut self) -> Result<T> {
        self.items.try_next()
    }

    pub fn remaining(&self) -> usize {
        self.items.remaining()
    }

    /// Drop the lock and keep the unconsumed elements.
    pub fn release(self) -> Snapshot<T> {
        let LockedIter { guard, items } = self;
        drop(guard);
        items
    }
}

impl<C, T> Iterator for LockedIter<'_, C, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.items.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

impl<C, T> ExactSizeIterator for LockedIter<'_, C, T> {}

impl<C, T: fmt::Debug> fmt::Debug for LockedIter<'_, C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockedIter")
            .field("remaining", &self.items.as_slice())
            .finish_non_exhaustive()
    }
}

// Owned results below: a borrow cannot outlive the lock.

impl<K, V, C> Locked<TreeMap<K, V, C>>
where
    C: Comparator<K>,
{
    pub fn put(&self, key: K, value: V) -> Result<Put<V>> {
        self.with_mut(|m| m.put(key, value))
    }

    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.with(|m| m.get(key).cloned())
    }

    pub fn remove(&self, key: &K) -> Result<V> {
        self.with_mut(|m| m.remove(key))
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.with(|m| m.contains_key(key))
    }

    pub fn floor(&self, key: &K) -> Result<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.with(|m| m.floor(key).map(owned))
    }

    pub fn ceiling(&self, key: &K) -> Result<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.with(|m| m.ceiling(key).map(owned))
    }

    pub fn lower(&self, key: &K) -> Result<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.with(|m| m.lower(key).map(owned))
    }

    pub fn higher(&self, key: &K) -> Result<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.with(|m| m.higher(key).map(owned))
    }
}

impl<K, V, C> Locked<TreeMap<K, V, C>> {
    pub fn len(&self) -> usize {
        self.with(|m| m.len())
    }

    pub fn is_empty(&self) -> bool {
        self.with(|m| m.is_empty())
    }

    pub fn first(&self) -> Result<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.with(|m| m.first().map(owned))
    }

    pub fn last(&self) -> Result<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.with(|m| m.last().map(owned))
    }

    pub fn clear(&self) {
        self.with_mut(|m| m.clear());
    }

    /// Ascending entries; the lock is held until the iterator goes away.
    pub fn iter(&self) -> LockedIter<'_, TreeMap<K, V, C>, (K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.iterate(|m| m.snapshot())
    }
}

impl<K, C> Locked<TreeSet<K, C>>
where
    C: Comparator<K>,
{
    pub fn add(&self, key: K) -> Result<()> {
        self.with_mut(|s| s.add(key))
    }

    pub fn contains(&self, key: &K) -> bool {
        self.with(|s| s.contains(key))
    }

    pub fn remove(&self, key: &K) -> Result<K> {
        self.with_mut(|s| s.remove(key))
    }

    pub fn floor(&self, key: &K) -> Result<K>
    where
        K: Clone,
    {
        self.with(|s| s.floor(key).cloned())
    }

    pub fn ceiling(&self, key: &K) -> Result<K>
    where
        K: Clone,
    {
        self.with(|s| s.ceiling(key).cloned())
    }

    pub fn lower(&self, key: &K) -> Result<K>
    where
        K: Clone,
    {
        self.with(|s| s.lower(key).cloned())
    }

    pub fn higher(&self, key: &K) -> Result<K>
    where
        K: Clone,
    {
        self.with(|s| s.higher(key).cloned())
    }
}

impl<K, C> Locked<TreeSet<K, C>> {
    pub fn len(&self) -> usize {
        self.with(|s| s.len())
    }

    pub fn is_empty(&self) -> bool {
        self.with(|s| s.is_empty())
    }

    pub fn first(&self) -> Result<K>
    where
        K: Clone,
    {
        self.with(|s| s.first().cloned())
    }

    pub fn last(&self) -> Result<K>
    where
        K: Clone,
    {
        self.with(|s| s.last().cloned())
    }

    pub fn clear(&self) {
        self.with_mut(|s| s.clear());
    }

    pub fn iter(&self) -> LockedIter<'_, TreeSet<K, C>, K>
    where
        K: Clone,
    {
        self.iterate(|s| s.snapshot())
    }
}

impl<K, V, H> Locked<HashMap<K, V, H>>
where
    H: KeyHasher<K>,
{
    pub fn put(&self, key: K, value: V) -> Result<Put<V>> {
        self.with_mut(|m| m.put(key, value))
    }

    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.with(|m| m.get(key).cloned())
    }

    pub fn remove(&self, key: &K) -> Result<V> {
        self.with_mut(|m| m.remove(key))
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.with(|m| m.contains_key(key))
    }
}

impl<K, V, H> Locked<HashMap<K, V, H>> {
    pub fn len(&self) -> usize {
        self.with(|m| m.len())
    }

    pub fn is_empty(&self) -> bool {
        self.with(|m| m.is_empty())
    }

    pub fn clear(&self) {
        self.with_mut(|m| m.clear());
    }

    pub fn iter(&self) -> LockedIter<'_, HashMap<K, V, H>, (K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.iterate(|m| m.snapshot())
    }
}

impl<K, H> Locked<HashSet<K, H>>
where
    H: KeyHasher<K>,
{
    pub fn add(&self, key: K) -> Result<()> {
        self.with_mut(|s| s.add(key))
    }

    pub fn contains(&self, key: &K) -> bool {
        self.with(|s| s.contains(key))
    }

    pub fn remove(&self, key: &K) -> Result<K> {
        self.with_mut(|s| s.remove(key))
    }
}

impl<K, H> Locked<HashSet<K, H>> {
    pub fn len(&self) -> usize {
        self.with(|s| s.len())
    }

    pub fn is_empty(&self) -> bool {
        self.with(|s| s.is_empty())
    }

    pub fn clear(&self) {
        self.with_mut(|s| s.clear());
    }

    pub fn iter(&self) -> LockedIter<'_, HashSet<K, H>, K>
    where
        K: Clone,
    {
        self.iterate(|s| s.snapshot())
    }
}

fn owned<K: Clone, V: Clone>((k, v): (&K, &V)) -> (K, V) {
    (k.clone(), v.clone())
}
