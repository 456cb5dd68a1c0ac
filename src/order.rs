//! Ordering and hashing contracts supplied by callers.
//!
//! Trees are parameterized by a [`Comparator`], hash containers by a
//! [`KeyHasher`]. Both have a "use the key's own traits" implementation and a
//! closure-based one.

use core::cmp::Ordering;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

/// Total order over keys.
///
/// Keys comparing `Equal` are the same entry: a put replaces, never
/// duplicates.
pub trait Comparator<K: ?Sized> {
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Orders keys by their `Ord` implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> Comparator<K> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

/// Hash and equality over keys.
///
/// `equivalent(a, b)` must imply `hash(a) == hash(b)`.
pub trait KeyHasher<K: ?Sized> {
    fn hash(&self, key: &K) -> u64;
    fn equivalent(&self, a: &K, b: &K) -> bool;
}

/// Hashes keys through their `Hash` impl with a `BuildHasher`, compares them
/// with `Eq`.
///
/// Each default builder picks its own seed and clones share it. Supply a
/// `BuildHasherDefault` when two separately built tables must lay out their
/// buckets identically.
#[derive(Clone, Default)]
pub struct DefaultHashing<S = DefaultHashBuilder> {
    build: S,
}

impl<S> DefaultHashing<S> {
    pub fn with_build_hasher(build: S) -> Self {
        Self { build }
    }
}

impl<S> fmt::Debug for DefaultHashing<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DefaultHashing")
    }
}

impl<K, S> KeyHasher<K> for DefaultHashing<S>
where
    K: Hash + Eq + ?Sized,
    S: BuildHasher,
{
    #[inline]
    fn hash(&self, key: &K) -> u64 {
        self.build.hash_one(key)
    }

    #[inline]
    fn equivalent(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

/// A hash closure paired with an equality closure.
#[derive(Clone)]
pub struct FnHashing<H, E> {
    hash: H,
    eq: E,
}

impl<H, E> FnHashing<H, E> {
    pub fn new(hash: H, eq: E) -> Self {
        Self { hash, eq }
    }
}

impl<H, E> fmt::Debug for FnHashing<H, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnHashing")
    }
}

impl<K, H, E> KeyHasher<K> for FnHashing<H, E>
where
    K: ?Sized,
    H: Fn(&K) -> u64,
    E: Fn(&K, &K) -> bool,
{
    #[inline]
    fn hash(&self, key: &K) -> u64 {
        (self.hash)(key)
    }

    #[inline]
    fn equivalent(&self, a: &K, b: &K) -> bool {
        (self.eq)(a, b)
    }
}
