//! Key equality strategies used to merge items into nodes.
//!
//! The forest indexes nodes in a hash map, so an equality strategy is expressed as a
//! canonical form: two keys are the same node iff their normalized forms are equal.

use std::hash::Hash;

/// A pluggable equality strategy for node keys.
pub trait KeyComparer<K: ?Sized> {
    /// The canonical form keys are hashed and compared by.
    type Normalized: Hash + Eq;

    fn normalize(&self, key: &K) -> Self::Normalized;

    /// Returns `true` if `a` and `b` identify the same node.
    fn keys_eq(&self, a: &K, b: &K) -> bool {
        self.normalize(a) == self.normalize(b)
    }
}

/// Compares keys with their own `Eq`/`Hash` implementation (ordinal for strings).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NaturalKeys;

impl<K: Hash + Eq + Clone> KeyComparer<K> for NaturalKeys {
    type Normalized = K;

    fn normalize(&self, key: &K) -> K {
        key.clone()
    }
}

/// Compares string-like keys ignoring case, so `"Y"` and `"y"` are the same node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CaseInsensitive;

impl<K: AsRef<str> + ?Sized> KeyComparer<K> for CaseInsensitive {
    type Normalized = String;

    fn normalize(&self, key: &K) -> String {
        key.as_ref().to_lowercase()
    }
}

/// Adapts a projection closure into a [`KeyComparer`]: keys are equal iff their projections are.
#[derive(Clone, Copy, Debug)]
pub struct KeyFn<F>(F);

impl<F> KeyFn<F> {
    pub fn new<K: ?Sized, N>(projection: F) -> Self
    where
        F: Fn(&K) -> N,
        N: Hash + Eq,
    {
        KeyFn(projection)
    }
}

impl<K: ?Sized, N, F> KeyComparer<K> for KeyFn<F>
where
    F: Fn(&K) -> N,
    N: Hash + Eq,
{
    type Normalized = N;

    fn normalize(&self, key: &K) -> N {
        (self.0)(key)
    }
}
