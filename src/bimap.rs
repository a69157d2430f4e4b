//! Strict bijection between two domains, with inverse lookup.
//!
//! [`BiMap`] stores a pair of mirrored maps (forward `K -> V`, inverse
//! `V -> K`) and keeps them in permanent mutual consistency: each key maps
//! to exactly one value and each value to exactly one key.
//!
//! # Last write wins
//!
//! [`BiMap::put`] silently severs any prior binding of the key *and* any
//! prior binding of the value, on both sides, before inserting. A single
//! `put` can therefore drop two unrelated prior pairs. This is the
//! documented contract, not an accident; callers that need to preserve
//! existing bindings must check [`contains_key`](BiMap::contains_key) /
//! [`contains_value`](BiMap::contains_value) first.
//!
//! # Aliasing views
//!
//! [`BiMap::inverse`] returns an [`InverseBiMap`]: a thin wrapper over the
//! *same* two stores with the key/value roles swapped. It is a view, not a
//! copy; mutations through either handle are visible through both. `Clone`,
//! by contrast, is a deep copy of both stores.
//!
//! # Examples
//!
//! ```ignore
//! use bibrel::BiMap;
//!
//! let mut isil_to_sigel: BiMap<String, String> = BiMap::new();
//! isil_to_sigel.put("DE-101".to_string(), "101".to_string());
//! assert_eq!(isil_to_sigel.get(&"DE-101".to_string()), Some("101".to_string()));
//! assert_eq!(isil_to_sigel.get_key(&"101".to_string()), Some("DE-101".to_string()));
//! ```

use std::cell::RefCell;
use std::fmt::{self, Debug};
use std::hash::Hash;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

pub(crate) struct BiMapStore<K, V> {
    pub(crate) forward: IndexMap<K, V>,
    pub(crate) inverse: IndexMap<V, K>,
}

/// Insert `(key, value)` into a mirrored map pair, severing any prior
/// binding of either side first. Returns the severed
/// `(old value of key, old key of value)`.
pub(crate) fn put_pair<A, B>(
    forward: &mut IndexMap<A, B>,
    inverse: &mut IndexMap<B, A>,
    key: A,
    value: B,
) -> (Option<B>, Option<A>)
where
    A: Clone + Eq + Hash,
    B: Clone + Eq + Hash,
{
    let old_value = forward.get(&key).cloned();
    let old_key = inverse.get(&value).cloned();
    if let Some(v) = &old_value {
        inverse.shift_remove(v);
    }
    if let Some(k) = &old_key {
        forward.shift_remove(k);
    }
    forward.insert(key.clone(), value.clone());
    inverse.insert(value, key);
    (old_value, old_key)
}

/// Remove the pair bound to `key` from a mirrored map pair.
pub(crate) fn remove_pair<A, B>(
    forward: &mut IndexMap<A, B>,
    inverse: &mut IndexMap<B, A>,
    key: &A,
) -> Option<B>
where
    A: Eq + Hash,
    B: Eq + Hash,
{
    let value = forward.shift_remove(key)?;
    inverse.shift_remove(&value);
    Some(value)
}

/// A strict bijection: every key maps to exactly one value and every value
/// to exactly one key.
pub struct BiMap<K, V> {
    store: Rc<RefCell<BiMapStore<K, V>>>,
}

impl<K, V> Default for BiMap<K, V> {
    fn default() -> Self {
        Self {
            store: Rc::new(RefCell::new(BiMapStore {
                forward: IndexMap::new(),
                inverse: IndexMap::new(),
            })),
        }
    }
}

impl<K, V> BiMap<K, V> {
    /// Create an empty bijection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.borrow().forward.len()
    }

    /// Whether no pairs are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.borrow().forward.is_empty()
    }

    /// Drop every pair.
    pub fn clear(&mut self) {
        let mut store = self.store.borrow_mut();
        store.forward.clear();
        store.inverse.clear();
    }

    /// An aliasing view over the same two stores with key/value roles
    /// swapped.
    ///
    /// The view shares ownership of the stores with `self`; mutating either
    /// handle mutates both. This is the sole sanctioned aliasing
    /// relationship of this type.
    #[must_use]
    pub fn inverse(&self) -> InverseBiMap<K, V> {
        InverseBiMap {
            store: Rc::clone(&self.store),
        }
    }
}

impl<K, V> BiMap<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash,
{
    /// Insert `(key, value)`, severing any prior binding of `key` and any
    /// prior binding of `value` on both sides first (last write wins).
    ///
    /// Returns the severed `(old value of key, old key of value)`.
    pub fn put(&mut self, key: K, value: V) -> (Option<V>, Option<K>) {
        let mut store = self.store.borrow_mut();
        let BiMapStore { forward, inverse } = &mut *store;
        put_pair(forward, inverse, key, value)
    }

    /// The value bound to `key`, if any.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        self.store.borrow().forward.get(key).cloned()
    }

    /// Inverse lookup: the key bound to `value`, if any.
    #[must_use]
    pub fn get_key(&self, value: &V) -> Option<K> {
        self.store.borrow().inverse.get(value).cloned()
    }

    /// Whether `key` is bound.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.store.borrow().forward.contains_key(key)
    }

    /// Whether `value` is bound.
    #[must_use]
    pub fn contains_value(&self, value: &V) -> bool {
        self.store.borrow().inverse.contains_key(value)
    }

    /// Remove the pair bound to `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let mut store = self.store.borrow_mut();
        let BiMapStore { forward, inverse } = &mut *store;
        remove_pair(forward, inverse, key)
    }

    /// Symmetric removal keyed by value: remove the pair bound to `value`,
    /// returning its key.
    pub fn remove_value(&mut self, value: &V) -> Option<K> {
        let mut store = self.store.borrow_mut();
        let BiMapStore { forward, inverse } = &mut *store;
        remove_pair(inverse, forward, value)
    }

    /// Snapshot of all keys in insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<K> {
        self.store.borrow().forward.keys().cloned().collect()
    }

    /// Snapshot of all values in insertion order.
    #[must_use]
    pub fn values(&self) -> Vec<V> {
        self.store.borrow().inverse.keys().cloned().collect()
    }

    /// Snapshot of all `(key, value)` pairs in key insertion order.
    #[must_use]
    pub fn pairs(&self) -> Vec<(K, V)> {
        self.store
            .borrow()
            .forward
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl<K, V> Clone for BiMap<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash,
{
    /// Deep copy of both stores. For the aliasing view use
    /// [`inverse`](BiMap::inverse) instead.
    fn clone(&self) -> Self {
        let store = self.store.borrow();
        Self {
            store: Rc::new(RefCell::new(BiMapStore {
                forward: store.forward.clone(),
                inverse: store.inverse.clone(),
            })),
        }
    }
}

impl<K, V> Debug for BiMap<K, V>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.store.borrow().forward.iter()).finish()
    }
}

impl<K, V> PartialEq for BiMap<K, V>
where
    K: Eq + Hash,
    V: Eq + Hash,
{
    fn eq(&self, other: &Self) -> bool {
        if Rc::ptr_eq(&self.store, &other.store) {
            return true;
        }
        self.store.borrow().forward == other.store.borrow().forward
    }
}

impl<K, V> Eq for BiMap<K, V>
where
    K: Eq + Hash,
    V: Eq + Hash,
{
}

impl<K, V> Extend<(K, V)> for BiMap<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for BiMap<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for BiMap<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash,
{
    fn from(arr: [(K, V); N]) -> Self {
        Self::from_iter(arr)
    }
}

impl<K, V> Serialize for BiMap<K, V>
where
    K: Serialize + Eq + Hash,
    V: Serialize + Eq + Hash,
{
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // The forward map alone determines the bijection.
        self.store.borrow().forward.serialize(serializer)
    }
}

impl<'de, K, V> Deserialize<'de> for BiMap<K, V>
where
    K: Deserialize<'de> + Clone + Eq + Hash,
    V: Deserialize<'de> + Clone + Eq + Hash,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let forward: IndexMap<K, V> = IndexMap::deserialize(deserializer)?;
        let mut map = Self::new();
        for (key, value) in forward {
            map.put(key, value);
        }
        Ok(map)
    }
}

/// Aliasing view over a [`BiMap`] with key/value roles swapped.
///
/// Produced by [`BiMap::inverse`]; shares ownership of the underlying
/// stores with the originating map. [`InverseBiMap::inverse`] hands back a
/// [`BiMap`] over those same stores.
pub struct InverseBiMap<K, V> {
    store: Rc<RefCell<BiMapStore<K, V>>>,
}

impl<K, V> InverseBiMap<K, V> {
    /// Number of stored pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.borrow().forward.len()
    }

    /// Whether no pairs are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.borrow().forward.is_empty()
    }

    /// The forward-oriented handle over the same two stores.
    #[must_use]
    pub fn inverse(&self) -> BiMap<K, V> {
        BiMap {
            store: Rc::clone(&self.store),
        }
    }
}

impl<K, V> InverseBiMap<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash,
{
    /// Insert `(value, key)` seen from the inverse orientation; same
    /// last-write-wins contract as [`BiMap::put`].
    pub fn put(&mut self, key: V, value: K) -> (Option<K>, Option<V>) {
        let mut store = self.store.borrow_mut();
        let BiMapStore { forward, inverse } = &mut *store;
        put_pair(inverse, forward, key, value)
    }

    /// The original-key bound to `key` (an original value), if any.
    #[must_use]
    pub fn get(&self, key: &V) -> Option<K> {
        self.store.borrow().inverse.get(key).cloned()
    }

    /// Inverse lookup from this view's perspective.
    #[must_use]
    pub fn get_key(&self, value: &K) -> Option<V> {
        self.store.borrow().forward.get(value).cloned()
    }

    /// Whether `key` (an original value) is bound.
    #[must_use]
    pub fn contains_key(&self, key: &V) -> bool {
        self.store.borrow().inverse.contains_key(key)
    }

    /// Whether `value` (an original key) is bound.
    #[must_use]
    pub fn contains_value(&self, value: &K) -> bool {
        self.store.borrow().forward.contains_key(value)
    }

    /// Remove the pair bound to `key` (an original value).
    pub fn remove(&mut self, key: &V) -> Option<K> {
        let mut store = self.store.borrow_mut();
        let BiMapStore { forward, inverse } = &mut *store;
        remove_pair(inverse, forward, key)
    }

    /// Symmetric removal keyed by this view's value (an original key).
    pub fn remove_value(&mut self, value: &K) -> Option<V> {
        let mut store = self.store.borrow_mut();
        let BiMapStore { forward, inverse } = &mut *store;
        remove_pair(forward, inverse, value)
    }

    /// Snapshot of all `(value, key)` pairs from this view's perspective.
    #[must_use]
    pub fn pairs(&self) -> Vec<(V, K)> {
        self.store
            .borrow()
            .inverse
            .iter()
            .map(|(v, k)| (v.clone(), k.clone()))
            .collect()
    }
}

impl<K, V> Debug for InverseBiMap<K, V>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.store.borrow().inverse.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_lookup() {
        let mut map = BiMap::new();
        assert_eq!(map.put('a', 100), (None, None));
        assert_eq!(map.get(&'a'), Some(100));
        assert_eq!(map.get_key(&100), Some('a'));
        assert_eq!(map.get(&'b'), None);
        assert_eq!(map.get_key(&101), None);
    }

    #[test]
    fn test_put_severs_both_prior_bindings() {
        let mut map = BiMap::from([('a', 100), ('b', 101)]);
        // (a,101) severs a->100 and b->101 in one operation.
        assert_eq!(map.put('a', 101), (Some(100), Some('b')));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&'a'), Some(101));
        assert_eq!(map.get(&'b'), None);
        assert_eq!(map.get_key(&100), None);
    }

    #[test]
    fn test_put_same_pair_is_idempotent() {
        let mut map = BiMap::new();
        map.put('a', 100);
        assert_eq!(map.put('a', 100), (Some(100), Some('a')));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&'a'), Some(100));
    }

    #[test]
    fn test_remove_both_directions() {
        let mut map = BiMap::from([('a', 100), ('b', 101)]);
        assert_eq!(map.remove(&'a'), Some(100));
        assert_eq!(map.get_key(&100), None);
        assert_eq!(map.remove(&'a'), None);

        assert_eq!(map.remove_value(&101), Some('b'));
        assert!(map.is_empty());
    }

    #[test]
    fn test_inverse_is_an_aliasing_view() {
        let mut map = BiMap::new();
        map.put('a', 100);

        let mut view = map.inverse();
        assert_eq!(view.get(&100), Some('a'));

        // Mutation through the view is visible through the original.
        view.put(200, 'b');
        assert_eq!(map.get(&'b'), Some(200));

        // And the other way round.
        map.put('c', 300);
        assert_eq!(view.get(&300), Some('c'));

        // inverse() of the view aliases the original stores.
        let mut back = view.inverse();
        back.remove(&'a');
        assert_eq!(map.get(&'a'), None);
        assert_eq!(view.get(&100), None);
    }

    #[test]
    fn test_clone_is_a_deep_copy() {
        let mut map = BiMap::from([('a', 100)]);
        let copy = map.clone();
        map.put('b', 200);
        assert_eq!(copy.len(), 1);
        assert_eq!(copy.get(&'b'), None);
    }

    #[test]
    fn test_serde_round_trip() {
        let map = BiMap::from([("a".to_string(), 1u32), ("b".to_string(), 2u32)]);
        let json = serde_json::to_string(&map).unwrap();
        let back: BiMap<String, u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
        assert_eq!(back.get_key(&2), Some("b".to_string()));
    }
}
