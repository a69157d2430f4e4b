//! Many-to-many relation backed by two mutually consistent multimaps.
//!
//! [`BiMultimap`] stores every edge `(k, v)` twice: in a forward multimap
//! `K -> {V}` and an inverse multimap `V -> {K}`. The mirror invariant
//! holds at all times: `v` is in the forward bucket of `k` **iff** `k` is
//! in the inverse bucket of `v`.
//!
//! Two construction modes select the edge policy:
//!
//! - [`ListBiMultimap`] — duplicate edges allowed (proper multigraph)
//! - [`SetBiMultimap`] — edges de-duplicated (simple graph)
//!
//! Buckets emptied by removal are deleted from their store, so isolated
//! nodes disappear unless re-registered with
//! [`touch_key`](BiMultimap::touch_key) /
//! [`touch_value`](BiMultimap::touch_value).
//!
//! [`BiMultimap::inverse`] returns a zero-copy aliasing view over the same
//! two stores with roles swapped, exactly like
//! [`BiMap::inverse`](crate::BiMap::inverse).
//!
//! # Examples
//!
//! ```ignore
//! use bibrel::SetBiMultimap;
//!
//! // Authority cross-references: heading -> related headings.
//! let mut see_also: SetBiMultimap<String, String> = SetBiMultimap::new();
//! see_also.add("Goethe".to_string(), "Weimar Classicism".to_string());
//! see_also.add("Schiller".to_string(), "Weimar Classicism".to_string());
//! assert_eq!(see_also.key_set(&"Weimar Classicism".to_string()).len(), 2);
//! ```

use std::cell::RefCell;
use std::fmt::{self, Debug};
use std::hash::Hash;
use std::rc::Rc;

use indexmap::IndexSet;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::bucket::{ListBucket, SetBucket, ValueBucket};
use crate::error::{RelationError, Result};
use crate::multimap::Multimap;

/// Many-to-many relation with duplicate edges allowed (multigraph).
pub type ListBiMultimap<K, V> = BiMultimap<K, V, ListBucket<V>, ListBucket<K>>;

/// Many-to-many relation with de-duplicated edges (simple graph).
pub type SetBiMultimap<K, V> = BiMultimap<K, V, SetBucket<V>, SetBucket<K>>;

/// Aliasing view over a [`ListBiMultimap`].
pub type InverseListBiMultimap<K, V> = InverseBiMultimap<K, V, ListBucket<V>, ListBucket<K>>;

/// Aliasing view over a [`SetBiMultimap`].
pub type InverseSetBiMultimap<K, V> = InverseBiMultimap<K, V, SetBucket<V>, SetBucket<K>>;

pub(crate) struct BiMultimapStore<K, V, FB, IB> {
    pub(crate) forward: Multimap<K, FB>,
    pub(crate) inverse: Multimap<V, IB>,
}

/// Insert the edge `(a, b)` into both sides of a mirrored multimap pair as
/// one logical operation.
fn add_edge<A, B, BA, BB>(forward: &mut Multimap<A, BA>, inverse: &mut Multimap<B, BB>, a: A, b: B)
where
    A: Clone + Eq + Hash,
    B: Clone + Eq + Hash,
    BA: ValueBucket<Value = B>,
    BB: ValueBucket<Value = A>,
{
    let accepted_forward = forward.add(a.clone(), b.clone());
    let accepted_inverse = inverse.add(b, a);
    // Both sides must make the same accept/reject decision, or the stores
    // have diverged.
    debug_assert_eq!(accepted_forward, accepted_inverse);
}

/// Remove one occurrence of the edge `(a, b)` from both sides.
fn remove_edge<A, B, BA, BB>(
    forward: &mut Multimap<A, BA>,
    inverse: &mut Multimap<B, BB>,
    a: &A,
    b: &B,
) -> bool
where
    A: Clone + Eq + Hash,
    B: Clone + Eq + Hash,
    BA: ValueBucket<Value = B>,
    BB: ValueBucket<Value = A>,
{
    let removed_forward = forward.remove_one(a, b);
    let removed_inverse = inverse.remove_one(b, a);
    debug_assert_eq!(removed_forward, removed_inverse);
    removed_forward
}

/// A many-to-many relation between keys and values.
pub struct BiMultimap<K, V, FB, IB> {
    store: Rc<RefCell<BiMultimapStore<K, V, FB, IB>>>,
}

impl<K, V, FB, IB> Default for BiMultimap<K, V, FB, IB>
where
    FB: ValueBucket<Value = V>,
    IB: ValueBucket<Value = K>,
{
    fn default() -> Self {
        Self {
            store: Rc::new(RefCell::new(BiMultimapStore {
                forward: Multimap::new(),
                inverse: Multimap::new(),
            })),
        }
    }
}

impl<K, V, FB, IB> BiMultimap<K, V, FB, IB>
where
    FB: ValueBucket<Value = V>,
    IB: ValueBucket<Value = K>,
{
    /// Create an empty relation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An aliasing view over the same two stores with key/value roles
    /// swapped.
    ///
    /// Shares ownership of both stores with `self`; mutating either handle
    /// mutates both. Never a copy.
    #[must_use]
    pub fn inverse(&self) -> InverseBiMultimap<K, V, FB, IB> {
        InverseBiMultimap {
            store: Rc::clone(&self.store),
        }
    }
}

impl<K, V, FB, IB> BiMultimap<K, V, FB, IB>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash,
    FB: ValueBucket<Value = V>,
    IB: ValueBucket<Value = K>,
{
    /// Insert the edge `(key, value)` into both sides as one logical
    /// operation; there is no partial-insert state.
    pub fn add(&mut self, key: K, value: V) {
        let mut store = self.store.borrow_mut();
        let BiMultimapStore { forward, inverse } = &mut *store;
        add_edge(forward, inverse, key, value);
    }

    /// Register `key` as an isolated node with zero edges (no-op if the
    /// key already has a forward bucket).
    pub fn touch_key(&mut self, key: K) {
        self.store.borrow_mut().forward.touch(key);
    }

    /// Register `value` as an isolated node with zero edges.
    pub fn touch_value(&mut self, value: V) {
        self.store.borrow_mut().inverse.touch(value);
    }

    /// Remove exactly one occurrence of the edge `(key, value)` from both
    /// sides. Buckets emptied by the removal are deleted from their store.
    ///
    /// Returns whether an occurrence was present and removed.
    pub fn remove(&mut self, key: &K, value: &V) -> bool {
        let mut store = self.store.borrow_mut();
        let BiMultimapStore { forward, inverse } = &mut *store;
        remove_edge(forward, inverse, key, value)
    }

    /// Remove every parallel occurrence of the edge `(key, value)` by
    /// applying [`remove`](BiMultimap::remove) until it reports nothing
    /// removed. Returns the number of occurrences removed.
    ///
    /// This is the correct way to erase an edge entirely in multigraph
    /// (list-backed) mode.
    pub fn remove_all(&mut self, key: &K, value: &V) -> usize {
        let mut removed = 0;
        while self.remove(key, value) {
            removed += 1;
        }
        removed
    }

    /// Drop all edges from `key`.
    ///
    /// Snapshots the current value bucket of `key`, then applies
    /// [`remove_all`](BiMultimap::remove_all) for each snapshot entry; any
    /// other order (such as clearing the forward bucket directly) would
    /// leave the inverse side holding stale references to `key`.
    ///
    /// Returns the snapshot, or `None` if `key` had no bucket. A
    /// touch-created empty bucket survives (nothing to remove).
    pub fn remove_key(&mut self, key: &K) -> Option<Vec<V>> {
        let snapshot: Vec<V> = {
            let store = self.store.borrow();
            store.forward.get(key)?.to_vec()
        };
        for value in &snapshot {
            self.remove_all(key, value);
        }
        Some(snapshot)
    }

    /// Drop all edges into `value`; symmetric to
    /// [`remove_key`](BiMultimap::remove_key).
    pub fn remove_value(&mut self, value: &V) -> Option<Vec<K>> {
        let snapshot: Vec<K> = {
            let store = self.store.borrow();
            store.inverse.get(value)?.to_vec()
        };
        for key in &snapshot {
            self.remove_all(key, value);
        }
        Some(snapshot)
    }

    /// De-duplicated set of values adjacent to `key`, in bucket order.
    #[must_use]
    pub fn value_set(&self, key: &K) -> IndexSet<V> {
        let store = self.store.borrow();
        store
            .forward
            .bucket(key)
            .map(|bucket| bucket.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// De-duplicated set of keys adjacent to `value`, in bucket order.
    #[must_use]
    pub fn key_set(&self, value: &V) -> IndexSet<K> {
        let store = self.store.borrow();
        store
            .inverse
            .bucket(value)
            .map(|bucket| bucket.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// The full key domain (every key with a forward bucket, including
    /// touched ones).
    #[must_use]
    pub fn all_keys(&self) -> IndexSet<K> {
        self.store.borrow().forward.keys().cloned().collect()
    }

    /// The full value codomain.
    #[must_use]
    pub fn all_values(&self) -> IndexSet<V> {
        self.store.borrow().inverse.keys().cloned().collect()
    }

    /// Whether `key` has a forward bucket.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.store.borrow().forward.contains_key(key)
    }

    /// Whether `value` has an inverse bucket.
    #[must_use]
    pub fn contains_value(&self, value: &V) -> bool {
        self.store.borrow().inverse.contains_key(value)
    }

    /// Whether at least one occurrence of the edge `(key, value)` exists.
    #[must_use]
    pub fn contains(&self, key: &K, value: &V) -> bool {
        self.store.borrow().forward.contains(key, value)
    }

    /// Number of occurrences of the edge `(key, value)`.
    #[must_use]
    pub fn edge_count(&self, key: &K, value: &V) -> usize {
        let store = self.store.borrow();
        store
            .forward
            .bucket(key)
            .map(|bucket| bucket.iter().filter(|v| *v == value).count())
            .unwrap_or(0)
    }

    /// Total number of edges, counting parallel duplicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.borrow().forward.len()
    }

    /// Whether the relation holds no keys and no values at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let store = self.store.borrow();
        store.forward.is_empty() && store.inverse.is_empty()
    }

    /// Number of keys with a forward bucket.
    #[must_use]
    pub fn num_keys(&self) -> usize {
        self.store.borrow().forward.num_keys()
    }

    /// Number of values with an inverse bucket.
    #[must_use]
    pub fn num_values(&self) -> usize {
        self.store.borrow().inverse.num_keys()
    }

    /// Drop every edge and every bucket.
    pub fn clear(&mut self) {
        let mut store = self.store.borrow_mut();
        store.forward.clear();
        store.inverse.clear();
    }

    /// Snapshot of all `(key, value)` edges in forward store order,
    /// including parallel duplicates.
    #[must_use]
    pub fn edges(&self) -> Vec<(K, V)> {
        let store = self.store.borrow();
        store
            .forward
            .iter()
            .flat_map(|(key, bucket)| bucket.iter().map(|value| (key.clone(), value.clone())))
            .collect()
    }

    /// Verify the mirror invariant between the forward and inverse stores.
    ///
    /// A divergence indicates a logic bug (the mutation operations keep
    /// both sides in lockstep); this check exists for tests and debugging.
    pub fn validate(&self) -> Result<()> {
        let store = self.store.borrow();
        for (key, bucket) in store.forward.iter() {
            for value in bucket.iter() {
                if !store.inverse.contains(value, key) {
                    return Err(RelationError::StoreDivergence(
                        "forward edge missing from inverse store".to_string(),
                    ));
                }
            }
        }
        for (value, bucket) in store.inverse.iter() {
            for key in bucket.iter() {
                if !store.forward.contains(key, value) {
                    return Err(RelationError::StoreDivergence(
                        "inverse edge missing from forward store".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl<K, V, FB, IB> Clone for BiMultimap<K, V, FB, IB>
where
    K: Clone,
    V: Clone,
    FB: ValueBucket<Value = V>,
    IB: ValueBucket<Value = K>,
{
    /// Deep copy of both stores. For the aliasing view use
    /// [`inverse`](BiMultimap::inverse) instead.
    fn clone(&self) -> Self {
        let store = self.store.borrow();
        Self {
            store: Rc::new(RefCell::new(BiMultimapStore {
                forward: store.forward.clone(),
                inverse: store.inverse.clone(),
            })),
        }
    }
}

impl<K, V, FB, IB> Debug for BiMultimap<K, V, FB, IB>
where
    K: Debug,
    V: Debug,
    FB: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.store.borrow().forward.fmt(f)
    }
}

impl<K, V, FB, IB> PartialEq for BiMultimap<K, V, FB, IB>
where
    K: Eq + Hash,
    V: Eq + Hash,
    FB: PartialEq,
    IB: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        if Rc::ptr_eq(&self.store, &other.store) {
            return true;
        }
        // Both stores matter: a touch-created empty bucket on the inverse
        // side is observable state even though it carries no edges.
        let ours = self.store.borrow();
        let theirs = other.store.borrow();
        ours.forward == theirs.forward && ours.inverse == theirs.inverse
    }
}

impl<K, V, FB, IB> Extend<(K, V)> for BiMultimap<K, V, FB, IB>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash,
    FB: ValueBucket<Value = V>,
    IB: ValueBucket<Value = K>,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in iter {
            self.add(key, value);
        }
    }
}

impl<K, V, FB, IB> FromIterator<(K, V)> for BiMultimap<K, V, FB, IB>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash,
    FB: ValueBucket<Value = V>,
    IB: ValueBucket<Value = K>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut relation = Self::new();
        relation.extend(iter);
        relation
    }
}

impl<K, V, FB, IB, const N: usize> From<[(K, V); N]> for BiMultimap<K, V, FB, IB>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash,
    FB: ValueBucket<Value = V>,
    IB: ValueBucket<Value = K>,
{
    fn from(arr: [(K, V); N]) -> Self {
        Self::from_iter(arr)
    }
}

impl<K, V, FB, IB> Serialize for BiMultimap<K, V, FB, IB>
where
    K: Serialize,
    V: Serialize,
    FB: ValueBucket<Value = V>,
    IB: ValueBucket<Value = K>,
{
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Both stores are serialized so touch-created empty buckets on
        // either side survive a round trip.
        let store = self.store.borrow();
        (&store.forward, &store.inverse).serialize(serializer)
    }
}

impl<'de, K, V, FB, IB> Deserialize<'de> for BiMultimap<K, V, FB, IB>
where
    K: Deserialize<'de> + Clone + Eq + Hash,
    V: Deserialize<'de> + Clone + Eq + Hash,
    FB: ValueBucket<Value = V>,
    IB: ValueBucket<Value = K>,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (forward, inverse): (Multimap<K, FB>, Multimap<V, IB>) =
            Deserialize::deserialize(deserializer)?;
        let relation = Self {
            store: Rc::new(RefCell::new(BiMultimapStore { forward, inverse })),
        };
        // Input that violates the mirror invariant is rejected here rather
        // than poisoning every later mutation.
        relation.validate().map_err(serde::de::Error::custom)?;
        Ok(relation)
    }
}

/// Aliasing view over a [`BiMultimap`] with key/value roles swapped.
///
/// Produced by [`BiMultimap::inverse`]; shares ownership of the underlying
/// stores. [`InverseBiMultimap::inverse`] hands back a [`BiMultimap`] over
/// those same stores.
pub struct InverseBiMultimap<K, V, FB, IB> {
    store: Rc<RefCell<BiMultimapStore<K, V, FB, IB>>>,
}

impl<K, V, FB, IB> InverseBiMultimap<K, V, FB, IB>
where
    FB: ValueBucket<Value = V>,
    IB: ValueBucket<Value = K>,
{
    /// The forward-oriented handle over the same two stores.
    #[must_use]
    pub fn inverse(&self) -> BiMultimap<K, V, FB, IB> {
        BiMultimap {
            store: Rc::clone(&self.store),
        }
    }
}

impl<K, V, FB, IB> InverseBiMultimap<K, V, FB, IB>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash,
    FB: ValueBucket<Value = V>,
    IB: ValueBucket<Value = K>,
{
    /// Insert the edge `(key, value)` seen from the inverse orientation.
    pub fn add(&mut self, key: V, value: K) {
        let mut store = self.store.borrow_mut();
        let BiMultimapStore { forward, inverse } = &mut *store;
        add_edge(inverse, forward, key, value);
    }

    /// Remove one occurrence of the edge from both sides.
    pub fn remove(&mut self, key: &V, value: &K) -> bool {
        let mut store = self.store.borrow_mut();
        let BiMultimapStore { forward, inverse } = &mut *store;
        remove_edge(inverse, forward, key, value)
    }

    /// Remove every parallel occurrence of the edge; returns the count.
    pub fn remove_all(&mut self, key: &V, value: &K) -> usize {
        let mut removed = 0;
        while self.remove(key, value) {
            removed += 1;
        }
        removed
    }

    /// De-duplicated neighbor set of `key` from this view's perspective.
    #[must_use]
    pub fn value_set(&self, key: &V) -> IndexSet<K> {
        self.inverse().key_set(key)
    }

    /// De-duplicated neighbor set of `value` from this view's perspective.
    #[must_use]
    pub fn key_set(&self, value: &K) -> IndexSet<V> {
        self.inverse().value_set(value)
    }

    /// The key domain of this view (the original value codomain).
    #[must_use]
    pub fn all_keys(&self) -> IndexSet<V> {
        self.inverse().all_values()
    }

    /// The value codomain of this view (the original key domain).
    #[must_use]
    pub fn all_values(&self) -> IndexSet<K> {
        self.inverse().all_keys()
    }

    /// Whether `key` has a bucket in this view's orientation.
    #[must_use]
    pub fn contains_key(&self, key: &V) -> bool {
        self.store.borrow().inverse.contains_key(key)
    }

    /// Whether `value` has a bucket in this view's orientation.
    #[must_use]
    pub fn contains_value(&self, value: &K) -> bool {
        self.store.borrow().forward.contains_key(value)
    }

    /// Total number of edges, counting parallel duplicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.borrow().inverse.len()
    }

    /// Whether the relation holds no keys and no values at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let store = self.store.borrow();
        store.forward.is_empty() && store.inverse.is_empty()
    }
}

impl<K, V, FB, IB> Debug for InverseBiMultimap<K, V, FB, IB>
where
    K: Debug,
    V: Debug,
    IB: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.store.borrow().inverse.fmt(f)
    }
}
