//! Key-to-many-values map with pluggable bucket policies.
//!
//! [`Multimap`] maps each key to a *bucket* of values; the bucket type
//! selects the duplicate/ordering policy (see [`crate::bucket`]). Keys keep
//! insertion order. Concrete variants:
//!
//! - [`ListMultimap`] — duplicate-preserving buckets (multigraph-safe)
//! - [`SetMultimap`] — de-duplicating, insertion-ordered buckets
//! - [`TopKMultimap`] — capacity-bounded top-`K` buckets
//!
//! For comparator-ordered keys with floor/ceiling queries see
//! [`OrderedMultimap`](crate::OrderedMultimap).
//!
//! # Absence vs. emptiness
//!
//! A key with *no* bucket and a key with an *empty* bucket are distinct
//! states: [`Multimap::add`] creates a bucket and inserts, while
//! [`Multimap::touch`] registers a key with an empty bucket (an isolated
//! node with zero edges). Lookups on an absent key return `None`; an empty
//! bucket is returned as-is. The [`values`](Multimap::values) iterator
//! transparently skips empty buckets.
//!
//! # Defensive copying
//!
//! [`Multimap::get`] returns a fresh, independent copy of the bucket;
//! mutating the result never affects the map.
//!
//! # Examples
//!
//! ```ignore
//! use bibrel::{ListMultimap, SetMultimap};
//!
//! let mut refs: SetMultimap<String, String> = SetMultimap::new();
//! refs.add("gnd/118540238".to_string(), "gnd/118540475".to_string());
//! refs.add("gnd/118540238".to_string(), "gnd/118540475".to_string());
//! assert_eq!(refs.len(), 1); // de-duplicated
//! ```

use std::fmt::{self, Debug};
use std::hash::Hash;

use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::bucket::{ListBucket, SetBucket, TopKBucket, ValueBucket};

/// Multimap with duplicate-preserving buckets (proper multigraph edges).
pub type ListMultimap<K, V> = Multimap<K, ListBucket<V>>;

/// Multimap with de-duplicating, insertion-ordered buckets.
pub type SetMultimap<K, V> = Multimap<K, SetBucket<V>>;

/// Multimap whose buckets retain only the `C` highest-ranking values.
pub type TopKMultimap<K, V, const C: usize> = Multimap<K, TopKBucket<V, C>>;

/// A mapping from keys to buckets of values.
///
/// Never maps a key to "nothing": absence of a key means "no bucket",
/// while a present-but-empty bucket (created by [`touch`](Multimap::touch))
/// is a valid, distinct state.
#[derive(Clone)]
pub struct Multimap<K, B> {
    inner: IndexMap<K, B>,
}

// Not derived: IndexMap implements PartialEq only for Eq + Hash keys.
impl<K, B> PartialEq for Multimap<K, B>
where
    K: Eq + Hash,
    B: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<K, B> Eq for Multimap<K, B>
where
    K: Eq + Hash,
    B: Eq,
{
}

impl<K, B> Default for Multimap<K, B> {
    fn default() -> Self {
        Self {
            inner: IndexMap::new(),
        }
    }
}

impl<K, B> Multimap<K, B> {
    /// Create an empty multimap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys with a bucket (including empty, touched buckets).
    #[must_use]
    pub fn num_keys(&self) -> usize {
        self.inner.len()
    }

    /// Whether the map holds no keys at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Drop every bucket.
    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

impl<K, B> Multimap<K, B>
where
    K: Clone + Eq + Hash,
    B: ValueBucket,
{
    /// Insert `value` into the bucket for `key`, creating the bucket if
    /// absent. Returns whether the bucket accepted the value.
    pub fn add(&mut self, key: K, value: B::Value) -> bool {
        self.inner.entry(key).or_default().insert(value)
    }

    /// Register `key` with an empty bucket if it has none; no-op otherwise.
    ///
    /// This lets a key exist as an isolated node with zero edges.
    pub fn touch(&mut self, key: K) {
        self.inner.entry(key).or_default();
    }

    /// A fresh, independent copy of the bucket for `key`, or `None` if the
    /// key has no bucket at all.
    ///
    /// Mutating the returned bucket never affects the map.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<B> {
        self.inner.get(key).cloned()
    }

    /// Like [`get`](Multimap::get) but returns an empty bucket instead of
    /// `None` for an absent key.
    #[must_use]
    pub fn get_or_empty(&self, key: &K) -> B {
        self.get(key).unwrap_or_default()
    }

    /// Delete the entire bucket for `key`, returning its last contents.
    pub fn remove(&mut self, key: &K) -> Option<B> {
        self.inner.shift_remove(key)
    }

    /// Remove one occurrence of `value` from the bucket for `key`.
    ///
    /// A bucket emptied by this removal is deleted entirely, so removal
    /// never leaves dangling empty entries behind (touch-created empty
    /// buckets are unaffected). Returns whether an occurrence was removed.
    pub fn remove_one(&mut self, key: &K, value: &B::Value) -> bool {
        let Some(bucket) = self.inner.get_mut(key) else {
            return false;
        };
        let removed = bucket.remove_one(value);
        if removed && bucket.is_empty() {
            self.inner.shift_remove(key);
        }
        removed
    }

    /// Whether `key` has a bucket (possibly empty).
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }

    /// Whether the bucket for `key` holds at least one occurrence of `value`.
    #[must_use]
    pub fn contains(&self, key: &K, value: &B::Value) -> bool {
        self.inner
            .get(key)
            .is_some_and(|bucket| bucket.contains(value))
    }

    /// Total number of stored values across all buckets, counting
    /// duplicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.values().map(ValueBucket::len).sum()
    }

    /// Iterate over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.inner.keys()
    }

    /// Iterate over `(key, bucket)` pairs in key insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &B)> {
        self.inner.iter()
    }

    /// Lazy iterator over all values across all buckets, in key-then-bucket
    /// order, transparently skipping empty buckets.
    ///
    /// The iterator is restartable (call `values()` again) and finite; it
    /// never prefetches beyond the first non-empty remainder.
    pub fn values(&self) -> Values<'_, K, B> {
        Values {
            buckets: self.inner.iter(),
            current: None,
        }
    }

    pub(crate) fn bucket(&self, key: &K) -> Option<&B> {
        self.inner.get(key)
    }
}

impl<K, B> Extend<(K, B::Value)> for Multimap<K, B>
where
    K: Clone + Eq + Hash,
    B: ValueBucket,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, B::Value)>,
    {
        for (key, value) in iter {
            self.add(key, value);
        }
    }
}

impl<K, B> FromIterator<(K, B::Value)> for Multimap<K, B>
where
    K: Clone + Eq + Hash,
    B: ValueBucket,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, B::Value)>,
    {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, B, const N: usize> From<[(K, B::Value); N]> for Multimap<K, B>
where
    K: Clone + Eq + Hash,
    B: ValueBucket,
{
    fn from(arr: [(K, B::Value); N]) -> Self {
        Self::from_iter(arr)
    }
}

impl<K, B> Debug for Multimap<K, B>
where
    K: Debug,
    B: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.inner.iter()).finish()
    }
}

/// Lazy iterator over every value of a [`Multimap`], produced by
/// [`Multimap::values`].
pub struct Values<'a, K, B>
where
    B: ValueBucket + 'a,
    B::Value: 'a,
{
    buckets: indexmap::map::Iter<'a, K, B>,
    current: Option<B::Iter<'a>>,
}

impl<'a, K, B> Iterator for Values<'a, K, B>
where
    B: ValueBucket + 'a,
    B::Value: 'a,
{
    type Item = &'a B::Value;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(iter) = self.current.as_mut() {
                if let Some(value) = iter.next() {
                    return Some(value);
                }
            }
            // Advance to the next bucket; empty buckets fall through the
            // loop without yielding.
            let (_, bucket) = self.buckets.next()?;
            self.current = Some(bucket.iter());
        }
    }
}

impl<'a, K, B> Debug for Values<'a, K, B>
where
    B: ValueBucket + 'a,
    B::Value: 'a,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Values").finish_non_exhaustive()
    }
}

impl<K, B> Serialize for Multimap<K, B>
where
    K: Serialize,
    B: ValueBucket,
    B::Value: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Map of key -> value sequence; empty (touched) buckets serialize
        // as empty sequences so they survive a round trip.
        let mut map = serializer.serialize_map(Some(self.inner.len()))?;
        for (key, bucket) in &self.inner {
            map.serialize_entry(key, &BucketSeq(bucket))?;
        }
        map.end()
    }
}

struct BucketSeq<'a, B>(&'a B);

impl<B> Serialize for BucketSeq<'_, B>
where
    B: ValueBucket,
    B::Value: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.0.iter())
    }
}

impl<'de, K, B> Deserialize<'de> for Multimap<K, B>
where
    K: Deserialize<'de> + Clone + Eq + Hash,
    B: ValueBucket,
    B::Value: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries: IndexMap<K, Vec<B::Value>> = IndexMap::deserialize(deserializer)?;
        let mut map = Self::new();
        for (key, values) in entries {
            map.touch(key.clone());
            for value in values {
                map.add(key.clone(), value);
            }
        }
        Ok(map)
    }
}
