//! Multimap with comparator-ordered keys and navigable key queries.
//!
//! [`OrderedMultimap`] keeps keys in ascending `Ord` order (B-tree backed)
//! and buckets in ascending value order. On top of the usual multimap
//! contract it answers floor-key/ceiling-key queries and yields the key set
//! in descending order.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt::{self, Debug};

use crate::bucket::{OrderedBucket, ValueBucket};

/// A multimap whose keys and buckets are kept in comparator order.
#[derive(Clone, PartialEq, Eq)]
pub struct OrderedMultimap<K, V> {
    inner: BTreeMap<K, OrderedBucket<V>>,
}

impl<K, V> Default for OrderedMultimap<K, V> {
    fn default() -> Self {
        Self {
            inner: BTreeMap::new(),
        }
    }
}

impl<K, V> OrderedMultimap<K, V> {
    /// Create an empty map.
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

impl<K, V> OrderedMultimap<K, V>
where
    K: Clone + Ord,
    V: Clone + Ord,
{
    /// Insert `value` into the bucket for `key`, creating the bucket if
    /// absent. Returns whether the bucket accepted the value.
    pub fn add(&mut self, key: K, value: V) -> bool {
        self.inner.entry(key).or_default().insert(value)
    }

    /// Register `key` with an empty bucket if it has none; no-op otherwise.
    pub fn touch(&mut self, key: K) {
        self.inner.entry(key).or_default();
    }

    /// A fresh, independent copy of the bucket for `key`, or `None` if the
    /// key has no bucket at all.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<OrderedBucket<V>> {
        self.inner.get(key).cloned()
    }

    /// Like [`get`](OrderedMultimap::get) but returns an empty bucket for
    /// an absent key.
    #[must_use]
    pub fn get_or_empty(&self, key: &K) -> OrderedBucket<V> {
        self.get(key).unwrap_or_default()
    }

    /// Delete the entire bucket for `key`, returning its last contents.
    pub fn remove(&mut self, key: &K) -> Option<OrderedBucket<V>> {
        self.inner.remove(key)
    }

    /// Remove one occurrence of `value` from the bucket for `key`,
    /// deleting the bucket if the removal empties it.
    pub fn remove_one(&mut self, key: &K, value: &V) -> bool {
        let Some(bucket) = self.inner.get_mut(key) else {
            return false;
        };
        let removed = bucket.remove_one(value);
        if removed && bucket.is_empty() {
            self.inner.remove(key);
        }
        removed
    }

    /// Whether `key` has a bucket (possibly empty).
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }

    /// Total number of stored values across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.values().map(ValueBucket::len).sum()
    }

    /// Iterate over the keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.inner.keys()
    }

    /// Iterate over the keys in descending order.
    pub fn descending_keys(&self) -> impl Iterator<Item = &K> {
        self.inner.keys().rev()
    }

    /// The greatest key less than or equal to `key`, if any.
    #[must_use]
    pub fn floor_key(&self, key: &K) -> Option<&K> {
        self.inner.range(..=key).next_back().map(|(k, _)| k)
    }

    /// The least key greater than or equal to `key`, if any.
    #[must_use]
    pub fn ceiling_key(&self, key: &K) -> Option<&K> {
        self.inner.range(key..).next().map(|(k, _)| k)
    }

    /// Iterate over `(key, bucket)` pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &OrderedBucket<V>)> {
        self.inner.iter()
    }

    /// Lazy iterator over all values in key-then-bucket order, skipping
    /// empty buckets.
    pub fn values(&self) -> OrderedValues<'_, K, V> {
        OrderedValues {
            buckets: self.inner.iter(),
            current: None,
        }
    }
}

/// Lazy iterator over every value of an [`OrderedMultimap`].
pub struct OrderedValues<'a, K, V> {
    buckets: btree_map::Iter<'a, K, OrderedBucket<V>>,
    current: Option<std::collections::btree_set::Iter<'a, V>>,
}

impl<'a, K, V: Clone + Ord> Iterator for OrderedValues<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(iter) = self.current.as_mut() {
                if let Some(value) = iter.next() {
                    return Some(value);
                }
            }
            let (_, bucket) = self.buckets.next()?;
            self.current = Some(bucket.iter());
        }
    }
}

impl<K, V> Debug for OrderedValues<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedValues").finish_non_exhaustive()
    }
}

impl<K, V> Debug for OrderedMultimap<K, V>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.inner.iter()).finish()
    }
}

impl<K, V> Extend<(K, V)> for OrderedMultimap<K, V>
where
    K: Clone + Ord,
    V: Clone + Ord,
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

impl<K, V> FromIterator<(K, V)> for OrderedMultimap<K, V>
where
    K: Clone + Ord,
    V: Clone + Ord,
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

impl<K, V> serde::Serialize for OrderedMultimap<K, V>
where
    K: serde::Serialize,
    V: serde::Serialize + Clone + Ord,
{
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.inner.len()))?;
        for (key, bucket) in &self.inner {
            map.serialize_entry(key, &bucket.to_vec())?;
        }
        map.end()
    }
}

impl<'de, K, V> serde::Deserialize<'de> for OrderedMultimap<K, V>
where
    K: serde::Deserialize<'de> + Clone + Ord,
    V: serde::Deserialize<'de> + Clone + Ord,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let entries: BTreeMap<K, Vec<V>> = BTreeMap::deserialize(deserializer)?;
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
