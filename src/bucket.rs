//! Value-bucket strategies for multimaps.
//!
//! A *bucket* is the collection of values associated with one multimap key.
//! The [`ValueBucket`] trait makes the duplicate/ordering policy pluggable
//! while the [`Multimap`](crate::Multimap) contract stays uniform:
//!
//! - [`ListBucket`] preserves duplicates and insertion order (multigraph-safe)
//! - [`SetBucket`] de-duplicates, preserves insertion order
//! - [`OrderedBucket`] de-duplicates, keeps values in comparator order
//! - [`TopKBucket`] keeps only the `K` highest-ranking values

use std::collections::btree_set;
use std::collections::BTreeSet;

use indexmap::IndexSet;

/// The collection of values stored under one multimap key.
///
/// Implementations choose the duplicate and ordering policy; the multimap
/// itself never manipulates bucket internals directly.
pub trait ValueBucket: Default + Clone {
    /// The value type held by this bucket.
    type Value;

    /// Borrowing iterator over the bucket's values, in policy order.
    type Iter<'a>: Iterator<Item = &'a Self::Value>
    where
        Self: 'a,
        Self::Value: 'a;

    /// Insert a value per the bucket's policy.
    ///
    /// Returns `true` if the bucket changed (a duplicate rejected by a
    /// de-duplicating policy, or a value outranked by a full
    /// [`TopKBucket`], leaves the bucket unchanged and returns `false`).
    fn insert(&mut self, value: Self::Value) -> bool;

    /// Remove one occurrence of `value`; returns whether one was present.
    fn remove_one(&mut self, value: &Self::Value) -> bool;

    /// Whether at least one occurrence of `value` is present.
    fn contains(&self, value: &Self::Value) -> bool;

    /// Number of stored values, counting duplicates.
    fn len(&self) -> usize;

    /// Whether the bucket holds no values.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the values in policy order.
    fn iter(&self) -> Self::Iter<'_>;

    /// Copy the values out into a `Vec`, in policy order.
    fn to_vec(&self) -> Vec<Self::Value>
    where
        Self::Value: Clone,
    {
        self.iter().cloned().collect()
    }
}

/// Duplicate-preserving bucket: values keep insertion order, parallel
/// occurrences of the same value are all retained.
///
/// This is the policy that makes a relation a proper multigraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListBucket<V> {
    values: Vec<V>,
}

impl<V> Default for ListBucket<V> {
    fn default() -> Self {
        Self { values: Vec::new() }
    }
}

impl<V: Clone + PartialEq> ValueBucket for ListBucket<V> {
    type Value = V;
    type Iter<'a>
        = std::slice::Iter<'a, V>
    where
        Self: 'a,
        V: 'a;

    fn insert(&mut self, value: V) -> bool {
        self.values.push(value);
        true
    }

    fn remove_one(&mut self, value: &V) -> bool {
        match self.values.iter().position(|v| v == value) {
            Some(index) => {
                // Shift-remove keeps the order of the remaining occurrences.
                self.values.remove(index);
                true
            }
            None => false,
        }
    }

    fn contains(&self, value: &V) -> bool {
        self.values.contains(value)
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.values.iter()
    }
}

/// De-duplicating bucket that preserves insertion order.
#[derive(Debug, Clone)]
pub struct SetBucket<V> {
    values: IndexSet<V>,
}

// Not derived: IndexSet implements PartialEq only for Eq + Hash elements.
impl<V: Eq + std::hash::Hash> PartialEq for SetBucket<V> {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl<V: Eq + std::hash::Hash> Eq for SetBucket<V> {}

impl<V> Default for SetBucket<V> {
    fn default() -> Self {
        Self {
            values: IndexSet::new(),
        }
    }
}

impl<V: Clone + Eq + std::hash::Hash> ValueBucket for SetBucket<V> {
    type Value = V;
    type Iter<'a>
        = indexmap::set::Iter<'a, V>
    where
        Self: 'a,
        V: 'a;

    fn insert(&mut self, value: V) -> bool {
        self.values.insert(value)
    }

    fn remove_one(&mut self, value: &V) -> bool {
        self.values.shift_remove(value)
    }

    fn contains(&self, value: &V) -> bool {
        self.values.contains(value)
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.values.iter()
    }
}

/// De-duplicating bucket whose values are kept in ascending `Ord` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedBucket<V> {
    values: BTreeSet<V>,
}

impl<V> Default for OrderedBucket<V> {
    fn default() -> Self {
        Self {
            values: BTreeSet::new(),
        }
    }
}

impl<V: Ord> OrderedBucket<V> {
    /// The smallest stored value.
    #[must_use]
    pub fn min(&self) -> Option<&V> {
        self.values.first()
    }

    /// The largest stored value.
    #[must_use]
    pub fn max(&self) -> Option<&V> {
        self.values.last()
    }
}

impl<V: Clone + Ord> ValueBucket for OrderedBucket<V> {
    type Value = V;
    type Iter<'a>
        = btree_set::Iter<'a, V>
    where
        Self: 'a,
        V: 'a;

    fn insert(&mut self, value: V) -> bool {
        self.values.insert(value)
    }

    fn remove_one(&mut self, value: &V) -> bool {
        self.values.remove(value)
    }

    fn contains(&self, value: &V) -> bool {
        self.values.contains(value)
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.values.iter()
    }
}

/// Capacity-bounded bucket retaining only the `K` highest-ranking values.
///
/// A new value is accepted only if the bucket holds fewer than `K` entries
/// or the value outranks the current minimum; on acceptance past capacity
/// the current minimum is evicted first. Values are de-duplicated.
///
/// [`ValueBucket::iter`] yields ascending order like [`OrderedBucket`];
/// use [`ordered`](TopKBucket::ordered) for descending rank.
///
/// A `TopKBucket<V, 0>` accepts nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopKBucket<V, const K: usize> {
    values: BTreeSet<V>,
}

impl<V, const K: usize> Default for TopKBucket<V, K> {
    fn default() -> Self {
        Self {
            values: BTreeSet::new(),
        }
    }
}

impl<V: Ord, const K: usize> TopKBucket<V, K> {
    /// The fixed capacity of this bucket.
    #[must_use]
    pub fn capacity(&self) -> usize {
        K
    }

    /// Iterate over the retained values in descending rank order.
    pub fn ordered(&self) -> impl Iterator<Item = &V> {
        self.values.iter().rev()
    }
}

impl<V: Clone + Ord, const K: usize> ValueBucket for TopKBucket<V, K> {
    type Value = V;
    type Iter<'a>
        = btree_set::Iter<'a, V>
    where
        Self: 'a,
        V: 'a;

    fn insert(&mut self, value: V) -> bool {
        if K == 0 || self.values.contains(&value) {
            return false;
        }
        if self.values.len() < K {
            return self.values.insert(value);
        }
        // Full: accept only if the value outranks the current minimum,
        // evicting the minimum first.
        match self.values.first() {
            Some(min) if value > *min => {
                self.values.pop_first();
                self.values.insert(value)
            }
            _ => false,
        }
    }

    fn remove_one(&mut self, value: &V) -> bool {
        self.values.remove(value)
    }

    fn contains(&self, value: &V) -> bool {
        self.values.contains(value)
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.values.iter()
    }
}
