//! Capability traits and relational-join algebra.
//!
//! [`RelationQueries`] is the one-directional capability surface (value-set
//! queries and batch search); [`BiRelation`] extends it with the inverse
//! direction, an aliasing inverse view, and tabular export. Every relation
//! type in this crate implements the applicable trait, so the join
//! operators here are written once against the capability surface instead
//! of per backing implementation.
//!
//! # Join algebra
//!
//! [`join`] is relational composition: `join(left, right)` of `K1 -> V1`
//! and `V1 -> V2` yields `K1 -> V2`. The directional variants
//! ([`join_left`], [`join_right`], [`join_keys`], [`join_values`]) are thin
//! wrappers that invert one operand first; [`search`] answers a single-key
//! composition without materializing the whole joined relation.
//!
//! # Examples
//!
//! ```ignore
//! use bibrel::{join, BiRelation, SetBiMultimap};
//!
//! let mut record_to_gnd: SetBiMultimap<&str, &str> = SetBiMultimap::new();
//! record_to_gnd.add("rec1", "gnd42");
//! let mut gnd_to_label: SetBiMultimap<&str, &str> = SetBiMultimap::new();
//! gnd_to_label.add("gnd42", "Goethe");
//!
//! let record_to_label = join(&record_to_gnd, &gnd_to_label);
//! assert!(record_to_label.contains(&"rec1", &"Goethe"));
//! ```

use std::fmt::Display;
use std::hash::Hash;

use indexmap::IndexSet;

use crate::bimap::{BiMap, InverseBiMap};
use crate::bimultimap::{BiMultimap, InverseBiMultimap, ListBiMultimap, SetBiMultimap};
use crate::bucket::ValueBucket;
use crate::error::{RelationError, Result};
use crate::multimap::Multimap;
use crate::ordered_multimap::OrderedMultimap;

/// One-directional capability surface of a relation: key/value set queries
/// and batch search.
pub trait RelationQueries {
    /// The key domain.
    type Key: Clone + Eq + Hash;
    /// The value codomain.
    type Value: Clone + Eq + Hash;

    /// De-duplicated set of values adjacent to `key`; empty if the key is
    /// absent. The result is an owned snapshot.
    fn value_set(&self, key: &Self::Key) -> IndexSet<Self::Value>;

    /// The full key domain.
    fn all_keys(&self) -> IndexSet<Self::Key>;

    /// The full value codomain.
    fn all_values(&self) -> IndexSet<Self::Value>;

    /// Whether `key` is present in the key domain.
    fn contains_key(&self, key: &Self::Key) -> bool;

    /// Batch point-lookup: the union of [`value_set`](Self::value_set) over
    /// `keys`. Input order is respected and duplicate inputs are processed
    /// once.
    ///
    /// Exists to avoid materializing a full join when a simple lookup chain
    /// suffices.
    fn search_values<'a, I>(&self, keys: I) -> IndexSet<Self::Value>
    where
        I: IntoIterator<Item = &'a Self::Key>,
        Self::Key: 'a,
    {
        let unique: IndexSet<&Self::Key> = keys.into_iter().collect();
        let mut result = IndexSet::new();
        for key in unique {
            result.extend(self.value_set(key));
        }
        result
    }
}

/// Bidirectional capability surface: both lookup directions, an aliasing
/// inverse view, and tabular export.
pub trait BiRelation: RelationQueries {
    /// The type of the aliasing view with key/value roles swapped.
    type Inverse: BiRelation<Key = Self::Value, Value = Self::Key>;

    /// An aliasing view over the same storage with key/value roles swapped.
    fn inverse_view(&self) -> Self::Inverse;

    /// De-duplicated set of keys adjacent to `value`; empty if the value is
    /// absent.
    fn key_set(&self, value: &Self::Value) -> IndexSet<Self::Key>;

    /// Whether `value` is present in the value codomain.
    fn contains_value(&self, value: &Self::Value) -> bool;

    /// Batch point-lookup in the inverse direction; input order respected,
    /// duplicate inputs processed once.
    fn search_keys<'a, I>(&self, values: I) -> IndexSet<Self::Key>
    where
        I: IntoIterator<Item = &'a Self::Value>,
        Self::Value: 'a,
    {
        let unique: IndexSet<&Self::Value> = values.into_iter().collect();
        let mut result = IndexSet::new();
        for value in unique {
            result.extend(self.key_set(value));
        }
        result
    }

    /// Enumerate every `(key, value)` pair as one tab-separated line.
    ///
    /// Iterates the de-duplicated key and value sets, so distinct parallel
    /// edges of a multigraph collapse into one line. This is accepted,
    /// documented behavior; use a set-backed relation where the table must
    /// round-trip losslessly.
    fn to_table(&self) -> String
    where
        Self::Key: Display,
        Self::Value: Display,
    {
        let mut table = String::new();
        for key in self.all_keys() {
            for value in self.value_set(&key) {
                table.push_str(&format!("{key}\t{value}\n"));
            }
        }
        table
    }
}

/// Parse tab-separated `key\tvalue` lines (the [`BiRelation::to_table`]
/// format) into a set-backed relation.
///
/// Blank lines are skipped. Lines without a tab separator produce
/// [`RelationError::InvalidTableLine`].
pub fn from_table(table: &str) -> Result<SetBiMultimap<String, String>> {
    let mut relation = SetBiMultimap::new();
    for (index, line) in table.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once('\t') else {
            return Err(RelationError::InvalidTableLine {
                line: index + 1,
                content: line.to_string(),
            });
        };
        relation.add(key.to_string(), value.to_string());
    }
    Ok(relation)
}

/// Relational composition of `left: K1 -> V1` and `right: V1 -> V2` into a
/// fresh `K1 -> V2` relation.
///
/// For every `v1` in the value codomain of `left`, the cartesian product of
/// `left.key_set(v1)` and `right.value_set(v1)` is unioned into the result.
/// The result is list-backed, so pairs produced through different
/// intermediate values are preserved as parallel edges rather than silently
/// collapsed. It is always newly allocated and independent of its inputs.
///
/// Complexity is driven by the total size of the per-`v1` cartesian blocks,
/// not by `|K1| * |V2|`.
pub fn join<L, R>(left: &L, right: &R) -> ListBiMultimap<L::Key, R::Value>
where
    L: BiRelation,
    R: BiRelation<Key = L::Value>,
{
    let mut result = ListBiMultimap::new();
    for via in left.all_values() {
        let keys = left.key_set(&via);
        let values = right.value_set(&via);
        for key in &keys {
            for value in &values {
                result.add(key.clone(), value.clone());
            }
        }
    }
    result
}

/// [`join`] with the **left** operand inverted: composes `left: K -> V1`
/// and `right: K -> V2` through their shared *key* domain, yielding
/// `V1 -> V2`.
pub fn join_left<L, R>(left: &L, right: &R) -> ListBiMultimap<L::Value, R::Value>
where
    L: BiRelation,
    R: BiRelation<Key = L::Key>,
{
    join(&left.inverse_view(), right)
}

/// [`join`] with the **right** operand inverted: composes `left: K1 -> V`
/// and `right: K2 -> V` through their shared *value* domain, yielding
/// `K1 -> K2`.
pub fn join_right<L, R>(left: &L, right: &R) -> ListBiMultimap<L::Key, R::Key>
where
    L: BiRelation,
    R: BiRelation<Value = L::Value>,
{
    join(left, &right.inverse_view())
}

/// Relate the *key* domains of two relations sharing a value codomain
/// (`K1 -> V`, `K2 -> V` gives `K1 -> K2`). Inverts the right operand;
/// equivalent to [`join_right`].
pub fn join_keys<L, R>(left: &L, right: &R) -> ListBiMultimap<L::Key, R::Key>
where
    L: BiRelation,
    R: BiRelation<Value = L::Value>,
{
    join_right(left, right)
}

/// Relate the *value* codomains of two relations sharing a key domain
/// (`K -> V1`, `K -> V2` gives `V1 -> V2`). Inverts the left operand;
/// equivalent to [`join_left`].
pub fn join_values<L, R>(left: &L, right: &R) -> ListBiMultimap<L::Value, R::Value>
where
    L: BiRelation,
    R: BiRelation<Key = L::Key>,
{
    join_left(left, right)
}

/// Materialization-free alternative to [`join`] for a single key: the union
/// of `right.value_set(v1)` over `v1 in left.value_set(key)`.
///
/// Intended for point queries where building the full joined relation would
/// be wasteful.
pub fn search<L, R>(left: &L, right: &R, key: &L::Key) -> IndexSet<R::Value>
where
    L: RelationQueries,
    R: RelationQueries<Key = L::Value>,
{
    let mut result = IndexSet::new();
    for via in left.value_set(key) {
        result.extend(right.value_set(&via));
    }
    result
}

impl<K, B> RelationQueries for Multimap<K, B>
where
    K: Clone + Eq + Hash,
    B: ValueBucket,
    B::Value: Clone + Eq + Hash,
{
    type Key = K;
    type Value = B::Value;

    fn value_set(&self, key: &K) -> IndexSet<B::Value> {
        self.bucket(key)
            .map(|bucket| bucket.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn all_keys(&self) -> IndexSet<K> {
        self.keys().cloned().collect()
    }

    fn all_values(&self) -> IndexSet<B::Value> {
        self.values().cloned().collect()
    }

    fn contains_key(&self, key: &K) -> bool {
        self.contains_key(key)
    }
}

impl<K, V> RelationQueries for OrderedMultimap<K, V>
where
    K: Clone + Eq + Hash + Ord,
    V: Clone + Eq + Hash + Ord,
{
    type Key = K;
    type Value = V;

    fn value_set(&self, key: &K) -> IndexSet<V> {
        self.get(key)
            .map(|bucket| bucket.to_vec().into_iter().collect())
            .unwrap_or_default()
    }

    fn all_keys(&self) -> IndexSet<K> {
        self.keys().cloned().collect()
    }

    fn all_values(&self) -> IndexSet<V> {
        self.values().cloned().collect()
    }

    fn contains_key(&self, key: &K) -> bool {
        self.contains_key(key)
    }
}

impl<K, V> RelationQueries for BiMap<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash,
{
    type Key = K;
    type Value = V;

    fn value_set(&self, key: &K) -> IndexSet<V> {
        self.get(key).into_iter().collect()
    }

    fn all_keys(&self) -> IndexSet<K> {
        self.keys().into_iter().collect()
    }

    fn all_values(&self) -> IndexSet<V> {
        self.values().into_iter().collect()
    }

    fn contains_key(&self, key: &K) -> bool {
        self.contains_key(key)
    }
}

impl<K, V> BiRelation for BiMap<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash,
{
    type Inverse = InverseBiMap<K, V>;

    fn inverse_view(&self) -> InverseBiMap<K, V> {
        self.inverse()
    }

    fn key_set(&self, value: &V) -> IndexSet<K> {
        self.get_key(value).into_iter().collect()
    }

    fn contains_value(&self, value: &V) -> bool {
        self.contains_value(value)
    }
}

impl<K, V> RelationQueries for InverseBiMap<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash,
{
    type Key = V;
    type Value = K;

    fn value_set(&self, key: &V) -> IndexSet<K> {
        self.get(key).into_iter().collect()
    }

    fn all_keys(&self) -> IndexSet<V> {
        self.inverse().values().into_iter().collect()
    }

    fn all_values(&self) -> IndexSet<K> {
        self.inverse().keys().into_iter().collect()
    }

    fn contains_key(&self, key: &V) -> bool {
        self.contains_key(key)
    }
}

impl<K, V> BiRelation for InverseBiMap<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash,
{
    type Inverse = BiMap<K, V>;

    fn inverse_view(&self) -> BiMap<K, V> {
        self.inverse()
    }

    fn key_set(&self, value: &K) -> IndexSet<V> {
        self.get_key(value).into_iter().collect()
    }

    fn contains_value(&self, value: &K) -> bool {
        self.contains_value(value)
    }
}

impl<K, V, FB, IB> RelationQueries for BiMultimap<K, V, FB, IB>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash,
    FB: ValueBucket<Value = V>,
    IB: ValueBucket<Value = K>,
{
    type Key = K;
    type Value = V;

    fn value_set(&self, key: &K) -> IndexSet<V> {
        self.value_set(key)
    }

    fn all_keys(&self) -> IndexSet<K> {
        self.all_keys()
    }

    fn all_values(&self) -> IndexSet<V> {
        self.all_values()
    }

    fn contains_key(&self, key: &K) -> bool {
        self.contains_key(key)
    }
}

impl<K, V, FB, IB> BiRelation for BiMultimap<K, V, FB, IB>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash,
    FB: ValueBucket<Value = V>,
    IB: ValueBucket<Value = K>,
{
    type Inverse = InverseBiMultimap<K, V, FB, IB>;

    fn inverse_view(&self) -> InverseBiMultimap<K, V, FB, IB> {
        self.inverse()
    }

    fn key_set(&self, value: &V) -> IndexSet<K> {
        self.key_set(value)
    }

    fn contains_value(&self, value: &V) -> bool {
        self.contains_value(value)
    }
}

impl<K, V, FB, IB> RelationQueries for InverseBiMultimap<K, V, FB, IB>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash,
    FB: ValueBucket<Value = V>,
    IB: ValueBucket<Value = K>,
{
    type Key = V;
    type Value = K;

    fn value_set(&self, key: &V) -> IndexSet<K> {
        self.value_set(key)
    }

    fn all_keys(&self) -> IndexSet<V> {
        self.all_keys()
    }

    fn all_values(&self) -> IndexSet<K> {
        self.all_values()
    }

    fn contains_key(&self, key: &V) -> bool {
        self.contains_key(key)
    }
}

impl<K, V, FB, IB> BiRelation for InverseBiMultimap<K, V, FB, IB>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash,
    FB: ValueBucket<Value = V>,
    IB: ValueBucket<Value = K>,
{
    type Inverse = BiMultimap<K, V, FB, IB>;

    fn inverse_view(&self) -> BiMultimap<K, V, FB, IB> {
        self.inverse()
    }

    fn key_set(&self, value: &K) -> IndexSet<V> {
        self.key_set(value)
    }

    fn contains_value(&self, value: &K) -> bool {
        self.contains_value(value)
    }
}
