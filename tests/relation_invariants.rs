//! Integration tests for the structural invariants of the relation types:
//! the bijection contract, forward/inverse mirroring, aliasing views, and
//! multigraph edge semantics.

use bibrel::{BiMap, ListBiMultimap, ListMultimap, SetBiMultimap};
use indexmap::IndexSet;

#[test]
fn test_bijection_invariant_after_put() {
    let mut map = BiMap::new();
    map.put("k1", "v1");
    map.put("k2", "v2");

    assert_eq!(map.get(&"k1"), Some("v1"));
    assert_eq!(map.get_key(&"v1"), Some("k1"));

    // Rebinding k1 severs its old value; rebinding v2 severs its old key.
    map.put("k1", "v2");
    assert_eq!(map.get(&"k1"), Some("v2"));
    assert_eq!(map.get_key(&"v2"), Some("k1"));
    assert_eq!(map.get_key(&"v1"), None);
    assert_eq!(map.get(&"k2"), None);
    assert_eq!(map.len(), 1);
}

#[test]
fn test_single_put_can_sever_two_unrelated_pairs() {
    let mut map = BiMap::from([("a", 1), ("b", 2)]);
    // (a,2) touches both prior pairs at once: last write wins.
    let (old_value, old_key) = map.put("a", 2);
    assert_eq!(old_value, Some(1));
    assert_eq!(old_key, Some("b"));
    assert_eq!(map.pairs(), vec![("a", 2)]);
}

#[test]
fn test_bimap_aliasing_view_mutations_visible_both_ways() {
    let mut map = BiMap::new();
    map.put(1, "one");

    let mut view = map.inverse();
    view.put("two", 2);
    assert_eq!(map.get(&2), Some("two"));

    map.remove(&1);
    assert_eq!(view.get(&"one"), None);

    // The view of the view aliases the original stores too.
    let mut original_again = view.inverse();
    original_again.put(3, "three");
    assert_eq!(view.get(&"three"), Some(3));
    assert_eq!(map.get(&3), Some("three"));
}

#[test]
fn test_bimultimap_symmetry_invariant() {
    let mut relation: SetBiMultimap<&str, &str> = SetBiMultimap::new();
    relation.add("a", "x");
    relation.add("a", "y");
    relation.add("b", "x");
    relation.remove(&"a", &"x");

    for key in relation.all_keys() {
        for value in relation.value_set(&key) {
            assert!(
                relation.key_set(&value).contains(&key),
                "forward edge ({key:?}, {value:?}) missing from inverse side"
            );
        }
    }
    for value in relation.all_values() {
        for key in relation.key_set(&value) {
            assert!(
                relation.value_set(&key).contains(&value),
                "inverse edge ({value:?}, {key:?}) missing from forward side"
            );
        }
    }
    relation.validate().unwrap();
}

#[test]
fn test_bimultimap_aliasing_view() {
    let mut relation: SetBiMultimap<&str, u32> = SetBiMultimap::new();
    relation.add("a", 1);

    let mut view = relation.inverse();
    view.add(2, "b");
    assert!(relation.contains(&"b", &2));

    relation.add("c", 3);
    assert_eq!(view.value_set(&3), IndexSet::from(["c"]));
}

#[test]
fn test_multi_edge_semantics() {
    // Three parallel (A, "x") edges in multigraph mode.
    let mut relation: ListBiMultimap<&str, &str> = ListBiMultimap::new();
    relation.add("A", "x");
    relation.add("A", "x");
    relation.add("A", "x");

    // remove() deletes exactly one occurrence.
    assert!(relation.remove(&"A", &"x"));
    assert_eq!(relation.edge_count(&"A", &"x"), 2);

    // remove_all() deletes the rest and drops the empty buckets both ways.
    assert_eq!(relation.remove_all(&"A", &"x"), 2);
    assert_eq!(relation.edge_count(&"A", &"x"), 0);
    assert!(!relation.contains_key(&"A"));
    assert!(!relation.contains_value(&"x"));
}

#[test]
fn test_empty_bucket_invisibility() {
    let mut map: ListMultimap<&str, u32> = ListMultimap::new();
    map.touch("k");
    map.add("a", 1);

    // The touched key exists but contributes nothing to the value stream.
    assert!(map.contains_key(&"k"));
    let mut values = map.values();
    assert_eq!(values.next(), Some(&1));
    assert_eq!(values.next(), None);
    assert_eq!(values.next(), None);
}

#[test]
fn test_defensive_copy_on_get() {
    use bibrel::ValueBucket;

    let mut map: ListMultimap<&str, u32> = ListMultimap::new();
    map.add("a", 1);

    let mut bucket = map.get(&"a").unwrap();
    bucket.insert(2);
    bucket.remove_one(&1);
    assert_eq!(map.get(&"a").unwrap().to_vec(), vec![1]);
}

#[test]
fn test_remove_key_leaves_no_stale_inverse_entries() {
    let mut relation: ListBiMultimap<u32, &str> = ListBiMultimap::new();
    relation.add(1, "x");
    relation.add(1, "x");
    relation.add(1, "y");
    relation.add(2, "y");

    let snapshot = relation.remove_key(&1).unwrap();
    assert_eq!(snapshot, vec!["x", "x", "y"]);
    assert!(!relation.contains_value(&"x"));
    assert_eq!(relation.key_set(&"y"), IndexSet::from([2]));
    relation.validate().unwrap();
}
