//! Integration tests for serde round trips: every relation type is plain
//! in-memory data and must survive JSON serialization unchanged, including
//! touch-created empty buckets.

use bibrel::{BiMap, ListMultimap, OrderedMultimap, SetBiMultimap, SetMultimap, ValueBucket};

#[test]
fn test_multimap_round_trip_with_duplicates() {
    let mut map: ListMultimap<String, u32> = ListMultimap::new();
    map.add("a".to_string(), 1);
    map.add("a".to_string(), 1);
    map.add("b".to_string(), 2);

    let json = serde_json::to_string(&map).unwrap();
    let back: ListMultimap<String, u32> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, map);
    assert_eq!(back.get(&"a".to_string()).unwrap().to_vec(), vec![1, 1]);
}

#[test]
fn test_multimap_round_trip_preserves_touched_keys() {
    let mut map: SetMultimap<String, u32> = SetMultimap::new();
    map.touch("island".to_string());
    map.add("a".to_string(), 1);

    let json = serde_json::to_string(&map).unwrap();
    let back: SetMultimap<String, u32> = serde_json::from_str(&json).unwrap();
    assert!(back.contains_key(&"island".to_string()));
    assert_eq!(back.get(&"island".to_string()).unwrap().len(), 0);
}

#[test]
fn test_bimap_round_trip_rebuilds_inverse() {
    let map = BiMap::from([("DE-101".to_string(), 101u32), ("DE-604".to_string(), 604u32)]);

    let json = serde_json::to_string(&map).unwrap();
    let back: BiMap<String, u32> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, map);
    assert_eq!(back.get_key(&604), Some("DE-604".to_string()));
}

#[test]
fn test_bimultimap_round_trip_preserves_both_stores() {
    let mut relation: SetBiMultimap<String, String> = SetBiMultimap::new();
    relation.add("a".to_string(), "x".to_string());
    relation.add("b".to_string(), "x".to_string());
    relation.touch_key("island".to_string());
    relation.touch_value("orphan".to_string());

    let json = serde_json::to_string(&relation).unwrap();
    let back: SetBiMultimap<String, String> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, relation);
    assert!(back.contains_key(&"island".to_string()));
    assert!(back.contains_value(&"orphan".to_string()));
    back.validate().unwrap();
}

#[test]
fn test_bimultimap_divergent_input_rejected() {
    // Forward store claims (a, x); the inverse store knows nothing of it.
    // Accepting this would hand out a relation whose removals misbehave.
    let json = r#"[{"a":["x"]},{}]"#;
    let result: Result<SetBiMultimap<String, String>, _> = serde_json::from_str(json);
    assert!(result.is_err());

    // The symmetric direction is rejected too.
    let json = r#"[{},{"x":["a"]}]"#;
    let result: Result<SetBiMultimap<String, String>, _> = serde_json::from_str(json);
    assert!(result.is_err());
}

#[test]
fn test_round_trip_independence_from_original() {
    let mut relation: SetBiMultimap<String, u32> = SetBiMultimap::new();
    relation.add("a".to_string(), 1);

    let json = serde_json::to_string(&relation).unwrap();
    let mut back: SetBiMultimap<String, u32> = serde_json::from_str(&json).unwrap();
    back.add("b".to_string(), 2);
    assert!(!relation.contains_key(&"b".to_string()));
}

#[test]
fn test_ordered_multimap_round_trip_keeps_order() {
    let mut map = OrderedMultimap::from_iter([(3u32, 'c'), (1, 'a'), (2, 'b')]);
    map.touch(9);

    let json = serde_json::to_string(&map).unwrap();
    let back: OrderedMultimap<u32, char> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, map);
    let keys: Vec<_> = back.keys().copied().collect();
    assert_eq!(keys, vec![1, 2, 3, 9]);
}
