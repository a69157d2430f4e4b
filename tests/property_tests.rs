//! Property-based tests: the forward/inverse mirror invariant of
//! `BiMultimap` must survive arbitrary operation sequences in both edge
//! policies.

use bibrel::{ListBiMultimap, SetBiMultimap};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add(u8, u8),
    Remove(u8, u8),
    RemoveAll(u8, u8),
    RemoveKey(u8),
    RemoveValue(u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    // Small domains force key/value collisions and parallel edges.
    let node = 0u8..8;
    prop_oneof![
        (node.clone(), node.clone()).prop_map(|(k, v)| Op::Add(k, v)),
        (node.clone(), node.clone()).prop_map(|(k, v)| Op::Remove(k, v)),
        (node.clone(), node.clone()).prop_map(|(k, v)| Op::RemoveAll(k, v)),
        node.clone().prop_map(Op::RemoveKey),
        node.prop_map(Op::RemoveValue),
    ]
}

proptest! {
    #[test]
    fn test_list_backed_mirror_invariant(ops in prop::collection::vec(op_strategy(), 0..64)) {
        let mut relation: ListBiMultimap<u8, u8> = ListBiMultimap::new();
        for op in ops {
            match op {
                Op::Add(k, v) => relation.add(k, v),
                Op::Remove(k, v) => {
                    relation.remove(&k, &v);
                }
                Op::RemoveAll(k, v) => {
                    relation.remove_all(&k, &v);
                }
                Op::RemoveKey(k) => {
                    relation.remove_key(&k);
                }
                Op::RemoveValue(v) => {
                    relation.remove_value(&v);
                }
            }
            prop_assert!(relation.validate().is_ok());
        }
    }

    #[test]
    fn test_set_backed_mirror_invariant(ops in prop::collection::vec(op_strategy(), 0..64)) {
        let mut relation: SetBiMultimap<u8, u8> = SetBiMultimap::new();
        for op in ops {
            match op {
                Op::Add(k, v) => relation.add(k, v),
                Op::Remove(k, v) => {
                    relation.remove(&k, &v);
                }
                Op::RemoveAll(k, v) => {
                    relation.remove_all(&k, &v);
                }
                Op::RemoveKey(k) => {
                    relation.remove_key(&k);
                }
                Op::RemoveValue(v) => {
                    relation.remove_value(&v);
                }
            }
            prop_assert!(relation.validate().is_ok());
        }
    }

    #[test]
    fn test_remove_all_erases_every_parallel_edge(
        count in 1usize..6,
        key in 0u8..4,
        value in 0u8..4,
    ) {
        let mut relation: ListBiMultimap<u8, u8> = ListBiMultimap::new();
        for _ in 0..count {
            relation.add(key, value);
        }
        prop_assert_eq!(relation.edge_count(&key, &value), count);
        prop_assert_eq!(relation.remove_all(&key, &value), count);
        prop_assert!(!relation.contains_key(&key));
        prop_assert!(!relation.contains_value(&value));
    }
}
