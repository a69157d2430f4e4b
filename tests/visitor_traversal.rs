//! Integration tests for the traversal engine over realistic reference
//! graphs: cycle reporting, batch visiting, and both walk directions.

use bibrel::{Direction, Order, RelationVisitor, SetBiMultimap};

fn cyclic_triangle() -> SetBiMultimap<u32, u32> {
    SetBiMultimap::from([(1, 2), (2, 3), (3, 1)])
}

#[test]
fn test_cycle_reported_exactly_once_with_full_path() {
    let relation = cyclic_triangle();
    let visitor = RelationVisitor::new(&relation, Order::Preorder, Direction::KeyToValue);

    let mut seen = Vec::new();
    let mut cycles: Vec<Vec<u32>> = Vec::new();
    visitor.visit_with_cycle_reporter(
        [1],
        |node| seen.push(*node),
        |path| cycles.push(path.to_vec()),
    );

    // Each node consumed exactly once, one report of the closed path.
    assert_eq!(seen, vec![1, 2, 3]);
    assert_eq!(cycles, vec![vec![1, 2, 3, 1]]);
}

#[test]
fn test_traversal_continues_after_cycle_report() {
    // The cycle sits on one branch; the sibling branch must still be
    // walked.
    let relation = SetBiMultimap::from([(1, 2), (2, 1), (1, 3), (3, 4)]);
    let visitor = RelationVisitor::new(&relation, Order::Preorder, Direction::KeyToValue);

    let mut seen = Vec::new();
    let mut cycle_count = 0;
    visitor.visit_with_cycle_reporter([1], |node| seen.push(*node), |_| cycle_count += 1);

    assert_eq!(seen, vec![1, 2, 3, 4]);
    assert_eq!(cycle_count, 1);
}

#[test]
fn test_batch_roots_share_one_visited_set() {
    let relation = SetBiMultimap::from([(1, 2), (3, 2), (3, 4)]);
    let visitor = RelationVisitor::new(&relation, Order::Preorder, Direction::KeyToValue);

    let mut seen = Vec::new();
    visitor.visit_nodes_and_children(vec![1, 3], |node| seen.push(*node));

    // Node 2 is consumed under root 1 and skipped under root 3.
    assert_eq!(seen, vec![1, 2, 3, 4]);
}

#[test]
fn test_absent_roots_skipped_silently() {
    let relation = SetBiMultimap::from([(1, 2)]);
    let visitor = RelationVisitor::new(&relation, Order::Preorder, Direction::KeyToValue);

    let mut seen = Vec::new();
    visitor.visit_nodes_and_children([42, 1, 7], |node| seen.push(*node));
    assert_eq!(seen, vec![1, 2]);
}

#[test]
fn test_value_to_key_walks_the_inverse_adjacency() {
    // Edges point child -> parent; walking ValueToKey from the root of the
    // hierarchy descends it.
    let relation = SetBiMultimap::from([("narrower1", "top"), ("narrower2", "top")]);
    let visitor = RelationVisitor::new(&relation, Order::Preorder, Direction::ValueToKey);

    let mut seen = Vec::new();
    visitor.visit_nodes_and_children(["top"], |node| seen.push(*node));
    assert_eq!(seen, vec!["top", "narrower1", "narrower2"]);
}

#[test]
fn test_postorder_emits_leaves_first() {
    let relation = SetBiMultimap::from([(1, 2), (2, 3)]);
    let visitor = RelationVisitor::new(&relation, Order::Postorder, Direction::KeyToValue);

    let mut seen = Vec::new();
    visitor.visit_nodes_and_children([1], |node| seen.push(*node));
    assert_eq!(seen, vec![3, 2, 1]);
}

#[test]
fn test_reconvergence_not_reported_as_cycle() {
    // Two paths meet at 4; no edge closes back onto the active path.
    let relation = SetBiMultimap::from([(1, 2), (1, 3), (2, 4), (3, 4)]);
    let visitor = RelationVisitor::new(&relation, Order::Preorder, Direction::KeyToValue);

    let mut cycles = 0;
    visitor.visit_with_cycle_reporter([1], |_| {}, |_| cycles += 1);
    assert_eq!(cycles, 0);
}

#[test]
fn test_traversal_over_an_inverse_view() {
    let relation = cyclic_triangle();
    let view = relation.inverse();
    let visitor = RelationVisitor::new(&view, Order::Preorder, Direction::KeyToValue);

    let mut seen = Vec::new();
    visitor.visit_nodes_and_children([1], |node| seen.push(*node));
    // Following the reversed edges: 1 <- 3 <- 2 <- 1.
    assert_eq!(seen, vec![1, 3, 2]);
}
