//! Cycle-safe depth-first traversal over homogeneous relations.
//!
//! [`RelationVisitor`] walks any relation whose key and value domains
//! coincide (a graph), such as an authority-record cross-reference
//! relation. It visits every node reachable from a batch of roots exactly
//! once, distinguishing true cycles from benign re-convergence:
//!
//! - a node recurring on the **active recursion path** is a true cycle and
//!   is reported through a pluggable callback (traversal continues for
//!   other branches and roots);
//! - a node already visited through some *other* path is simply skipped.
//!
//! The visitor itself is an immutable configuration (relation, order,
//! direction); callbacks are passed per traversal call, so concurrent uses
//! of one visitor value cannot interfere with each other.
//!
//! # Examples
//!
//! ```ignore
//! use bibrel::{Direction, Order, RelationVisitor, SetBiMultimap};
//!
//! let refs = SetBiMultimap::from([(1, 2), (2, 3), (3, 1)]);
//! let visitor = RelationVisitor::new(&refs, Order::Preorder, Direction::KeyToValue);
//!
//! let mut seen = Vec::new();
//! visitor.visit_nodes_and_children([1], |node| seen.push(*node));
//! assert_eq!(seen, vec![1, 2, 3]); // the 3 -> 1 cycle is reported, not revisited
//! ```

use std::fmt::Debug;
use std::hash::Hash;

use indexmap::IndexSet;
use log::warn;

use crate::relation::BiRelation;

/// When the node consumer runs relative to the node's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Visit the node before recursing into its children.
    Preorder,
    /// Visit the node after recursing into its children.
    Postorder,
}

/// Which adjacency of the relation to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Children of a node are its value set.
    KeyToValue,
    /// Children of a node are its key set.
    ValueToKey,
}

/// Depth-first traversal engine over a homogeneous relation.
///
/// Holds only immutable configuration; per-call state (the visited set and
/// the active path) lives on the stack of each traversal call.
#[derive(Debug)]
pub struct RelationVisitor<'r, R> {
    relation: &'r R,
    order: Order,
    direction: Direction,
}

impl<'r, T, R> RelationVisitor<'r, R>
where
    T: Clone + Eq + Hash,
    R: BiRelation<Key = T, Value = T>,
{
    /// Create a visitor over `relation` with the given order and direction.
    #[must_use]
    pub fn new(relation: &'r R, order: Order, direction: Direction) -> Self {
        Self {
            relation,
            order,
            direction,
        }
    }

    /// Visit every node reachable from `roots`, each exactly once across
    /// the whole batch; cycles are reported through [`log::warn!`].
    ///
    /// A root that is not present in the relation (as a key for
    /// [`Direction::KeyToValue`], as a value for
    /// [`Direction::ValueToKey`]) is skipped silently.
    pub fn visit_nodes_and_children<I, F>(&self, roots: I, visit: F)
    where
        T: Debug,
        I: IntoIterator<Item = T>,
        F: FnMut(&T),
    {
        self.visit_with_cycle_reporter(roots, visit, |path: &[T]| {
            warn!("cycle detected along path {path:?}");
        });
    }

    /// Like [`visit_nodes_and_children`](Self::visit_nodes_and_children)
    /// but with an explicit cycle reporter.
    ///
    /// The reporter receives the active path followed by the recurring
    /// node (so a relation `1 -> 2 -> 3 -> 1` reports `[1, 2, 3, 1]`).
    /// Cycles are reported, never thrown; traversal continues with the
    /// remaining branches and roots.
    pub fn visit_with_cycle_reporter<I, F, C>(&self, roots: I, mut visit: F, mut on_cycle: C)
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&T),
        C: FnMut(&[T]),
    {
        // Shared across all roots of this batch: no node is consumed twice.
        let mut visited: IndexSet<T> = IndexSet::new();
        // Active recursion path, reused root to root (empty between roots).
        let mut path: IndexSet<T> = IndexSet::new();

        for root in roots {
            let present = match self.direction {
                Direction::KeyToValue => self.relation.contains_key(&root),
                Direction::ValueToKey => self.relation.contains_value(&root),
            };
            if !present {
                continue;
            }
            self.visit_node(&root, &mut path, &mut visited, &mut visit, &mut on_cycle);
            debug_assert!(path.is_empty());
        }
    }

    fn visit_node<F, C>(
        &self,
        node: &T,
        path: &mut IndexSet<T>,
        visited: &mut IndexSet<T>,
        visit: &mut F,
        on_cycle: &mut C,
    ) where
        F: FnMut(&T),
        C: FnMut(&[T]),
    {
        if path.contains(node) {
            // The node recurs within the active path: a true cycle, not
            // mere re-convergence.
            let mut cycle: Vec<T> = path.iter().cloned().collect();
            cycle.push(node.clone());
            on_cycle(&cycle);
            return;
        }
        if visited.contains(node) {
            // Fully processed through some other path.
            return;
        }

        visited.insert(node.clone());
        path.insert(node.clone());

        if self.order == Order::Preorder {
            visit(node);
        }
        let children = match self.direction {
            Direction::KeyToValue => self.relation.value_set(node),
            Direction::ValueToKey => self.relation.key_set(node),
        };
        for child in &children {
            self.visit_node(child, path, visited, visit, on_cycle);
        }
        if self.order == Order::Postorder {
            visit(node);
        }

        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bimultimap::SetBiMultimap;

    fn collect_preorder(relation: &SetBiMultimap<u32, u32>, roots: &[u32]) -> Vec<u32> {
        let visitor = RelationVisitor::new(relation, Order::Preorder, Direction::KeyToValue);
        let mut seen = Vec::new();
        visitor.visit_nodes_and_children(roots.to_vec(), |node| seen.push(*node));
        seen
    }

    #[test]
    fn test_preorder_walk() {
        let relation = SetBiMultimap::from([(1, 2), (1, 3), (2, 4)]);
        assert_eq!(collect_preorder(&relation, &[1]), vec![1, 2, 4, 3]);
    }

    #[test]
    fn test_postorder_walk() {
        let relation = SetBiMultimap::from([(1, 2), (1, 3), (2, 4)]);
        let visitor = RelationVisitor::new(&relation, Order::Postorder, Direction::KeyToValue);
        let mut seen = Vec::new();
        visitor.visit_nodes_and_children([1], |node| seen.push(*node));
        assert_eq!(seen, vec![4, 2, 3, 1]);
    }

    #[test]
    fn test_value_to_key_direction() {
        let relation = SetBiMultimap::from([(2, 1), (3, 2)]);
        let visitor = RelationVisitor::new(&relation, Order::Preorder, Direction::ValueToKey);
        let mut seen = Vec::new();
        visitor.visit_nodes_and_children([1], |node| seen.push(*node));
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn test_cycle_reported_once_nodes_visited_once() {
        let relation = SetBiMultimap::from([(1, 2), (2, 3), (3, 1)]);
        let visitor = RelationVisitor::new(&relation, Order::Preorder, Direction::KeyToValue);

        let mut seen = Vec::new();
        let mut cycles = Vec::new();
        visitor.visit_with_cycle_reporter(
            [1],
            |node| seen.push(*node),
            |path| cycles.push(path.to_vec()),
        );

        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(cycles, vec![vec![1, 2, 3, 1]]);
    }

    #[test]
    fn test_reconvergence_is_not_a_cycle() {
        // Diamond: 1 -> 2 -> 4, 1 -> 3 -> 4. Node 4 is reached twice but
        // never recurs on the active path.
        let relation = SetBiMultimap::from([(1, 2), (1, 3), (2, 4), (3, 4)]);
        let visitor = RelationVisitor::new(&relation, Order::Preorder, Direction::KeyToValue);

        let mut seen = Vec::new();
        let mut cycles = Vec::new();
        visitor.visit_with_cycle_reporter(
            [1],
            |node| seen.push(*node),
            |path| cycles.push(path.to_vec()),
        );

        assert_eq!(seen, vec![1, 2, 4, 3]);
        assert!(cycles.is_empty());
    }

    #[test]
    fn test_absent_root_skipped_silently() {
        let relation = SetBiMultimap::from([(1, 2)]);
        assert_eq!(collect_preorder(&relation, &[99, 1]), vec![1, 2]);
        // 2 is a value but not a key, so as a KeyToValue root it is absent.
        assert_eq!(collect_preorder(&relation, &[2]), Vec::<u32>::new());
    }

    #[test]
    fn test_visited_shared_across_roots() {
        let relation = SetBiMultimap::from([(1, 2), (2, 3), (4, 2)]);
        // Root 4 reaches 2 and 3 only if root 1 has not consumed them.
        assert_eq!(collect_preorder(&relation, &[1, 4]), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_self_loop_reports_two_element_path() {
        let relation = SetBiMultimap::from([(1, 1), (1, 2)]);
        let visitor = RelationVisitor::new(&relation, Order::Preorder, Direction::KeyToValue);

        let mut seen = Vec::new();
        let mut cycles = Vec::new();
        visitor.visit_with_cycle_reporter(
            [1],
            |node| seen.push(*node),
            |path| cycles.push(path.to_vec()),
        );

        assert_eq!(seen, vec![1, 2]);
        assert_eq!(cycles, vec![vec![1, 1]]);
    }
}
