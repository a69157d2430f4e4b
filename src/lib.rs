#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # bibrel: Bidirectional Relation Toolkit
//!
//! In-memory bidirectional relations for bibliographic-catalog processing:
//! multimaps with pluggable value-bucket policies, strict bijections,
//! many-to-many relations with mirrored stores, a relational-join algebra,
//! and a cycle-safe graph traversal engine.
//!
//! ## Quick Start
//!
//! ### Building a cross-reference relation
//!
//! ```ignore
//! use bibrel::SetBiMultimap;
//!
//! let mut see_also: SetBiMultimap<String, String> = SetBiMultimap::new();
//! see_also.add("Goethe".to_string(), "Weimar Classicism".to_string());
//! see_also.add("Schiller".to_string(), "Weimar Classicism".to_string());
//!
//! // Both directions are maintained automatically.
//! assert_eq!(see_also.key_set(&"Weimar Classicism".to_string()).len(), 2);
//! ```
//!
//! ### Composing relations
//!
//! ```ignore
//! use bibrel::{join, SetBiMultimap};
//!
//! let record_to_authority = SetBiMultimap::from([("rec1", "gnd42")]);
//! let authority_to_label = SetBiMultimap::from([("gnd42", "Goethe")]);
//! let record_to_label = join(&record_to_authority, &authority_to_label);
//! assert!(record_to_label.contains(&"rec1", &"Goethe"));
//! ```
//!
//! ### Walking a graph safely
//!
//! ```ignore
//! use bibrel::{Direction, Order, RelationVisitor, SetBiMultimap};
//!
//! let refs = SetBiMultimap::from([(1, 2), (2, 3), (3, 1)]);
//! let visitor = RelationVisitor::new(&refs, Order::Preorder, Direction::KeyToValue);
//! visitor.visit_nodes_and_children([1], |node| println!("visiting {node}"));
//! ```
//!
//! ## Modules
//!
//! - [`bucket`] — Value-bucket strategies (list, set, ordered, top-k)
//! - [`multimap`] — Key-to-many-values map over a bucket strategy
//! - [`ordered_multimap`] — Comparator-ordered keys with navigable queries
//! - [`bimap`] — Strict bijection with inverse lookup and aliasing view
//! - [`bimultimap`] — Many-to-many relation over two mirrored multimaps
//! - [`relation`] — Capability traits, join algebra, tabular export
//! - [`visitor`] — Cycle-safe depth-first traversal
//! - [`error`] — Error types and result type
//!
//! ## Concurrency model
//!
//! Everything here is single-threaded, in-memory data with no internal
//! locking. The only sanctioned aliasing is the `inverse()` view of a
//! bidirectional relation; join results are always independent copies.

pub mod bimap;
pub mod bimultimap;
pub mod bucket;
pub mod error;
pub mod multimap;
pub mod ordered_multimap;
pub mod relation;
pub mod visitor;

pub use bimap::{BiMap, InverseBiMap};
pub use bimultimap::{
    BiMultimap, InverseBiMultimap, InverseListBiMultimap, InverseSetBiMultimap, ListBiMultimap,
    SetBiMultimap,
};
pub use bucket::{ListBucket, OrderedBucket, SetBucket, TopKBucket, ValueBucket};
pub use error::{RelationError, Result};
pub use multimap::{ListMultimap, Multimap, SetMultimap, TopKMultimap};
pub use ordered_multimap::OrderedMultimap;
pub use relation::{
    from_table, join, join_keys, join_left, join_right, join_values, search, BiRelation,
    RelationQueries,
};
pub use visitor::{Direction, Order, RelationVisitor};
