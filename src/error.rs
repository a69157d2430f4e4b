//! Error types for relation operations.
//!
//! This module provides the [`RelationError`] type for all relation
//! operations and the [`Result`] convenience type.
//!
//! Absent keys and values are *not* errors anywhere in this crate; lookups
//! return `None`, empty collections, or `false`. Errors are reserved for
//! malformed external input and for observed internal inconsistencies.

use thiserror::Error;

/// Error type for all relation operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelationError {
    /// A line of tabular input did not match the expected
    /// tab-separated `key\tvalue` format.
    #[error("invalid table line {line}: {content:?}")]
    InvalidTableLine {
        /// 1-based line number within the input.
        line: usize,
        /// The offending line, verbatim.
        content: String,
    },

    /// The forward and inverse stores of a bidirectional relation disagree.
    ///
    /// This indicates a logic bug; it is only ever produced by explicit
    /// consistency checks such as
    /// [`BiMultimap::validate`](crate::BiMultimap::validate).
    #[error("forward and inverse stores diverged: {0}")]
    StoreDivergence(String),
}

/// Convenience type alias for [`std::result::Result`] with [`RelationError`].
pub type Result<T> = std::result::Result<T, RelationError>;
