//! Ordered request index.
//!
//! Two binary search trees keyed by request identifier share one contract:
//! the red-black [`RedBlackIndex`] used by the engine, and the unbalanced
//! [`UnbalancedIndex`] kept as an instrumentation baseline.

mod node;
mod red_black;
mod unbalanced;

use thiserror::Error;

use crate::record::RequestRecord;

pub use node::{Color, InOrderIter, IndexNode};
pub use red_black::RedBlackIndex;
pub use unbalanced::UnbalancedIndex;

/// Identifier to record resolution. The graph and heap hold identifiers only
/// and resolve them through this trait.
pub trait RecordLookup {
    fn find(&self, id: &str) -> Option<&RequestRecord>;
}

/// Insert/Find/InOrder contract shared by both index variants.
pub trait OrderedIndex: RecordLookup {
    /// Returns false when the identifier already exists; the index is left unchanged.
    fn insert(&mut self, record: RequestRecord) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All records in ascending identifier order.
    fn in_order(&self) -> Vec<&RequestRecord>;

    /// Longest root-to-leaf path in nodes.
    fn height(&self) -> usize;
}

/// A broken structural invariant found by [`RedBlackIndex::check_invariants`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("root is red")]
    RedRoot,

    #[error("red node {id} has a red parent")]
    RedRedViolation { id: String },

    #[error("black height below {id} is {found}, expected {expected}")]
    BlackHeightMismatch {
        id: String,
        expected: usize,
        found: usize,
    },

    #[error("in-order sequence has {before} before {after}")]
    OrderViolation { before: String, after: String },
}
