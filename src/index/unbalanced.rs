//! Plain binary search tree with the same contract as [`RedBlackIndex`].
//!
//! Performs no rebalancing. Kept as a baseline when comparing index timings;
//! sorted input degrades it to a linked list, so insert walks iteratively.
//!
//! [`RedBlackIndex`]: super::RedBlackIndex

use std::cmp::Ordering;

use super::node::{find_in, height_of, InOrderIter, IndexNode, Link};
use super::{OrderedIndex, RecordLookup};
use crate::record::RequestRecord;

#[derive(Debug, Default)]
pub struct UnbalancedIndex {
    root: Link,
    len: usize,
}

impl UnbalancedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: RequestRecord) -> bool {
        let mut cursor = &mut self.root;
        while let Some(node) = cursor {
            cursor = match record.id().cmp(node.record.id()) {
                Ordering::Less => &mut node.left,
                Ordering::Greater => &mut node.right,
                Ordering::Equal => return false,
            };
        }
        *cursor = Some(Box::new(IndexNode::new(record)));
        self.len += 1;
        true
    }

    pub fn find(&self, id: &str) -> Option<&RequestRecord> {
        find_in(&self.root, id)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> InOrderIter<'_> {
        InOrderIter::new(&self.root)
    }

    pub fn in_order(&self) -> Vec<&RequestRecord> {
        self.iter().collect()
    }

    pub fn height(&self) -> usize {
        height_of(&self.root)
    }
}

impl Drop for UnbalancedIndex {
    // The default recursive drop would overflow the stack on a degenerate chain.
    fn drop(&mut self) {
        let mut stack: Vec<Box<IndexNode>> = Vec::new();
        if let Some(root) = self.root.take() {
            stack.push(root);
        }
        while let Some(mut node) = stack.pop() {
            if let Some(left) = node.left.take() {
                stack.push(left);
            }
            if let Some(right) = node.right.take() {
                stack.push(right);
            }
        }
    }
}

impl RecordLookup for UnbalancedIndex {
    fn find(&self, id: &str) -> Option<&RequestRecord> {
        UnbalancedIndex::find(self, id)
    }
}

impl OrderedIndex for UnbalancedIndex {
    fn insert(&mut self, record: RequestRecord) -> bool {
        UnbalancedIndex::insert(self, record)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn in_order(&self) -> Vec<&RequestRecord> {
        UnbalancedIndex::in_order(self)
    }

    fn height(&self) -> usize {
        UnbalancedIndex::height(self)
    }
}
