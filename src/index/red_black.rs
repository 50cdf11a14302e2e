//! Red-black ordered index keyed by request identifier.
//!
//! Insertion descends recursively and applies local fixups on the way back
//! up, closest ancestor first:
//!
//! 1. right child red, left child not red: rotate left
//! 2. left child and its left child both red: rotate right
//! 3. both children red: flip colours
//!
//! The root is forced black after every insert. Recursion depth is bounded by
//! the tree height, which the invariant keeps at O(log n).

use std::cmp::Ordering;

use tracing::trace;

use super::node::{find_in, height_of, Color, InOrderIter, IndexNode, Link};
use super::{InvariantViolation, OrderedIndex, RecordLookup};
use crate::record::RequestRecord;

/// Self-balancing index; the sole owner of every record it holds.
#[derive(Debug, Default)]
pub struct RedBlackIndex {
    root: Link,
    len: usize,
}

impl RedBlackIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record. Returns false, leaving the tree untouched, if the
    /// identifier is already present.
    pub fn insert(&mut self, record: RequestRecord) -> bool {
        let mut inserted = false;
        let mut root = insert_at(self.root.take(), record, &mut inserted);
        root.color = Color::Black;
        self.root = Some(root);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    pub fn find(&self, id: &str) -> Option<&RequestRecord> {
        find_in(&self.root, id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
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

    pub fn root(&self) -> Option<&IndexNode> {
        self.root.as_deref()
    }

    /// Verify ordering and colour invariants. Returns the black height.
    pub fn check_invariants(&self) -> Result<usize, InvariantViolation> {
        let root = match self.root.as_deref() {
            Some(root) => root,
            None => return Ok(0),
        };
        if root.is_red() {
            return Err(InvariantViolation::RedRoot);
        }

        let mut previous: Option<&str> = None;
        for record in self.iter() {
            if let Some(prev) = previous {
                if prev >= record.id() {
                    return Err(InvariantViolation::OrderViolation {
                        before: prev.to_string(),
                        after: record.id().to_string(),
                    });
                }
            }
            previous = Some(record.id());
        }

        // Every nil link must sit below the same number of black nodes.
        let mut expected: Option<usize> = None;
        let mut stack: Vec<(&IndexNode, usize)> = vec![(root, 0)];
        while let Some((node, blacks_above)) = stack.pop() {
            let blacks = blacks_above + usize::from(!node.is_red());
            for child in [node.left.as_deref(), node.right.as_deref()] {
                match child {
                    Some(child) => {
                        if node.is_red() && child.is_red() {
                            return Err(InvariantViolation::RedRedViolation {
                                id: child.record.id().to_string(),
                            });
                        }
                        stack.push((child, blacks));
                    }
                    None => match expected {
                        None => expected = Some(blacks),
                        Some(height) if height != blacks => {
                            return Err(InvariantViolation::BlackHeightMismatch {
                                id: node.record.id().to_string(),
                                expected: height,
                                found: blacks,
                            });
                        }
                        Some(_) => {}
                    },
                }
            }
        }
        Ok(expected.unwrap_or(0))
    }
}

fn insert_at(link: Link, record: RequestRecord, inserted: &mut bool) -> Box<IndexNode> {
    let mut node = match link {
        Some(node) => node,
        None => {
            *inserted = true;
            return Box::new(IndexNode::new(record));
        }
    };

    match record.id().cmp(node.record.id()) {
        Ordering::Less => node.left = Some(insert_at(node.left.take(), record, inserted)),
        Ordering::Greater => node.right = Some(insert_at(node.right.take(), record, inserted)),
        Ordering::Equal => {
            trace!(id = %record.id(), "duplicate identifier ignored");
            return node;
        }
    }

    fix_up(node)
}

fn is_red(link: &Link) -> bool {
    link.as_ref().map_or(false, |node| node.is_red())
}

fn fix_up(mut node: Box<IndexNode>) -> Box<IndexNode> {
    if is_red(&node.right) && !is_red(&node.left) {
        node = rotate_left(node);
    }
    if is_red(&node.left) && node.left.as_ref().map_or(false, |left| is_red(&left.left)) {
        node = rotate_right(node);
    }
    if is_red(&node.left) && is_red(&node.right) {
        flip_colors(&mut node);
    }
    node
}

fn rotate_left(mut node: Box<IndexNode>) -> Box<IndexNode> {
    let mut pivot = match node.right.take() {
        Some(pivot) => pivot,
        None => return node,
    };
    node.right = pivot.left.take();
    pivot.color = node.color;
    node.color = Color::Red;
    pivot.left = Some(node);
    pivot
}

fn rotate_right(mut node: Box<IndexNode>) -> Box<IndexNode> {
    let mut pivot = match node.left.take() {
        Some(pivot) => pivot,
        None => return node,
    };
    node.left = pivot.right.take();
    pivot.color = node.color;
    node.color = Color::Red;
    pivot.right = Some(node);
    pivot
}

fn flip_colors(node: &mut IndexNode) {
    node.color = Color::Red;
    if let Some(left) = node.left.as_mut() {
        left.color = Color::Black;
    }
    if let Some(right) = node.right.as_mut() {
        right.color = Color::Black;
    }
}

impl RecordLookup for RedBlackIndex {
    fn find(&self, id: &str) -> Option<&RequestRecord> {
        RedBlackIndex::find(self, id)
    }
}

impl OrderedIndex for RedBlackIndex {
    fn insert(&mut self, record: RequestRecord) -> bool {
        RedBlackIndex::insert(self, record)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn in_order(&self) -> Vec<&RequestRecord> {
        RedBlackIndex::in_order(self)
    }

    fn height(&self) -> usize {
        RedBlackIndex::height(self)
    }
}
