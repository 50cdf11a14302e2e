//! Tree nodes and the traversal helpers shared by both index variants.

use std::cmp::Ordering;

use crate::record::RequestRecord;

/// Link colour for the balancing invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

pub(crate) type Link = Option<Box<IndexNode>>;

/// One record in the tree. Children are owned exclusively.
#[derive(Debug)]
pub struct IndexNode {
    pub(crate) record: RequestRecord,
    pub(crate) left: Link,
    pub(crate) right: Link,
    pub(crate) color: Color,
}

impl IndexNode {
    /// New nodes are red; the unbalanced variant ignores the colour.
    pub(crate) fn new(record: RequestRecord) -> Self {
        Self {
            record,
            left: None,
            right: None,
            color: Color::Red,
        }
    }

    pub fn record(&self) -> &RequestRecord {
        &self.record
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn left(&self) -> Option<&IndexNode> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&IndexNode> {
        self.right.as_deref()
    }

    pub fn is_red(&self) -> bool {
        self.color == Color::Red
    }
}

pub(crate) fn find_in<'a>(mut link: &'a Link, id: &str) -> Option<&'a RequestRecord> {
    while let Some(node) = link {
        link = match id.cmp(node.record.id()) {
            Ordering::Less => &node.left,
            Ordering::Greater => &node.right,
            Ordering::Equal => return Some(&node.record),
        };
    }
    None
}

/// Height in nodes, computed with an explicit stack so degenerate trees are safe.
pub(crate) fn height_of(root: &Link) -> usize {
    let mut deepest = 0;
    let mut stack: Vec<(&IndexNode, usize)> = Vec::new();
    if let Some(node) = root.as_deref() {
        stack.push((node, 1));
    }
    while let Some((node, depth)) = stack.pop() {
        deepest = deepest.max(depth);
        if let Some(left) = node.left.as_deref() {
            stack.push((left, depth + 1));
        }
        if let Some(right) = node.right.as_deref() {
            stack.push((right, depth + 1));
        }
    }
    deepest
}

/// In-order iterator over the records of a tree.
pub struct InOrderIter<'a> {
    stack: Vec<&'a IndexNode>,
}

impl<'a> InOrderIter<'a> {
    pub(crate) fn new(root: &'a Link) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root.as_deref());
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a IndexNode>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a> Iterator for InOrderIter<'a> {
    type Item = &'a RequestRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some(&node.record)
    }
}
