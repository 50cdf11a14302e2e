//! Array-backed binary max-heap over request priority.
//!
//! Equal priorities are not ordered by arrival: ties fall out of the
//! structural position of each entry, so extraction order among equals is
//! unspecified.

use crate::error::EngineError;
use crate::record::RequestRecord;

/// Anything that can be ordered by an integer priority.
pub trait Prioritized {
    fn priority(&self) -> i32;
}

impl Prioritized for RequestRecord {
    fn priority(&self) -> i32 {
        self.priority
    }
}

impl<T: Prioritized + ?Sized> Prioritized for &T {
    fn priority(&self) -> i32 {
        (**self).priority()
    }
}

/// Borrowed view of a record for the lifetime of one traversal.
#[derive(Debug, Clone, Copy)]
pub struct HeapEntry<'a> {
    record: &'a RequestRecord,
}

impl<'a> HeapEntry<'a> {
    pub fn new(record: &'a RequestRecord) -> Self {
        Self { record }
    }

    pub fn record(&self) -> &'a RequestRecord {
        self.record
    }

    pub fn id(&self) -> &'a str {
        self.record.id()
    }
}

impl Prioritized for HeapEntry<'_> {
    fn priority(&self) -> i32 {
        self.record.priority
    }
}

/// Binary max-heap. For every slot `i`, `items[i]` is at least as urgent as
/// `items[2i + 1]` and `items[2i + 2]`.
#[derive(Debug, Clone)]
pub struct PriorityQueue<T> {
    items: Vec<T>,
}

impl<T: Prioritized> PriorityQueue<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { items: Vec::with_capacity(capacity) }
    }

    pub fn insert(&mut self, item: T) {
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
    }

    /// Remove and return the highest-priority entry.
    pub fn extract_max(&mut self) -> Result<T, EngineError> {
        if self.items.is_empty() {
            return Err(EngineError::EmptyStructure { structure: "priority queue" });
        }
        // The last entry takes the root slot, then sinks.
        let max = self.items.swap_remove(0);
        self.sift_down(0);
        Ok(max)
    }

    pub fn peek(&self) -> Result<&T, EngineError> {
        self.items
            .first()
            .ok_or(EngineError::EmptyStructure { structure: "priority queue" })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The backing array in heap order.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Check the max-heap property over the whole array.
    pub fn is_valid(&self) -> bool {
        (1..self.items.len()).all(|i| self.items[(i - 1) / 2].priority() >= self.items[i].priority())
    }

    /// Drain every entry in non-increasing priority order.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.items.len());
        while let Ok(item) = self.extract_max() {
            out.push(item);
        }
        out
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.items[parent].priority() >= self.items[i].priority() {
                break;
            }
            self.items.swap(parent, i);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * i + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let larger = if right < len && self.items[right].priority() > self.items[left].priority() {
                right
            } else {
                left
            };
            if self.items[i].priority() >= self.items[larger].priority() {
                break;
            }
            self.items.swap(i, larger);
            i = larger;
        }
    }
}

impl<T: Prioritized> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Prioritized> Extend<T> for PriorityQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<T: Prioritized> FromIterator<T> for PriorityQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut queue = Self::new();
        queue.extend(iter);
        queue
    }
}
