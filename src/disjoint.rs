//! Union-Find (disjoint set) over arbitrary identifiers.
//!
//! - Path compression on `find`
//! - Union by rank
//! - Set sizes tracked on roots
//!
//! Elements are interned into dense slots on first sight, so callers can use
//! request identifiers directly.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Union-Find with path compression and union by rank.
#[derive(Debug, Clone)]
pub struct DisjointSet<T> {
    slots: HashMap<T, usize>,
    elements: Vec<T>,
    /// Parent pointers (self-loop = root)
    parent: Vec<usize>,
    /// Upper bound on tree height, only meaningful on roots
    rank: Vec<u8>,
    size: Vec<usize>,
    set_count: usize,
}

impl<T: Clone + Eq + Hash> DisjointSet<T> {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
            elements: Vec::new(),
            parent: Vec::new(),
            rank: Vec::new(),
            size: Vec::new(),
            set_count: 0,
        }
    }

    /// Add `x` as a singleton if it is not already tracked.
    pub fn make_set(&mut self, x: T) -> usize {
        if let Some(&slot) = self.slots.get(&x) {
            return slot;
        }
        let slot = self.elements.len();
        self.slots.insert(x.clone(), slot);
        self.elements.push(x);
        self.parent.push(slot);
        self.rank.push(0);
        self.size.push(1);
        self.set_count += 1;
        slot
    }

    /// Representative of the set containing `x`. Unknown elements become
    /// singletons and are their own representative.
    pub fn find(&mut self, x: &T) -> T {
        let slot = self.make_set(x.clone());
        let root = self.find_slot(slot);
        self.elements[root].clone()
    }

    /// Merge the sets containing `x` and `y`. Returns false if they were
    /// already joined.
    pub fn union(&mut self, x: &T, y: &T) -> bool {
        let sx = self.make_set(x.clone());
        let sy = self.make_set(y.clone());
        let rx = self.find_slot(sx);
        let ry = self.find_slot(sy);
        if rx == ry {
            return false;
        }

        // Attach the shallower tree under the deeper one.
        let (root, child) = if self.rank[rx] < self.rank[ry] { (ry, rx) } else { (rx, ry) };
        self.parent[child] = root;
        self.size[root] += self.size[child];
        if self.rank[rx] == self.rank[ry] {
            self.rank[root] = self.rank[root].saturating_add(1);
        }
        self.set_count -= 1;
        true
    }

    pub fn connected(&mut self, x: &T, y: &T) -> bool {
        match (self.slots.get(x).copied(), self.slots.get(y).copied()) {
            (Some(sx), Some(sy)) => self.find_slot(sx) == self.find_slot(sy),
            _ => x == y,
        }
    }

    /// Read-only [`connected`](Self::connected): walks parent links without
    /// compressing them. Union by rank keeps the walk logarithmic.
    pub fn same_set<Q>(&self, x: &Q, y: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match (self.slots.get(x), self.slots.get(y)) {
            (Some(&sx), Some(&sy)) => self.root_of(sx) == self.root_of(sy),
            _ => x == y,
        }
    }

    fn root_of(&self, mut slot: usize) -> usize {
        while self.parent[slot] != slot {
            slot = self.parent[slot];
        }
        slot
    }

    pub fn contains(&self, x: &T) -> bool {
        self.slots.contains_key(x)
    }

    /// Number of elements in the set containing `x`, or 0 if untracked.
    pub fn set_size(&mut self, x: &T) -> usize {
        match self.slots.get(x).copied() {
            Some(slot) => {
                let root = self.find_slot(slot);
                self.size[root]
            }
            None => 0,
        }
    }

    /// Number of disjoint sets.
    pub fn set_count(&self) -> usize {
        self.set_count
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// All sets, each listed in insertion order of its members.
    pub fn groups(&mut self) -> Vec<Vec<T>> {
        let mut by_root: HashMap<usize, usize> = HashMap::new();
        let mut groups: Vec<Vec<T>> = Vec::new();
        for slot in 0..self.elements.len() {
            let root = self.find_slot(slot);
            let group = *by_root.entry(root).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[group].push(self.elements[slot].clone());
        }
        groups
    }

    fn find_slot(&mut self, slot: usize) -> usize {
        let parent = self.parent[slot];
        if parent == slot {
            return slot;
        }
        let root = self.find_slot(parent);
        self.parent[slot] = root;
        root
    }
}

impl<T: Clone + Eq + Hash> Default for DisjointSet<T> {
    fn default() -> Self {
        Self::new()
    }
}
