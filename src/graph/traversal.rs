//! Reachability queries: related-request traversals and impact clusters.
//!
//! All traversals run on explicit queues and stacks so call depth stays flat
//! regardless of graph size. Results list identifiers in visitation order,
//! starting with the seed. An unknown seed yields an empty result.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{Edge, RelationshipGraph};
use crate::index::RecordLookup;
use crate::queue::{HeapEntry, PriorityQueue};

/// Expansion order for [`RelationshipGraph::related_requests`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalMode {
    /// Level order from the seed.
    BreadthFirst,
    /// Preorder, lowest identifier first among siblings.
    DepthFirst,
    /// Level by level, each level drained in descending-priority buckets,
    /// first-in first-out within a bucket.
    PriorityFirst,
}

impl std::str::FromStr for TraversalMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bfs" | "breadth" | "breadth_first" => Ok(Self::BreadthFirst),
            "dfs" | "depth" | "depth_first" => Ok(Self::DepthFirst),
            "priority" | "priority_first" => Ok(Self::PriorityFirst),
            other => Err(format!("unknown traversal mode: {other}")),
        }
    }
}

/// Requests reached by heap-driven expansion from a seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImpactCluster {
    pub seed: String,
    /// Members in extraction order, seed first.
    pub members: Vec<String>,
    /// Edges with both endpoints inside the cluster, for mirroring to storage.
    pub edges: Vec<Edge>,
}

impl ImpactCluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|m| m == id)
    }
}

impl RelationshipGraph {
    /// Every request reachable from `id`, ordered by `mode`.
    pub fn related_requests<L>(&self, id: &str, mode: TraversalMode, lookup: &L) -> Vec<String>
    where
        L: RecordLookup + ?Sized,
    {
        if !self.contains(id) {
            return Vec::new();
        }
        match mode {
            TraversalMode::BreadthFirst => self.breadth_first(id),
            TraversalMode::DepthFirst => self.depth_first(id),
            TraversalMode::PriorityFirst => self.priority_first(id, lookup),
        }
    }

    fn breadth_first(&self, start: &str) -> Vec<String> {
        let mut visited: HashSet<&str> = HashSet::from([start]);
        let mut queue: VecDeque<&str> = VecDeque::from([start]);
        let mut order = Vec::new();

        while let Some(current) = queue.pop_front() {
            order.push(current.to_string());
            for neighbor in self.neighbors(current) {
                if visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        order
    }

    fn depth_first(&self, start: &str) -> Vec<String> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = vec![start];
        let mut order = Vec::new();

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            order.push(current.to_string());
            // Reverse so the smallest neighbour is popped first, matching recursive preorder.
            let pending: Vec<&str> = self.neighbors(current).filter(|n| !visited.contains(n)).collect();
            stack.extend(pending.into_iter().rev());
        }
        order
    }

    fn priority_first<L>(&self, start: &str, lookup: &L) -> Vec<String>
    where
        L: RecordLookup + ?Sized,
    {
        let priority_of = |id: &str| lookup.find(id).map_or(i32::MIN, |r| r.priority);
        let mut visited: HashSet<&str> = HashSet::from([start]);
        let mut level: Vec<&str> = vec![start];
        let mut order = Vec::new();

        while !level.is_empty() {
            let mut buckets: BTreeMap<Reverse<i32>, Vec<&str>> = BTreeMap::new();
            for id in level.drain(..) {
                buckets.entry(Reverse(priority_of(id))).or_default().push(id);
            }

            let mut next = Vec::new();
            for (Reverse(priority), bucket) in buckets {
                trace!(priority, size = bucket.len(), "draining priority bucket");
                for current in bucket {
                    order.push(current.to_string());
                    for neighbor in self.neighbors(current) {
                        if visited.insert(neighbor) {
                            next.push(neighbor);
                        }
                    }
                }
            }
            level = next;
        }
        order
    }

    /// Best-first expansion from `id` driven by one max-heap over the whole
    /// frontier: the most urgent pending request is always expanded next.
    pub fn impact_cluster<L>(&self, id: &str, lookup: &L) -> ImpactCluster
    where
        L: RecordLookup + ?Sized,
    {
        let mut cluster = ImpactCluster {
            seed: id.to_string(),
            members: Vec::new(),
            edges: Vec::new(),
        };
        let seed = match lookup.find(id) {
            Some(seed) if self.contains(id) => seed,
            _ => return cluster,
        };

        let mut heap: PriorityQueue<HeapEntry<'_>> = PriorityQueue::new();
        let mut visited: HashSet<&str> = HashSet::new();
        heap.insert(HeapEntry::new(seed));

        while let Ok(entry) = heap.extract_max() {
            let current = entry.id();
            if !visited.insert(current) {
                continue;
            }
            trace!(id = %current, priority = entry.record().priority, "impact cluster expansion");
            cluster.members.push(current.to_string());
            for neighbor in self.neighbors(current) {
                if visited.contains(neighbor) {
                    continue;
                }
                if let Some(record) = lookup.find(neighbor) {
                    heap.insert(HeapEntry::new(record));
                }
            }
        }

        cluster.edges = self
            .edges()
            .into_iter()
            .filter(|edge| visited.contains(edge.source.as_str()) && visited.contains(edge.target.as_str()))
            .collect();
        cluster
    }
}
