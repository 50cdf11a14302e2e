//! Relationship graph over service requests.
//!
//! Undirected and identifier-only: records stay owned by the index and are
//! resolved through [`RecordLookup`] whenever a record field is needed.
//! Each new request is scored once against every request registered before
//! it. Edges are never removed or re-scored, so replaying the same records in
//! a different order can produce a different graph.

mod paths;
pub mod scoring;
mod traversal;

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::disjoint::DisjointSet;
use crate::error::EngineError;
use crate::index::RecordLookup;
use crate::record::RequestRecord;

pub use paths::Components;
pub use scoring::{relatedness, ScoreBreakdown, ScoringConfig};
pub use traversal::{ImpactCluster, TraversalMode};

/// One undirected edge, reported smaller identifier first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub score: u32,
}

#[derive(Debug, Default)]
pub struct RelationshipGraph {
    /// Identifiers in registration order.
    order: Vec<String>,
    adjacency: HashMap<String, BTreeSet<String>>,
    /// Score at creation time, keyed smaller identifier first.
    scores: HashMap<(String, String), u32>,
    /// Kept in step with every registration and edge.
    components: DisjointSet<String>,
    scoring: ScoringConfig,
}

impl RelationshipGraph {
    pub fn new(scoring: ScoringConfig) -> Self {
        Self {
            scoring,
            ..Self::default()
        }
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    /// Register `record` and link it to every earlier request scoring at or
    /// above the edge threshold. Returns the number of edges created;
    /// registering a known identifier again creates none.
    pub fn add_request<L>(&mut self, record: &RequestRecord, lookup: &L) -> Result<usize, EngineError>
    where
        L: RecordLookup + ?Sized,
    {
        record.validate()?;
        let id = record.id();
        if self.adjacency.contains_key(id) {
            return Ok(0);
        }

        let mut related = Vec::new();
        for existing_id in &self.order {
            let existing = match lookup.find(existing_id) {
                Some(existing) => existing,
                None => continue,
            };
            let score = relatedness(record, existing, &self.scoring).total();
            if score >= self.scoring.edge_threshold {
                related.push((existing_id.clone(), score));
            }
        }

        self.order.push(id.to_string());
        self.adjacency.insert(id.to_string(), BTreeSet::new());
        self.components.make_set(id.to_string());
        for (other, score) in &related {
            self.link(id, other, *score);
            debug!(source = %id, target = %other, score, "relationship edge created");
        }
        Ok(related.len())
    }

    fn link(&mut self, a: &str, b: &str, score: u32) {
        if let Some(neighbors) = self.adjacency.get_mut(a) {
            neighbors.insert(b.to_string());
        }
        if let Some(neighbors) = self.adjacency.get_mut(b) {
            neighbors.insert(a.to_string());
        }
        self.scores.insert(edge_key(a, b), score);
        self.components.union(&a.to_string(), &b.to_string());
    }

    pub fn contains(&self, id: &str) -> bool {
        self.adjacency.contains_key(id)
    }

    /// Registered identifiers in registration order.
    pub fn nodes(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Each edge once, smaller identifier first.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges = Vec::new();
        for id in &self.order {
            for neighbor in self.neighbors(id) {
                if id.as_str() < neighbor {
                    edges.push(Edge {
                        source: id.clone(),
                        target: neighbor.to_string(),
                        score: self.edge_score(id, neighbor).unwrap_or_default(),
                    });
                }
            }
        }
        edges
    }

    /// Neighbours of `id` in ascending identifier order.
    pub fn neighbors(&self, id: &str) -> impl Iterator<Item = &str> + '_ {
        self.adjacency
            .get(id)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    pub fn degree(&self, id: &str) -> usize {
        self.adjacency.get(id).map_or(0, BTreeSet::len)
    }

    pub fn edge_score(&self, a: &str, b: &str) -> Option<u32> {
        self.scores.get(&edge_key(a, b)).copied()
    }

    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    pub fn edge_count(&self) -> usize {
        self.scores.len()
    }

    /// Snapshot of the union-find maintained alongside the adjacency.
    pub fn connectivity(&self) -> DisjointSet<String> {
        self.components.clone()
    }

    /// Reachability without a traversal. Unknown identifiers are never connected.
    pub fn are_connected(&self, a: &str, b: &str) -> bool {
        self.contains(a) && self.contains(b) && self.components.same_set(a, b)
    }
}

fn edge_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::RedBlackIndex;
    use chrono::{TimeZone, Utc};

    fn record(id: &str, category: &str, location: &str) -> RequestRecord {
        RequestRecord::new(id, category, 3, Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
            .with_location(location)
    }

    fn build(records: Vec<RequestRecord>) -> (RedBlackIndex, RelationshipGraph) {
        let mut index = RedBlackIndex::new();
        let mut graph = RelationshipGraph::new(ScoringConfig::default());
        for r in records {
            index.insert(r.clone());
            graph.add_request(&r, &index).unwrap();
        }
        (index, graph)
    }

    #[test]
    fn test_reregistration_is_idempotent() {
        let (index, mut graph) = build(vec![record("A", "Water", "x"), record("B", "Water", "y")]);
        assert_eq!(graph.edge_count(), 1);
        let again = index.find("B").unwrap().clone();
        assert_eq!(graph.add_request(&again, &index).unwrap(), 0);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_edges_report_smaller_id_first_with_score() {
        let (_, graph) = build(vec![record("B", "Water", "Depot"), record("A", "Water", "depot")]);
        let edges = graph.edges();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source, "A");
        assert_eq!(edges[0].target, "B");
        assert_eq!(edges[0].score, 100);
    }

    #[test]
    fn test_invalid_record_rejected_before_registration() {
        let index = RedBlackIndex::new();
        let mut graph = RelationshipGraph::new(ScoringConfig::default());
        let bad = record("", "Water", "x");
        assert!(graph.add_request(&bad, &index).is_err());
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn test_connectivity_matches_adjacency() {
        let (_, graph) = build(vec![
            record("A", "Water", ""),
            record("B", "Water", ""),
            record("C", "Power", "Hall"),
        ]);
        // A~B (category + time + priority), C only shares time and priority with them.
        assert!(graph.are_connected("A", "B"));
        assert!(!graph.are_connected("A", "C"));
        assert!(!graph.are_connected("A", "missing"));
        assert!(!graph.are_connected("missing", "missing"));
    }

    #[test]
    fn test_connectivity_follows_later_registrations() {
        let (mut index, mut graph) = build(vec![record("A", "Water", "Pier"), record("C", "Power", "Mill")]);
        assert!(!graph.are_connected("A", "C"));

        // B bridges A (same category) and C (same location).
        let bridge = record("B", "Water", "mill");
        index.insert(bridge.clone());
        assert_eq!(graph.add_request(&bridge, &index).unwrap(), 2);
        assert!(graph.are_connected("A", "C"));
        assert_eq!(graph.connectivity().set_count(), 1);
    }
}
