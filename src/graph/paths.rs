//! Shortest paths and connected components.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::info;

use super::RelationshipGraph;
use crate::telemetry::OperationSpan;

/// Component id to member identifiers. Ids are assigned in discovery order.
pub type Components = BTreeMap<usize, BTreeSet<String>>;

impl RelationshipGraph {
    /// Fewest-hop path from `start` to `end`, both ends included.
    ///
    /// Each round settles the unvisited node with the smallest tentative
    /// distance (O(n²) overall). When `end` cannot be reached the result is
    /// just `[start]`.
    pub fn shortest_path(&self, start: &str, end: &str) -> Vec<String> {
        if start == end || !self.contains(start) || !self.contains(end) {
            return vec![start.to_string()];
        }

        let mut distance: HashMap<&str, usize> = HashMap::from([(start, 0)]);
        let mut previous: HashMap<&str, &str> = HashMap::new();
        let mut unvisited: HashSet<&str> = self.order.iter().map(String::as_str).collect();

        loop {
            // Ties go to the smaller identifier so results are reproducible.
            let current = unvisited
                .iter()
                .filter_map(|&id| distance.get(id).map(|&d| (d, id)))
                .min();
            let (dist, current) = match current {
                Some(found) => found,
                None => break,
            };
            if current == end {
                break;
            }
            unvisited.remove(current);

            for neighbor in self.neighbors(current) {
                if !unvisited.contains(neighbor) {
                    continue;
                }
                let candidate = dist + 1;
                if distance.get(neighbor).map_or(true, |&d| candidate < d) {
                    distance.insert(neighbor, candidate);
                    previous.insert(neighbor, current);
                }
            }
        }

        if !previous.contains_key(end) {
            return vec![start.to_string()];
        }
        let mut path = vec![end.to_string()];
        let mut cursor = end;
        while let Some(&prev) = previous.get(cursor) {
            path.push(prev.to_string());
            cursor = prev;
        }
        path.reverse();
        path
    }

    /// Partition every registered request into connected components.
    pub fn connected_components(&self) -> Components {
        let span = OperationSpan::new("graph", "connected_components");
        let _guard = span.enter();

        let mut visited: HashSet<&str> = HashSet::new();
        let mut components = Components::new();

        for id in &self.order {
            if visited.contains(id.as_str()) {
                continue;
            }
            let mut members = BTreeSet::new();
            let mut stack: Vec<&str> = vec![id.as_str()];
            while let Some(current) = stack.pop() {
                if !visited.insert(current) {
                    continue;
                }
                members.insert(current.to_string());
                stack.extend(self.neighbors(current).filter(|n| !visited.contains(n)));
            }
            components.insert(components.len(), members);
        }

        span.record("result_size", components.len());
        info!(nodes = self.order.len(), components = components.len(), "components computed");
        components
    }
}
