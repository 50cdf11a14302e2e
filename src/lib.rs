//! CIVIC-CORE
//!
//! In-memory indexing and relationship discovery for municipal service
//! requests. Performs no I/O: records arrive fully formed from an intake
//! workflow and query results go back to callers as plain values.
//!
//! # Components
//!
//! - [`index`]: red-black ordered index keyed by request identifier, plus an
//!   unbalanced baseline with the same contract
//! - [`queue`]: array-backed max-heap over request priority
//! - [`graph`]: heuristic relationship graph, traversals, impact clusters
//! - [`disjoint`]: union-find over identifiers
//! - [`telemetry`]: logging, spans, operation timing
//!
//! # Ownership
//!
//! The index owns every record. The graph and heap hold identifiers or
//! borrowed references resolved through the index, never copies.
//!
//! # Concurrency
//!
//! Structures are single-writer and unsynchronized. Share an engine across
//! threads through [`SharedEngine`], which serializes all access.

pub mod cli;
pub mod config;
pub mod disjoint;
pub mod error;
pub mod graph;
pub mod index;
pub mod queue;
pub mod record;
pub mod telemetry;

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use config::EngineConfig;
use error::EngineError;
use graph::{Components, Edge, ImpactCluster, RelationshipGraph, TraversalMode};
use index::RedBlackIndex;
use queue::{HeapEntry, PriorityQueue};
use record::RequestRecord;
use telemetry::{OperationSpan, PerformanceTracker, SpanExt};

/// Tracker category for index operations.
pub const INDEX_CATEGORY: &str = "index";
/// Tracker category for graph queries.
pub const GRAPH_CATEGORY: &str = "graph";

/// The engine instance: one index, one graph, one tracker.
#[derive(Debug)]
pub struct Engine {
    index: RedBlackIndex,
    graph: RelationshipGraph,
    tracker: PerformanceTracker,
    config: EngineConfig,
}

impl Engine {
    /// Create an empty engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            index: RedBlackIndex::new(),
            graph: RelationshipGraph::new(config.scoring.clone()),
            tracker: PerformanceTracker::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn index(&self) -> &RedBlackIndex {
        &self.index
    }

    pub fn graph(&self) -> &RelationshipGraph {
        &self.graph
    }

    pub fn tracker(&self) -> &PerformanceTracker {
        &self.tracker
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn timed<T>(&self, category: &str, operation: &str, f: impl FnOnce() -> T) -> T {
        if self.config.track_performance {
            self.tracker.track_operation(category, operation, self.index.len(), f)
        } else {
            f()
        }
    }

    /// Accept a new request: index it, then score it into the graph.
    ///
    /// Returns `Ok(false)` without touching anything when the identifier is
    /// already known.
    pub fn submit(&mut self, record: RequestRecord) -> Result<bool, EngineError> {
        record.validate()?;
        let id = record.id().to_string();

        let size = self.index.len();
        let inserted = if self.config.track_performance {
            let index = &mut self.index;
            self.tracker
                .track_operation(INDEX_CATEGORY, "insert", size, || index.insert(record))
        } else {
            self.index.insert(record)
        };
        if !inserted {
            debug!(id = %id, "duplicate request ignored");
            return Ok(false);
        }

        let stored = self
            .index
            .find(&id)
            .ok_or_else(|| EngineError::NotFound(id.clone()))?;
        let edges = self.graph.add_request(stored, &self.index)?;
        debug!(id = %id, edges, "request registered");
        Ok(true)
    }

    /// Rebuild state from stored records. Records are replayed in submission
    /// order so relatedness scoring sees them in the order it originally did.
    /// The whole batch is validated before anything is inserted.
    pub fn rehydrate<I>(&mut self, records: I) -> Result<usize, EngineError>
    where
        I: IntoIterator<Item = RequestRecord>,
    {
        let span = OperationSpan::new(INDEX_CATEGORY, "rehydrate");
        let _guard = span.enter();
        let result = self.replay(records.into_iter().collect());
        span.record_result(&result);
        if let Ok(inserted) = &result {
            span.record("result_size", *inserted);
        }
        result
    }

    fn replay(&mut self, mut records: Vec<RequestRecord>) -> Result<usize, EngineError> {
        for record in &records {
            record.validate()?;
        }
        records.sort_by(|a, b| {
            a.submitted_at
                .cmp(&b.submitted_at)
                .then_with(|| a.id().cmp(b.id()))
        });

        let total = records.len();
        let mut inserted = 0;
        for record in records {
            if self.submit(record)? {
                inserted += 1;
            }
        }
        if inserted < total {
            warn!(skipped = total - inserted, "duplicate identifiers skipped during rehydration");
        }
        info!(
            records = inserted,
            edges = self.graph.edge_count(),
            "engine rehydrated"
        );
        Ok(inserted)
    }

    pub fn find(&self, id: &str) -> Option<&RequestRecord> {
        self.timed(INDEX_CATEGORY, "find", || self.index.find(id))
    }

    /// Every record in identifier order.
    pub fn in_order(&self) -> Vec<&RequestRecord> {
        self.timed(INDEX_CATEGORY, "in_order", || self.index.in_order())
    }

    /// Records ordered most urgent first, at most `limit` of them.
    pub fn triage(&self, limit: usize) -> Vec<&RequestRecord> {
        let mut heap: PriorityQueue<HeapEntry<'_>> =
            self.index.iter().map(HeapEntry::new).collect();
        let mut out = Vec::with_capacity(limit.min(heap.len()));
        while out.len() < limit {
            match heap.extract_max() {
                Ok(entry) => out.push(entry.record()),
                Err(_) => break,
            }
        }
        out
    }

    pub fn related(&self, id: &str, mode: TraversalMode) -> Vec<String> {
        self.timed(GRAPH_CATEGORY, "related_requests", || {
            self.graph.related_requests(id, mode, &self.index)
        })
    }

    pub fn impact_cluster(&self, id: &str) -> ImpactCluster {
        self.timed(GRAPH_CATEGORY, "impact_cluster", || {
            self.graph.impact_cluster(id, &self.index)
        })
    }

    pub fn shortest_path(&self, start: &str, end: &str) -> Vec<String> {
        self.timed(GRAPH_CATEGORY, "shortest_path", || self.graph.shortest_path(start, end))
    }

    pub fn components(&self) -> Components {
        self.timed(GRAPH_CATEGORY, "connected_components", || {
            self.graph.connected_components()
        })
    }

    pub fn nodes(&self) -> Vec<&str> {
        self.graph.nodes()
    }

    pub fn edges(&self) -> Vec<Edge> {
        self.graph.edges()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// An engine behind one mutex: the external serialization point for callers
/// that need to share it across threads.
#[derive(Debug, Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<Engine>>,
}

impl SharedEngine {
    pub fn new(engine: Engine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Run a read-only query while holding the lock.
    pub fn with<R>(&self, f: impl FnOnce(&Engine) -> R) -> R {
        let engine = self.inner.lock();
        f(&engine)
    }

    /// Run a mutation while holding the lock.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut Engine) -> R) -> R {
        let mut engine = self.inner.lock();
        f(&mut engine)
    }

    pub fn submit(&self, record: RequestRecord) -> Result<bool, EngineError> {
        self.with_mut(|engine| engine.submit(record))
    }
}
