//! Wall-clock timing of engine operations.
//!
//! Samples are kept per category in call order for in-process comparison
//! (for example red-black vs unbalanced inserts) and mirrored to the
//! `metrics` facade as histograms for whatever exporter the host installs.

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Histogram name used on the `metrics` facade.
pub const OPERATION_HISTOGRAM: &str = "civic_core_operation_seconds";

/// One timed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSample {
    pub operation: String,
    pub input_size: usize,
    pub elapsed: Duration,
}

/// Aggregate timings for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingSummary {
    pub count: usize,
    pub total: Duration,
    pub min: Duration,
    pub max: Duration,
    pub mean: Duration,
}

/// Every recorded sample grouped by category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    pub categories: BTreeMap<String, Vec<OperationSample>>,
}

/// Records how long wrapped operations take. Never alters their results.
#[derive(Debug, Default)]
pub struct PerformanceTracker {
    samples: Mutex<HashMap<String, Vec<OperationSample>>>,
}

impl PerformanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `operation`, record its elapsed time under `category`, and hand
    /// back whatever it returned, errors included.
    pub fn track_operation<T, F>(&self, category: &str, operation: &str, input_size: usize, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        let started = Instant::now();
        let result = f();
        let elapsed = started.elapsed();

        metrics::histogram!(
            OPERATION_HISTOGRAM,
            "category" => category.to_string(),
            "operation" => operation.to_string()
        )
        .record(elapsed.as_secs_f64());

        self.samples
            .lock()
            .entry(category.to_string())
            .or_default()
            .push(OperationSample {
                operation: operation.to_string(),
                input_size,
                elapsed,
            });
        result
    }

    /// Samples for `category` in call order; empty if none were recorded.
    pub fn metrics(&self, category: &str) -> Vec<OperationSample> {
        self.samples.lock().get(category).cloned().unwrap_or_default()
    }

    pub fn categories(&self) -> Vec<String> {
        let mut names: Vec<String> = self.samples.lock().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn summary(&self, category: &str) -> Option<TimingSummary> {
        let samples = self.samples.lock();
        let samples = samples.get(category).filter(|s| !s.is_empty())?;
        let total: Duration = samples.iter().map(|s| s.elapsed).sum();
        let min = samples.iter().map(|s| s.elapsed).min().unwrap_or_default();
        let max = samples.iter().map(|s| s.elapsed).max().unwrap_or_default();
        let count = samples.len();
        let mean = total / u32::try_from(count).unwrap_or(u32::MAX);
        Some(TimingSummary { count, total, min, max, mean })
    }

    pub fn snapshot(&self) -> PerformanceSnapshot {
        let samples = self.samples.lock();
        PerformanceSnapshot {
            categories: samples.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        }
    }

    pub fn clear(&self) {
        self.samples.lock().clear();
    }
}
