//! Heuristic relatedness score between two requests.
//!
//! | Signal | Points |
//! |---|---|
//! | same category | 40 |
//! | nearby location | 30 |
//! | submitted within the time window | 20 |
//! | priority difference within tolerance | 10 |
//!
//! "Nearby" means a haversine distance within the proximity radius when both
//! records have known coordinates, otherwise a case-insensitive match of the
//! location text.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::record::RequestRecord;

pub const CATEGORY_WEIGHT: u32 = 40;
pub const LOCATION_WEIGHT: u32 = 30;
pub const TIME_WEIGHT: u32 = 20;
pub const PRIORITY_WEIGHT: u32 = 10;

/// Tunables for the relatedness heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Minimum total score that creates an edge.
    pub edge_threshold: u32,
    pub proximity_km: f64,
    pub time_window_hours: i64,
    pub priority_tolerance: i32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            edge_threshold: 40,
            proximity_km: 1.0,
            time_window_hours: 24,
            priority_tolerance: 1,
        }
    }
}

/// Per-signal contributions of one comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub category: u32,
    pub location: u32,
    pub time: u32,
    pub priority: u32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.category + self.location + self.time + self.priority
    }
}

/// Score `a` against `b`. The score is symmetric.
pub fn relatedness(a: &RequestRecord, b: &RequestRecord, config: &ScoringConfig) -> ScoreBreakdown {
    let mut breakdown = ScoreBreakdown::default();
    if a.category == b.category {
        breakdown.category = CATEGORY_WEIGHT;
    }
    if is_nearby(a, b, config.proximity_km) {
        breakdown.location = LOCATION_WEIGHT;
    }
    if within_window(a, b, config.time_window_hours) {
        breakdown.time = TIME_WEIGHT;
    }
    if (i64::from(a.priority) - i64::from(b.priority)).abs() <= i64::from(config.priority_tolerance) {
        breakdown.priority = PRIORITY_WEIGHT;
    }
    breakdown
}

/// A window too large for `Duration` spans every representable timestamp.
fn within_window(a: &RequestRecord, b: &RequestRecord, hours: i64) -> bool {
    let gap = a.submitted_at.signed_duration_since(b.submitted_at);
    match Duration::try_hours(hours) {
        Some(window) => gap <= window && gap >= -window,
        None => hours > 0,
    }
}

fn is_nearby(a: &RequestRecord, b: &RequestRecord, proximity_km: f64) -> bool {
    match (a.known_coordinates(), b.known_coordinates()) {
        (Some(pa), Some(pb)) => pa.haversine_km(&pb) <= proximity_km,
        _ => a.location.to_lowercase() == b.location.to_lowercase(),
    }
}
