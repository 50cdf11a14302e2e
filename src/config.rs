//! Engine configuration loading from environment variables or TOML.
//!
//! All configuration values are loaded from `CIVIC_CORE_*` environment
//! variables with sensible defaults. Invalid values fall back to defaults
//! without crashing.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `CIVIC_CORE_EDGE_THRESHOLD` | 40 | Minimum relatedness score for an edge (1..=100) |
//! | `CIVIC_CORE_PROXIMITY_KM` | 1.0 | Radius for the coordinate proximity check |
//! | `CIVIC_CORE_TIME_WINDOW_HOURS` | 24 | Window for the submission-time check (1..=876000) |
//! | `CIVIC_CORE_PRIORITY_TOLERANCE` | 1 | Max priority gap for the similarity bonus |
//! | `CIVIC_CORE_TRACK_PERFORMANCE` | true | Time index operations |
//! | `CIVIC_CORE_LOG_LEVEL` | info | Tracing filter |
//! | `CIVIC_CORE_LOG_FORMAT` | json | `json` or `pretty` |

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::graph::ScoringConfig;
use crate::telemetry::{LogConfig, LogFormat};

/// Everything needed to construct an [`Engine`](crate::Engine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub scoring: ScoringConfig,
    pub track_performance: bool,
    pub logging: LogConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            track_performance: true,
            logging: LogConfig::default(),
        }
    }
}

/// Flat summary of the effective values, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectiveConfig {
    pub edge_threshold: u32,
    pub proximity_km: f64,
    pub time_window_hours: i64,
    pub priority_tolerance: i32,
    pub track_performance: bool,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl EngineConfig {
    /// Parse a TOML document. Missing keys take their defaults, then the
    /// same floors as the environment loader are applied.
    pub fn from_toml_str(text: &str) -> Result<Self, EngineError> {
        let mut config: EngineConfig =
            toml::from_str(text).map_err(|e| EngineError::Config(e.to_string()))?;
        config.scoring = sanitize_scoring(config.scoring);
        Ok(config)
    }

    pub fn effective(&self) -> EffectiveConfig {
        EffectiveConfig {
            edge_threshold: self.scoring.edge_threshold,
            proximity_km: self.scoring.proximity_km,
            time_window_hours: self.scoring.time_window_hours,
            priority_tolerance: self.scoring.priority_tolerance,
            track_performance: self.track_performance,
            log_level: self.logging.level.clone(),
            log_format: self.logging.format,
        }
    }
}

/// Parse an env var, returning `default` on missing or invalid.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(val) => val.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}

/// One hundred years.
const MAX_TIME_WINDOW_HOURS: i64 = 24 * 365 * 100;

fn sanitize_scoring(scoring: ScoringConfig) -> ScoringConfig {
    let proximity_km = if scoring.proximity_km.is_finite() {
        scoring.proximity_km.max(0.001)
    } else {
        1.0
    };
    ScoringConfig {
        edge_threshold: scoring.edge_threshold.clamp(1, 100),
        proximity_km,
        time_window_hours: scoring.time_window_hours.clamp(1, MAX_TIME_WINDOW_HOURS),
        priority_tolerance: scoring.priority_tolerance.max(0),
    }
}

fn load_scoring_config() -> ScoringConfig {
    let defaults = ScoringConfig::default();
    sanitize_scoring(ScoringConfig {
        edge_threshold: parse_env("CIVIC_CORE_EDGE_THRESHOLD", defaults.edge_threshold),
        proximity_km: parse_env("CIVIC_CORE_PROXIMITY_KM", defaults.proximity_km),
        time_window_hours: parse_env("CIVIC_CORE_TIME_WINDOW_HOURS", defaults.time_window_hours),
        priority_tolerance: parse_env("CIVIC_CORE_PRIORITY_TOLERANCE", defaults.priority_tolerance),
    })
}

fn load_log_config() -> LogConfig {
    let defaults = LogConfig::default();
    let level = std::env::var("CIVIC_CORE_LOG_LEVEL")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(defaults.level);
    let format = parse_env("CIVIC_CORE_LOG_FORMAT", defaults.format);
    LogConfig { format, level, output_path: None }
}

/// Load all configuration from environment variables.
///
/// Missing or invalid values fall back to safe defaults without panicking.
pub fn load() -> EngineConfig {
    EngineConfig {
        scoring: load_scoring_config(),
        track_performance: parse_env("CIVIC_CORE_TRACK_PERFORMANCE", true),
        logging: load_log_config(),
    }
}
