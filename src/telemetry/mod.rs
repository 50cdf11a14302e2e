//! Telemetry module for CIVIC-CORE.
//!
//! Provides structured logging, operation spans, and timing instrumentation.
//! Nothing here performs network I/O.

mod logging;
mod spans;
mod tracker;

pub use logging::{init_logging, LogConfig, LogError, LogFormat};
pub use spans::{OperationSpan, SpanExt};
pub use tracker::{
    OperationSample, PerformanceSnapshot, PerformanceTracker, TimingSummary, OPERATION_HISTOGRAM,
};
