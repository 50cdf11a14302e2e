//! Span utilities for engine operations.

use tracing::{info_span, Span};

/// Extension trait for adding outcome fields to spans.
pub trait SpanExt {
    /// Record the result of an operation into the span.
    fn record_result<T, E>(&self, result: &Result<T, E>)
    where
        E: std::fmt::Display;
}

impl SpanExt for Span {
    fn record_result<T, E>(&self, result: &Result<T, E>)
    where
        E: std::fmt::Display,
    {
        match result {
            Ok(_) => {
                self.record("status", "ok");
            }
            Err(e) => {
                self.record("status", "error");
                self.record("error.message", e.to_string().as_str());
            }
        }
    }
}

/// Factory for standardized operation spans.
pub struct OperationSpan;

impl OperationSpan {
    /// Create a span for one engine operation.
    ///
    /// Fields included:
    /// - `category`: structure being exercised (`index`, `graph`, ...)
    /// - `operation`: operation name
    /// - `status` / `error.message`: filled in by `SpanExt::record_result`
    /// - `result_size`: filled in after completion
    pub fn new(category: &str, operation: &str) -> Span {
        info_span!(
            "engine_operation",
            category = %category,
            operation = %operation,
            status = tracing::field::Empty,
            error.message = tracing::field::Empty,
            result_size = tracing::field::Empty,
        )
    }
}
