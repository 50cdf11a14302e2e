//! Engine error types for CIVIC-CORE.
//!
//! Every failure is synchronous and local. Rejected inputs never mutate state.

use thiserror::Error;

/// Errors surfaced by the indexing and relationship engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("{structure} is empty")]
    EmptyStructure { structure: &'static str },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Request not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl EngineError {
    /// Returns true if this error should be logged as a warning rather than an error.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::EmptyStructure { .. } | Self::NotFound(_))
    }

    /// Returns true if the caller supplied bad input.
    pub fn is_caller_fault(&self) -> bool {
        matches!(self, Self::InvalidArgument(_) | Self::Parse(_))
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
