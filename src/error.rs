//! Error types for the dump-to-graph pipeline
//!
//! Only a run that yields no addressable cell at all is fatal. Everything else
//! (foreign text, empty command groups, page-index conflicts) is recovered
//! locally and reported through `tracing` or the emitted graph.

use thiserror::Error;

/// Errors that can abort rendering
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemvizError {
    #[error("no addresses parsed")]
    NoAddresses,

    #[error("column count must be >= 1, got {columns}")]
    InvalidColumns { columns: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, MemvizError>;
