//! Error types for the metrics layer
//!
//! Producer-side calls never return errors. These cover the construction,
//! registration and encoding paths only.

use thiserror::Error;

/// Errors raised while building, registering or encoding metrics
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MetricsError {
    #[error("invalid bucket bounds: {0}")]
    InvalidBuckets(String),

    #[error("invalid metric name prefix '{0}': must match [a-zA-Z_][a-zA-Z0-9_]*")]
    InvalidPrefix(String),

    #[error("failed to build descriptor for '{name}': {source}")]
    Descriptor {
        name: String,
        #[source]
        source: prometheus::Error,
    },

    #[error("failed to register exporter: {0}")]
    Registration(#[source] prometheus::Error),

    #[error("failed to encode metrics: {0}")]
    Encode(#[source] prometheus::Error),

    #[error("encoded metrics are not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Convenience alias for fallible metrics operations
pub type Result<T, E = MetricsError> = std::result::Result<T, E>;
