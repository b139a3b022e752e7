//! Error types for the acquisition layer
//!
//! The taxonomy mirrors where each failure is recovered: fetch errors stay
//! inside a source's fallback chain, validation and metric errors stay inside
//! a single record's transformation, and only caller cancellation crosses the
//! aggregation boundary.

use thiserror::Error;

use crate::metrics::MetricError;

/// Failure of a single strategy attempt.
///
/// The fallback executor logs these and advances to the next strategy; they
/// never surface past the chain.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection failure, DNS failure, or client-side abort
    #[error("network error: {0}")]
    Network(String),

    /// Upstream answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Response body was not the JSON shape the strategy expects
    #[error("schema error: {0}")]
    Schema(String),
}

/// Rejection of a single raw record during transformation.
///
/// `transform_batch` counts and logs these; the rest of the batch is
/// unaffected.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A field the schema requires was absent, null, or empty
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Borough text did not resolve to one of the five boroughs
    #[error("unresolvable borough: {0:?}")]
    UnresolvedBorough(String),

    /// A present field held a value of the wrong shape
    #[error("invalid value for {field}: {detail}")]
    InvalidValue {
        field: &'static str,
        detail: String,
    },

    /// Derived-metric computation rejected the measurement
    #[error(transparent)]
    Metric(#[from] MetricError),
}

/// Aggregation-level failure.
///
/// Upstream outages are not represented here: a source whose whole chain
/// fails still settles successfully with synthetic records. Cancellation is
/// the one condition a caller of `aggregate` can observe as an error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    /// The caller cancelled the aggregation before it settled
    #[error("aggregation cancelled by caller")]
    Cancelled,
}

/// Configuration loading or validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Invalid(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
