//! Record transformation boundary
//!
//! One transformer per upstream schema. Transformers validate the fields
//! their schema requires, resolve boroughs, compute derived metrics, and
//! reject individual malformed records without aborting the batch they
//! arrived in.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::warn;

use crate::error::ValidationError;
use crate::models::borough::Borough;
use crate::models::record::{CanonicalRecord, GeoPoint};

/// Per-attempt context handed to transformers.
#[derive(Debug, Clone)]
pub struct TransformContext {
    /// Strategy name stamped into each record's provenance
    pub provenance: String,
    /// Capture timestamp for rows that carry none of their own
    pub fetched_at: DateTime<Utc>,
}

/// Maps one raw upstream record into a canonical record.
pub trait RecordTransformer: Send + Sync {
    /// Short schema tag; prefixes natural record ids and appears in logs.
    fn schema(&self) -> &'static str;

    /// Transform one raw record or reject it with the reason.
    fn transform(
        &self,
        raw: &Value,
        ctx: &TransformContext,
    ) -> Result<CanonicalRecord, ValidationError>;
}

/// Outcome of transforming one fetched batch.
#[derive(Debug)]
pub struct TransformOutcome {
    /// Accepted records, in raw input order
    pub records: Vec<CanonicalRecord>,
    /// Raw records rejected with a validation error
    pub rejected: usize,
}

/// Run every raw item through the transformer.
///
/// Rejections are counted and logged, never propagated; one malformed row
/// must not cost the rest of the batch.
pub fn transform_batch(
    transformer: &dyn RecordTransformer,
    raws: &[Value],
    ctx: &TransformContext,
) -> TransformOutcome {
    let mut records = Vec::with_capacity(raws.len());
    let mut rejected = 0usize;

    for raw in raws {
        match transformer.transform(raw, ctx) {
            Ok(record) => records.push(record),
            Err(reason) => {
                rejected += 1;
                warn!(schema = transformer.schema(), %reason, "Rejected raw record");
            }
        }
    }

    TransformOutcome { records, rejected }
}

// ============================================================================
// Field helpers shared by the schema transformers
// ============================================================================

/// Read a string field, treating absent, null, and empty as missing.
pub(crate) fn str_field<'a>(raw: &'a Value, key: &str) -> Option<&'a str> {
    raw.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Read a numeric field. Row-oriented providers serialize numbers as
/// strings, so both representations are accepted.
pub(crate) fn f64_field(raw: &Value, key: &str) -> Option<f64> {
    raw.get(key).and_then(f64_value)
}

pub(crate) fn f64_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn require_str<'a>(
    raw: &'a Value,
    key: &'static str,
) -> Result<&'a str, ValidationError> {
    str_field(raw, key).ok_or(ValidationError::MissingField(key))
}

pub(crate) fn require_f64(raw: &Value, key: &'static str) -> Result<f64, ValidationError> {
    match raw.get(key) {
        None | Some(Value::Null) => Err(ValidationError::MissingField(key)),
        Some(value) => f64_value(value).ok_or_else(|| ValidationError::InvalidValue {
            field: key,
            detail: value.to_string(),
        }),
    }
}

/// Resolve a borough field or reject the record.
pub(crate) fn require_borough(raw: &Value, key: &'static str) -> Result<Borough, ValidationError> {
    let text = require_str(raw, key)?;
    Borough::canonicalize(text).ok_or_else(|| ValidationError::UnresolvedBorough(text.to_string()))
}

/// Row coordinates when the pair is complete, else the borough centroid.
pub(crate) fn location_or_centroid(
    borough: Borough,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> GeoPoint {
    match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => GeoPoint { latitude, longitude },
        _ => borough.centroid(),
    }
}

/// Parse a row timestamp, falling back to the fetch time.
///
/// Accepts RFC 3339, the offset-less timestamps row-oriented providers
/// emit, and bare dates in either ISO or US order.
pub(crate) fn captured_at(raw: &Value, key: &str, ctx: &TransformContext) -> DateTime<Utc> {
    str_field(raw, key)
        .and_then(parse_timestamp)
        .unwrap_or(ctx.fetched_at)
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%m/%d/%Y") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}
