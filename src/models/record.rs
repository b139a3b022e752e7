//! Canonical record types
//!
//! Everything downstream of the acquisition layer consumes these shapes.
//! A record is canonical when its borough is typed, its measurement pairs a
//! value with a named unit, and its provenance names the strategy (or
//! "synthetic") that produced it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::metrics::AirQualityReading;
use crate::models::borough::Borough;

/// Provenance tag carried by generator-produced records.
pub const SYNTHETIC_PROVENANCE: &str = "synthetic";

/// Domain a source belongs to. Selects the canonical payload variant and
/// the synthetic template family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Health,
    Environment,
    Facility,
}

/// WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// A numeric observation and the unit it is expressed in.
///
/// One struct rather than two fields so a value can never appear without
/// its unit, or a unit without its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: f64,
    pub unit: String,
}

/// Domain-specific payload, one variant per canonical record type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordDetail {
    HealthIndicator,
    EnvironmentalIndicator {
        /// Derived AQI; absent when the row carried no computable
        /// concentration
        #[serde(skip_serializing_if = "Option::is_none")]
        aqi: Option<AirQualityReading>,
    },
    Facility {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        phone: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        hours: Option<String>,
    },
}

impl RecordDetail {
    pub fn domain(&self) -> Domain {
        match self {
            RecordDetail::HealthIndicator => Domain::Health,
            RecordDetail::EnvironmentalIndicator { .. } => Domain::Environment,
            RecordDetail::Facility { .. } => Domain::Facility,
        }
    }
}

/// One normalized, schema-valid data point, independent of its origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Stable identifier, unique within one aggregation run
    pub id: String,
    /// Typed borough tag; never free text
    pub borough: Borough,
    /// Coordinates, or the borough centroid when the source omitted them
    pub location: GeoPoint,
    /// Numeric observation; absent for records with no numeric payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurement: Option<Measurement>,
    /// Category tag: indicator name, pollutant label, or facility type
    pub category: String,
    /// Name of the strategy that produced the record, or "synthetic"
    pub provenance: String,
    /// When the data point was captured: the row's own timestamp when the
    /// source provides one, otherwise the fetch time
    pub captured_at: DateTime<Utc>,
    #[serde(flatten)]
    pub detail: RecordDetail,
}

impl CanonicalRecord {
    pub fn domain(&self) -> Domain {
        self.detail.domain()
    }
}
