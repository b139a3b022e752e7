//! Environmental transformers
//!
//! The primary and archive air quality datasets share one row-oriented
//! schema; the independent measurement network uses a different shape with
//! an envelope around the record array. Both compute an AQI per record, and
//! a row whose concentration cannot be scored is dropped, not passed
//! through unscored.

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::metrics::{aqi, aqi_for_name, MetricError, Pollutant};
use crate::models::record::{CanonicalRecord, GeoPoint, Measurement, RecordDetail};
use crate::sources::transform::{
    captured_at, require_borough, require_f64, require_str, str_field, RecordTransformer,
    TransformContext,
};

/// City air quality surveillance schema (current and archive vintages).
///
/// Rows look like:
/// `{"unique_id": "...", "name": "Fine particles (PM 2.5)",
///   "geo_place_name": "Bronx", "data_value": "8.5",
///   "measure_info": "mcg/m3", "start_date": "2022-01-01T00:00:00.000"}`
pub struct AirQualitySodaTransformer;

impl RecordTransformer for AirQualitySodaTransformer {
    fn schema(&self) -> &'static str {
        "aq"
    }

    fn transform(
        &self,
        raw: &Value,
        ctx: &TransformContext,
    ) -> Result<CanonicalRecord, ValidationError> {
        let name = require_str(raw, "name")?;
        let borough = require_borough(raw, "geo_place_name")?;
        let value = require_f64(raw, "data_value")?;
        let unit = require_str(raw, "measure_info")?;

        // The strategy's $where narrows rows to scoreable pollutants; this
        // is the safety net for rows that slip past it.
        let reading = aqi_for_name(name, value)?;

        let id = match str_field(raw, "unique_id") {
            Some(uid) => format!("aq-{}", uid),
            None => format!("aq-{}", Uuid::new_v4()),
        };

        Ok(CanonicalRecord {
            id,
            borough,
            location: borough.centroid(),
            measurement: Some(Measurement {
                value,
                unit: unit.to_string(),
            }),
            category: name.to_string(),
            provenance: ctx.provenance.clone(),
            captured_at: captured_at(raw, "start_date", ctx),
            detail: RecordDetail::EnvironmentalIndicator {
                aqi: Some(reading),
            },
        })
    }
}

/// Independent measurement network schema.
///
/// Rows arrive under a `results` envelope and look like:
/// `{"parameter": "pm25", "value": 8.3, "unit": "µg/m³",
///   "city": "Queens", "coordinates": {"latitude": ..., "longitude": ...},
///   "date": {"utc": "2024-05-01T12:00:00Z"}}`
pub struct OpenAqTransformer;

impl RecordTransformer for OpenAqTransformer {
    fn schema(&self) -> &'static str {
        "openaq"
    }

    fn transform(
        &self,
        raw: &Value,
        ctx: &TransformContext,
    ) -> Result<CanonicalRecord, ValidationError> {
        let parameter = require_str(raw, "parameter")?;
        let borough = require_borough(raw, "city")?;
        let value = require_f64(raw, "value")?;
        let unit = require_str(raw, "unit")?;

        let pollutant = Pollutant::from_name(parameter)
            .ok_or_else(|| MetricError::UnknownPollutant(parameter.to_string()))?;
        // Station sensors report occasional negative concentrations; those
        // rows are rejected here rather than scored.
        let reading = aqi(pollutant, value)?;

        let coordinates = raw.get("coordinates");
        let latitude = coordinates.and_then(|c| c.get("latitude")).and_then(Value::as_f64);
        let longitude = coordinates.and_then(|c| c.get("longitude")).and_then(Value::as_f64);
        let location = match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => GeoPoint { latitude, longitude },
            _ => borough.centroid(),
        };

        let utc = raw
            .get("date")
            .and_then(|d| d.get("utc"))
            .and_then(Value::as_str);
        let captured = utc
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|ts| ts.with_timezone(&Utc))
            .unwrap_or(ctx.fetched_at);

        Ok(CanonicalRecord {
            id: format!("openaq-{}", Uuid::new_v4()),
            borough,
            location,
            measurement: Some(Measurement {
                value,
                unit: unit.to_string(),
            }),
            category: pollutant.label().to_string(),
            provenance: ctx.provenance.clone(),
            captured_at: captured,
            detail: RecordDetail::EnvironmentalIndicator {
                aqi: Some(reading),
            },
        })
    }
}
