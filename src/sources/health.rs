//! Community health transformers
//!
//! Two vintages of the community health survey publish the same content
//! under different field names, so each vintage gets its own transformer.
//! Both produce health indicator records with a required measurement.

use serde_json::Value;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::models::record::{CanonicalRecord, Measurement, RecordDetail};
use crate::sources::transform::{
    f64_field, location_or_centroid, require_borough, require_f64, require_str, str_field,
    RecordTransformer, TransformContext,
};

/// Current community health survey schema.
///
/// Rows look like:
/// `{"record_id": "...", "indicator_name": "Obesity among adults",
///   "borough": "Brooklyn", "data_value": "27.4",
///   "measure_unit": "percent of adults", "latitude": "...", ...}`
pub struct CommunityHealthTransformer;

impl RecordTransformer for CommunityHealthTransformer {
    fn schema(&self) -> &'static str {
        "chs"
    }

    fn transform(
        &self,
        raw: &Value,
        ctx: &TransformContext,
    ) -> Result<CanonicalRecord, ValidationError> {
        let indicator = require_str(raw, "indicator_name")?;
        let borough = require_borough(raw, "borough")?;
        let value = require_f64(raw, "data_value")?;
        let unit = require_str(raw, "measure_unit")?;

        let location = location_or_centroid(
            borough,
            f64_field(raw, "latitude"),
            f64_field(raw, "longitude"),
        );

        let id = match str_field(raw, "record_id") {
            Some(rid) => format!("chs-{}", rid),
            None => format!("chs-{}", Uuid::new_v4()),
        };

        Ok(CanonicalRecord {
            id,
            borough,
            location,
            measurement: Some(Measurement {
                value,
                unit: unit.to_string(),
            }),
            category: indicator.to_string(),
            provenance: ctx.provenance.clone(),
            captured_at: ctx.fetched_at,
            detail: RecordDetail::HealthIndicator,
        })
    }
}

/// Archived survey vintage. Same content as the current dataset, but the
/// indicator lives in `question`, the borough in `geo_name`, the value in
/// `value`/`units`, and rows never carry coordinates.
pub struct LegacyHealthSurveyTransformer;

impl RecordTransformer for LegacyHealthSurveyTransformer {
    fn schema(&self) -> &'static str {
        "chs-legacy"
    }

    fn transform(
        &self,
        raw: &Value,
        ctx: &TransformContext,
    ) -> Result<CanonicalRecord, ValidationError> {
        let question = require_str(raw, "question")?;
        let borough = require_borough(raw, "geo_name")?;
        let value = require_f64(raw, "value")?;
        let unit = require_str(raw, "units")?;

        let id = match str_field(raw, "item_id") {
            Some(item) => format!("chs-legacy-{}", item),
            None => format!("chs-legacy-{}", Uuid::new_v4()),
        };

        Ok(CanonicalRecord {
            id,
            borough,
            location: borough.centroid(),
            measurement: Some(Measurement {
                value,
                unit: unit.to_string(),
            }),
            category: question.to_string(),
            provenance: ctx.provenance.clone(),
            captured_at: ctx.fetched_at,
            detail: RecordDetail::HealthIndicator,
        })
    }
}
