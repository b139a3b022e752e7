//! Facility directory transformer
//!
//! Facility rows carry no numeric observation; canonical facility records
//! therefore have no measurement, and their payload is the name plus
//! whatever contact fields the row legitimately provides. The bundled
//! snapshot in the catalog uses this same schema, so one transformer covers
//! both the live directory and the packaged fallback.

use serde_json::Value;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::models::record::{CanonicalRecord, RecordDetail};
use crate::sources::transform::{
    f64_field, location_or_centroid, require_borough, require_str, str_field, RecordTransformer,
    TransformContext,
};

/// Facility type used when the row omits its own description.
const DEFAULT_FACILITY_KIND: &str = "Health Facility";

/// State health facility directory schema.
///
/// Rows look like:
/// `{"facility_id": "1001", "facility_name": "Bellevue Hospital Center",
///   "short_description": "Hospital", "facility_county": "New York",
///   "facility_latitude": "40.7392", "facility_longitude": "-73.9766",
///   "facility_phone_number": "(212) 562-4141"}`
pub struct FacilityDirectoryTransformer;

impl RecordTransformer for FacilityDirectoryTransformer {
    fn schema(&self) -> &'static str {
        "fac"
    }

    fn transform(
        &self,
        raw: &Value,
        ctx: &TransformContext,
    ) -> Result<CanonicalRecord, ValidationError> {
        let name = require_str(raw, "facility_name")?;
        // The directory is state-wide and keyed by county; the county
        // aliases resolve the five city counties to their boroughs.
        let borough = require_borough(raw, "facility_county")?;

        let category = str_field(raw, "short_description").unwrap_or(DEFAULT_FACILITY_KIND);
        let location = location_or_centroid(
            borough,
            f64_field(raw, "facility_latitude"),
            f64_field(raw, "facility_longitude"),
        );

        let id = match str_field(raw, "facility_id") {
            Some(fid) => format!("fac-{}", fid),
            None => format!("fac-{}", Uuid::new_v4()),
        };

        Ok(CanonicalRecord {
            id,
            borough,
            location,
            measurement: None,
            category: category.to_string(),
            provenance: ctx.provenance.clone(),
            captured_at: ctx.fetched_at,
            detail: RecordDetail::Facility {
                name: name.to_string(),
                phone: str_field(raw, "facility_phone_number").map(str::to_string),
                hours: str_field(raw, "hours_of_operation").map(str::to_string),
            },
        })
    }
}
