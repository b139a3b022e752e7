//! Mock upstream providers
//!
//! Throwaway HTTP servers that impersonate the public data providers:
//! fixed JSON bodies, error statuses, slow responses, and header checks.

use axum::Router;
use serde_json::{json, Value};

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn spawn_provider(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve mock provider");
    });
    format!("http://{}", addr)
}

/// A URL nothing listens on, for connection-refused strategies.
pub fn unreachable_url() -> String {
    // Port 9 (discard) is a safe dead end on test machines
    "http://127.0.0.1:9/rows.json".to_string()
}

/// Well-formed community health rows in the current survey schema.
pub fn health_rows() -> Value {
    json!([
        {
            "record_id": "7781",
            "indicator_name": "Obesity among adults",
            "borough": "Brooklyn",
            "data_value": "27.4",
            "measure_unit": "percent of adults"
        },
        {
            "record_id": "7782",
            "indicator_name": "Obesity among adults",
            "borough": "Manhattan",
            "data_value": "17.9",
            "measure_unit": "percent of adults"
        },
        {
            "record_id": "7783",
            "indicator_name": "Flu vaccination in the past year",
            "borough": "Queens",
            "data_value": "48.2",
            "measure_unit": "percent of adults"
        }
    ])
}

/// Air quality surveillance rows, one per pollutant.
pub fn air_quality_rows() -> Value {
    json!([
        {
            "unique_id": "212669",
            "name": "Fine particles (PM 2.5)",
            "geo_place_name": "Bronx",
            "data_value": "8.5",
            "measure_info": "mcg/m3",
            "start_date": "2022-01-01T00:00:00.000"
        },
        {
            "unique_id": "212843",
            "name": "Ozone (O3)",
            "geo_place_name": "Staten Island",
            "data_value": "31.2",
            "measure_info": "ppb",
            "start_date": "2022-06-01T00:00:00.000"
        }
    ])
}

/// Facility directory rows in the state schema.
pub fn facility_rows() -> Value {
    json!([
        {
            "facility_id": "1001",
            "facility_name": "Bellevue Hospital Center",
            "short_description": "Hospital",
            "facility_county": "New York",
            "facility_latitude": "40.7392",
            "facility_longitude": "-73.9766",
            "facility_phone_number": "(212) 562-4141"
        },
        {
            "facility_id": "1306",
            "facility_name": "Elmhurst Hospital Center",
            "short_description": "Hospital",
            "facility_county": "Queens",
            "facility_latitude": "40.7447",
            "facility_longitude": "-73.8860",
            "facility_phone_number": "(718) 334-4000"
        }
    ])
}
