//! Builtin source catalog
//!
//! The production wiring: which providers each source queries, in what
//! order, and through which transformer. Swapping a provider means swapping
//! a strategy in a list here, never touching the executor.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::config::IngestConfig;
use crate::models::record::Domain;
use crate::sources::environment::{AirQualitySodaTransformer, OpenAqTransformer};
use crate::sources::facilities::FacilityDirectoryTransformer;
use crate::sources::fetch::{HttpFetcher, StaticFetcher};
use crate::sources::health::{CommunityHealthTransformer, LegacyHealthSurveyTransformer};
use crate::sources::{SourceSpec, Strategy};

const COMMUNITY_HEALTH_URL: &str = "https://data.cityofnewyork.us/resource/w9ga-8bhq.json";
const COMMUNITY_HEALTH_ARCHIVE_URL: &str = "https://data.cityofnewyork.us/resource/6p2r-w3sk.json";
const AIR_QUALITY_URL: &str = "https://data.cityofnewyork.us/resource/c3uy-2p5r.json";
const AIR_QUALITY_ARCHIVE_URL: &str = "https://data.cityofnewyork.us/resource/ah89-62h9.json";
const OPENAQ_URL: &str = "https://api.openaq.org/v2/measurements";
const FACILITY_DIRECTORY_URL: &str = "https://health.data.ny.gov/resource/vn5v-hh5r.json";

/// Rows the air quality strategies ask for; anything else would be dropped
/// by the transformer as unscoreable.
const AIR_QUALITY_WHERE: &str = "name in('Fine particles (PM 2.5)','Ozone (O3)')";

/// Counties the state facility directory is narrowed to.
const FACILITY_WHERE: &str =
    "facility_county in('New York','Kings','Queens','Bronx','Richmond')";

/// The sources the dashboard ships with, in display order.
pub fn builtin_sources(config: &IngestConfig) -> Vec<SourceSpec> {
    vec![
        community_health(config),
        air_quality(config),
        health_facilities(config),
    ]
}

/// Row-oriented provider fetcher with the shared paging and auth setup.
fn soda(config: &IngestConfig, url: &str) -> HttpFetcher {
    let mut fetcher = HttpFetcher::new(url).with_query("$limit", config.row_limit);
    if let Some(token) = &config.app_token {
        fetcher = fetcher.with_header("X-App-Token", token.clone());
    }
    fetcher
}

fn community_health(config: &IngestConfig) -> SourceSpec {
    SourceSpec {
        name: "community_health".to_string(),
        domain: Domain::Health,
        strategies: vec![
            Strategy::new(
                "chs_current",
                Arc::new(soda(config, COMMUNITY_HEALTH_URL).with_query("$order", "indicator_name")),
                Arc::new(CommunityHealthTransformer),
            ),
            Strategy::new(
                "chs_archive",
                Arc::new(
                    soda(config, COMMUNITY_HEALTH_ARCHIVE_URL).with_query("$order", "question"),
                ),
                Arc::new(LegacyHealthSurveyTransformer),
            ),
        ],
        synthetic_count: config.synthetic_records,
    }
}

fn air_quality(config: &IngestConfig) -> SourceSpec {
    SourceSpec {
        name: "air_quality".to_string(),
        domain: Domain::Environment,
        strategies: vec![
            Strategy::new(
                "air_quality_current",
                Arc::new(
                    soda(config, AIR_QUALITY_URL)
                        .with_query("$where", AIR_QUALITY_WHERE)
                        .with_query("$order", "start_date DESC"),
                ),
                Arc::new(AirQualitySodaTransformer),
            ),
            Strategy::new(
                "air_quality_archive",
                Arc::new(
                    soda(config, AIR_QUALITY_ARCHIVE_URL)
                        .with_query("$where", AIR_QUALITY_WHERE)
                        .with_query("$order", "start_date DESC"),
                ),
                Arc::new(AirQualitySodaTransformer),
            ),
            Strategy::new(
                "openaq",
                Arc::new(
                    HttpFetcher::new(OPENAQ_URL)
                        .with_query("city", "New York")
                        .with_query("parameter", "pm25")
                        .with_query("parameter", "o3")
                        .with_query("limit", config.row_limit)
                        .with_items_key("results"),
                ),
                Arc::new(OpenAqTransformer),
            ),
        ],
        synthetic_count: config.synthetic_records,
    }
}

fn health_facilities(config: &IngestConfig) -> SourceSpec {
    SourceSpec {
        name: "health_facilities".to_string(),
        domain: Domain::Facility,
        strategies: vec![
            Strategy::new(
                "facility_directory",
                Arc::new(
                    soda(config, FACILITY_DIRECTORY_URL)
                        .with_query("$where", FACILITY_WHERE)
                        .with_query("$order", "facility_name"),
                ),
                Arc::new(FacilityDirectoryTransformer),
            ),
            // Packaged snapshot outranks invented data when the live
            // directory is down.
            Strategy::new(
                "bundled_directory",
                Arc::new(StaticFetcher::new(bundled_facility_snapshot())),
                Arc::new(FacilityDirectoryTransformer),
            ),
        ],
        synthetic_count: config.synthetic_records,
    }
}

/// Trimmed snapshot of the public hospital directory, two or three
/// facilities per borough.
fn bundled_facility_snapshot() -> Vec<Value> {
    vec![
        json!({
            "facility_id": "1001",
            "facility_name": "Bellevue Hospital Center",
            "short_description": "Hospital",
            "facility_county": "New York",
            "facility_latitude": "40.7392",
            "facility_longitude": "-73.9766",
            "facility_phone_number": "(212) 562-4141"
        }),
        json!({
            "facility_id": "1005",
            "facility_name": "Harlem Hospital Center",
            "short_description": "Hospital",
            "facility_county": "New York",
            "facility_latitude": "40.8145",
            "facility_longitude": "-73.9425",
            "facility_phone_number": "(212) 939-1000"
        }),
        json!({
            "facility_id": "1178",
            "facility_name": "Kings County Hospital Center",
            "short_description": "Hospital",
            "facility_county": "Kings",
            "facility_latitude": "40.6554",
            "facility_longitude": "-73.9447",
            "facility_phone_number": "(718) 245-3131"
        }),
        json!({
            "facility_id": "1186",
            "facility_name": "Woodhull Medical Center",
            "short_description": "Hospital",
            "facility_county": "Kings",
            "facility_latitude": "40.7004",
            "facility_longitude": "-73.9418",
            "facility_phone_number": "(718) 963-8000"
        }),
        json!({
            "facility_id": "1294",
            "facility_name": "Coney Island Hospital",
            "short_description": "Hospital",
            "facility_county": "Kings",
            "facility_latitude": "40.5856",
            "facility_longitude": "-73.9647",
            "facility_phone_number": "(718) 616-3000"
        }),
        json!({
            "facility_id": "1306",
            "facility_name": "Elmhurst Hospital Center",
            "short_description": "Hospital",
            "facility_county": "Queens",
            "facility_latitude": "40.7447",
            "facility_longitude": "-73.8860",
            "facility_phone_number": "(718) 334-4000"
        }),
        json!({
            "facility_id": "1309",
            "facility_name": "Queens Hospital Center",
            "short_description": "Hospital",
            "facility_county": "Queens",
            "facility_latitude": "40.7184",
            "facility_longitude": "-73.8076",
            "facility_phone_number": "(718) 883-3000"
        }),
        json!({
            "facility_id": "1165",
            "facility_name": "Lincoln Medical Center",
            "short_description": "Hospital",
            "facility_county": "Bronx",
            "facility_latitude": "40.8161",
            "facility_longitude": "-73.9262",
            "facility_phone_number": "(718) 579-5000"
        }),
        json!({
            "facility_id": "1169",
            "facility_name": "Jacobi Medical Center",
            "short_description": "Hospital",
            "facility_county": "Bronx",
            "facility_latitude": "40.8570",
            "facility_longitude": "-73.8458",
            "facility_phone_number": "(718) 918-5000"
        }),
        json!({
            "facility_id": "1737",
            "facility_name": "Sea View Hospital Rehabilitation Center",
            "short_description": "Nursing Home",
            "facility_county": "Richmond",
            "facility_latitude": "40.5880",
            "facility_longitude": "-74.1350",
            "facility_phone_number": "(718) 317-3000"
        }),
        json!({
            "facility_id": "1740",
            "facility_name": "Richmond University Medical Center",
            "short_description": "Hospital",
            "facility_county": "Richmond",
            "facility_latitude": "40.6357",
            "facility_longitude": "-74.1181",
            "facility_phone_number": "(718) 818-1234"
        }),
    ]
}
