//! boropulse: data acquisition and normalization for the BoroPulse civic
//! dashboard.
//!
//! The layer sits between unreliable public data providers and everything
//! downstream, and owns four guarantees:
//!
//! - every record that leaves it is canonical: typed borough, value paired
//!   with a named unit, provenance, capture timestamp;
//! - each source walks an ordered fallback chain and never errors upward;
//! - sources are fetched concurrently and fail independently;
//! - when a source's whole chain is down, consumers receive schema-valid
//!   synthetic records, flagged per source in the response metadata.
//!
//! ```no_run
//! use boropulse::{Aggregator, IngestConfig};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = IngestConfig::load(None)?;
//! let aggregator = Aggregator::new(&config)?;
//! let response = aggregator.aggregate(None).await?;
//! for (source, live) in &response.metadata.per_source_live {
//!     println!("{}: {}", source, if *live { "live" } else { "synthetic" });
//! }
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod config;
pub mod error;
pub mod fallback;
pub mod metrics;
pub mod models;
pub mod sources;
pub mod synthetic;

pub use crate::aggregate::{
    AggregationFilter, AggregationMetadata, AggregationResponse, Aggregator,
};
pub use crate::config::IngestConfig;
pub use crate::error::{AggregateError, ConfigError, FetchError, ValidationError};
pub use crate::fallback::{Cancelled, FallbackExecutor, SourceResult};
pub use crate::metrics::{aqi, aqi_for_name, AirQualityReading, AqiCategory, MetricError, Pollutant};
pub use crate::models::borough::Borough;
pub use crate::models::record::{
    CanonicalRecord, Domain, GeoPoint, Measurement, RecordDetail, SYNTHETIC_PROVENANCE,
};
pub use crate::sources::{SourceSpec, Strategy};
pub use crate::synthetic::SyntheticGenerator;
