//! Aggregation orchestration
//!
//! Fans out every configured source's fallback chain concurrently, waits for
//! all of them to settle, and assembles the consumer envelope. There is no
//! retry policy here; retries live inside each source's chain as fallback
//! strategies. One slow or dead source never blocks or fails the others.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::IngestConfig;
use crate::error::{AggregateError, ConfigError};
use crate::fallback::FallbackExecutor;
use crate::models::borough::Borough;
use crate::models::record::{CanonicalRecord, Domain};
use crate::sources::{catalog, SourceSpec};
use crate::synthetic::SyntheticGenerator;

/// Optional narrowing applied to the merged dataset.
///
/// Filters narrow records only. Every configured source still runs, so the
/// per-source liveness map always covers the full catalog.
#[derive(Debug, Clone, Default)]
pub struct AggregationFilter {
    pub boroughs: Option<Vec<Borough>>,
    pub domains: Option<Vec<Domain>>,
}

impl AggregationFilter {
    fn keep(&self, record: &CanonicalRecord) -> bool {
        if let Some(boroughs) = &self.boroughs {
            if !boroughs.contains(&record.borough) {
                return false;
            }
        }
        if let Some(domains) = &self.domains {
            if !domains.contains(&record.domain()) {
                return false;
            }
        }
        true
    }
}

/// Run metadata consumers receive alongside the records.
#[derive(Debug, Clone, Serialize)]
pub struct AggregationMetadata {
    /// Number of configured sources that ran
    pub source_count: usize,
    /// Source name to liveness: true for strategy data, false for synthetic
    pub per_source_live: HashMap<String, bool>,
    pub generated_at: DateTime<Utc>,
}

/// Consumer-facing envelope.
///
/// `success` stays true even when every source fell back to synthetic
/// records; the honest signal is the per-source liveness map. The only
/// failure a caller can observe is cancellation, which surfaces as an error
/// rather than an envelope.
#[derive(Debug, Clone, Serialize)]
pub struct AggregationResponse {
    pub success: bool,
    pub data: Vec<CanonicalRecord>,
    pub metadata: AggregationMetadata,
}

/// The acquisition layer's entry point: a source catalog plus the executor
/// that walks each source's chain.
pub struct Aggregator {
    executor: FallbackExecutor,
    sources: Vec<SourceSpec>,
}

impl Aggregator {
    /// Aggregator over the builtin source catalog.
    pub fn new(config: &IngestConfig) -> Result<Self, ConfigError> {
        let sources = catalog::builtin_sources(config);
        Self::with_sources(config, sources)
    }

    /// Aggregator over caller-supplied sources.
    pub fn with_sources(
        config: &IngestConfig,
        sources: Vec<SourceSpec>,
    ) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ConfigError::Invalid(format!("failed to build HTTP client: {}", e)))?;

        let synthetic = match config.synthetic_seed {
            Some(seed) => SyntheticGenerator::seeded(seed),
            None => SyntheticGenerator::new(),
        };

        Ok(Self {
            executor: FallbackExecutor::new(http, synthetic, config.request_timeout()),
            sources,
        })
    }

    /// Configured sources, in declaration order.
    pub fn sources(&self) -> &[SourceSpec] {
        &self.sources
    }

    /// Fetch-or-fall-back every source and merge the results.
    pub async fn aggregate(
        &self,
        filter: Option<AggregationFilter>,
    ) -> Result<AggregationResponse, AggregateError> {
        self.aggregate_with_cancel(filter, CancellationToken::new()).await
    }

    /// Like `aggregate`, racing the whole run against `cancel`.
    pub async fn aggregate_with_cancel(
        &self,
        filter: Option<AggregationFilter>,
        cancel: CancellationToken,
    ) -> Result<AggregationResponse, AggregateError> {
        let outcomes = join_all(
            self.sources
                .iter()
                .map(|spec| self.executor.run(spec, &cancel)),
        )
        .await;

        let mut data = Vec::new();
        let mut per_source_live = HashMap::with_capacity(self.sources.len());
        let mut rejected = 0usize;

        for outcome in outcomes {
            let result = outcome.map_err(|_| AggregateError::Cancelled)?;
            per_source_live.insert(result.source.clone(), result.live);
            rejected += result.rejected;
            data.extend(result.records);
        }

        let filter = filter.unwrap_or_default();
        data.retain(|record| filter.keep(record));

        info!(
            sources = self.sources.len(),
            live = per_source_live.values().filter(|live| **live).count(),
            records = data.len(),
            rejected,
            "Aggregation complete"
        );

        Ok(AggregationResponse {
            success: true,
            data,
            metadata: AggregationMetadata {
                source_count: self.sources.len(),
                per_source_live,
                generated_at: Utc::now(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::fetch::StaticFetcher;
    use crate::sources::health::CommunityHealthTransformer;
    use crate::sources::Strategy;
    use serde_json::json;
    use std::sync::Arc;

    fn config() -> IngestConfig {
        IngestConfig {
            synthetic_seed: Some(11),
            synthetic_records: 4,
            ..IngestConfig::default()
        }
    }

    fn static_health_source(name: &str, rows: Vec<serde_json::Value>) -> SourceSpec {
        SourceSpec {
            name: name.to_string(),
            domain: Domain::Health,
            strategies: vec![Strategy::new(
                format!("{}_static", name),
                Arc::new(StaticFetcher::new(rows)),
                Arc::new(CommunityHealthTransformer),
            )],
            synthetic_count: 4,
        }
    }

    fn health_row(borough: &str, value: &str) -> serde_json::Value {
        json!({
            "indicator_name": "Obesity among adults",
            "borough": borough,
            "data_value": value,
            "measure_unit": "percent of adults"
        })
    }

    #[tokio::test]
    async fn empty_catalog_aggregates_to_an_empty_envelope() {
        let aggregator = Aggregator::with_sources(&config(), Vec::new()).unwrap();
        let response = aggregator.aggregate(None).await.unwrap();
        assert!(response.success);
        assert!(response.data.is_empty());
        assert_eq!(response.metadata.source_count, 0);
        assert!(response.metadata.per_source_live.is_empty());
    }

    #[tokio::test]
    async fn filters_narrow_records_but_not_the_liveness_map() {
        let sources = vec![
            static_health_source("a", vec![health_row("Brooklyn", "20.0")]),
            static_health_source("b", vec![health_row("Queens", "21.0")]),
        ];
        let aggregator = Aggregator::with_sources(&config(), sources).unwrap();

        let filter = AggregationFilter {
            boroughs: Some(vec![Borough::Brooklyn]),
            domains: None,
        };
        let response = aggregator.aggregate(Some(filter)).await.unwrap();

        assert_eq!(response.data.len(), 1);
        assert_eq!(response.data[0].borough, Borough::Brooklyn);
        // Both sources ran and report liveness even though one was filtered out
        assert_eq!(response.metadata.per_source_live.len(), 2);
        assert_eq!(response.metadata.per_source_live["a"], true);
        assert_eq!(response.metadata.per_source_live["b"], true);
    }

    #[tokio::test]
    async fn domain_filter_drops_other_domains() {
        let sources = vec![static_health_source("a", vec![health_row("Bronx", "12.0")])];
        let aggregator = Aggregator::with_sources(&config(), sources).unwrap();

        let filter = AggregationFilter {
            boroughs: None,
            domains: Some(vec![Domain::Facility]),
        };
        let response = aggregator.aggregate(Some(filter)).await.unwrap();
        assert!(response.data.is_empty());
        assert_eq!(response.metadata.source_count, 1);
    }

    #[tokio::test]
    async fn pre_cancelled_token_surfaces_as_cancellation() {
        let sources = vec![static_health_source("a", vec![health_row("Bronx", "12.0")])];
        let aggregator = Aggregator::with_sources(&config(), sources).unwrap();

        let token = CancellationToken::new();
        token.cancel();
        let err = aggregator
            .aggregate_with_cancel(None, token)
            .await
            .unwrap_err();
        assert_eq!(err, AggregateError::Cancelled);
    }

    #[tokio::test]
    async fn envelope_serializes_with_the_published_field_names() {
        let sources = vec![static_health_source("a", vec![health_row("Queens", "24.1")])];
        let aggregator = Aggregator::with_sources(&config(), sources).unwrap();
        let response = aggregator.aggregate(None).await.unwrap();

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert!(json["data"].is_array());
        assert_eq!(json["metadata"]["source_count"], 1);
        assert_eq!(json["metadata"]["per_source_live"]["a"], true);
        assert!(json["metadata"]["generated_at"].is_string());
    }
}
