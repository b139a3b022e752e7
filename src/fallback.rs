//! Fallback chain execution
//!
//! One executor run per source per aggregation call. Strategies are tried
//! strictly in declared order; the first attempt whose batch yields accepted
//! records wins and later strategies are never contacted. A chain that
//! exhausts every strategy ends in synthetic records, so the executor never
//! propagates an upstream failure. The one thing that does escape is caller
//! cancellation, which aborts instead of falling back.

use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::models::record::{CanonicalRecord, SYNTHETIC_PROVENANCE};
use crate::sources::transform::{transform_batch, TransformContext};
use crate::sources::SourceSpec;
use crate::synthetic::SyntheticGenerator;

/// Everything one source produced in one aggregation call.
#[derive(Debug, Clone)]
pub struct SourceResult {
    /// Configured source name
    pub source: String,
    /// Accepted canonical records, raw order preserved
    pub records: Vec<CanonicalRecord>,
    /// Strategy that produced the records, or "synthetic"
    pub provenance: String,
    /// True when a strategy produced the records, false for synthetic
    pub live: bool,
    /// Raw records rejected while transforming the winning batch
    pub rejected: usize,
}

/// Marker for a run aborted by the caller's cancellation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

/// Walks one source's strategy chain.
pub struct FallbackExecutor {
    http: reqwest::Client,
    synthetic: SyntheticGenerator,
    attempt_timeout: Duration,
}

impl FallbackExecutor {
    pub fn new(
        http: reqwest::Client,
        synthetic: SyntheticGenerator,
        attempt_timeout: Duration,
    ) -> Self {
        Self {
            http,
            synthetic,
            attempt_timeout,
        }
    }

    /// Run the fallback chain for one source.
    ///
    /// Always returns a populated result: a timed-out, failed, or empty
    /// attempt advances the chain, and an exhausted chain falls back to the
    /// synthetic generator. Only caller cancellation aborts.
    pub async fn run(
        &self,
        spec: &SourceSpec,
        cancel: &CancellationToken,
    ) -> Result<SourceResult, Cancelled> {
        if cancel.is_cancelled() {
            return Err(Cancelled);
        }

        let fetched_at = Utc::now();

        for strategy in &spec.strategies {
            let attempt = tokio::select! {
                _ = cancel.cancelled() => return Err(Cancelled),
                attempt = tokio::time::timeout(
                    self.attempt_timeout,
                    strategy.fetcher.fetch(&self.http),
                ) => attempt,
            };

            let raws = match attempt {
                Err(_) => {
                    warn!(
                        source = %spec.name,
                        strategy = %strategy.name,
                        timeout = ?self.attempt_timeout,
                        "Strategy timed out"
                    );
                    continue;
                }
                Ok(Err(error)) => {
                    warn!(
                        source = %spec.name,
                        strategy = %strategy.name,
                        %error,
                        "Strategy failed"
                    );
                    continue;
                }
                Ok(Ok(raws)) => raws,
            };

            let ctx = TransformContext {
                provenance: strategy.name.clone(),
                fetched_at,
            };
            let outcome = transform_batch(strategy.transformer.as_ref(), &raws, &ctx);

            // An upstream page with nothing usable on it looks like an
            // outage to consumers; keep walking the chain.
            if outcome.records.is_empty() {
                warn!(
                    source = %spec.name,
                    strategy = %strategy.name,
                    raw = raws.len(),
                    rejected = outcome.rejected,
                    "Strategy produced no usable records"
                );
                continue;
            }

            info!(
                source = %spec.name,
                strategy = %strategy.name,
                records = outcome.records.len(),
                rejected = outcome.rejected,
                "Source fetched"
            );
            return Ok(SourceResult {
                source: spec.name.clone(),
                records: outcome.records,
                provenance: strategy.name.clone(),
                live: true,
                rejected: outcome.rejected,
            });
        }

        if cancel.is_cancelled() {
            return Err(Cancelled);
        }

        info!(
            source = %spec.name,
            count = spec.synthetic_count,
            "All strategies exhausted, generating synthetic records"
        );
        Ok(SourceResult {
            source: spec.name.clone(),
            records: self.synthetic.generate(spec, fetched_at),
            provenance: SYNTHETIC_PROVENANCE.to_string(),
            live: false,
            rejected: 0,
        })
    }
}
