//! Source configuration
//!
//! A source is a named, ordered list of strategies plus a synthetic target
//! size. Fallback order is data, not control flow: tests and logs can
//! inspect a chain without executing it, and swapping a provider means
//! editing a list.

pub mod catalog;
pub mod environment;
pub mod facilities;
pub mod fetch;
pub mod health;
pub mod transform;

use std::fmt;
use std::sync::Arc;

use crate::models::record::Domain;
use crate::sources::fetch::Fetcher;
use crate::sources::transform::RecordTransformer;

/// A named acquisition attempt: a fetch mechanism paired with the
/// transformer for that provider's schema.
#[derive(Clone)]
pub struct Strategy {
    pub name: String,
    pub fetcher: Arc<dyn Fetcher>,
    pub transformer: Arc<dyn RecordTransformer>,
}

impl Strategy {
    pub fn new(
        name: impl Into<String>,
        fetcher: Arc<dyn Fetcher>,
        transformer: Arc<dyn RecordTransformer>,
    ) -> Self {
        Self {
            name: name.into(),
            fetcher,
            transformer,
        }
    }
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strategy")
            .field("name", &self.name)
            .field("schema", &self.transformer.schema())
            .finish()
    }
}

/// One configured upstream source: an ordered fallback chain and the
/// synthetic record count used when the whole chain fails.
#[derive(Debug, Clone)]
pub struct SourceSpec {
    pub name: String,
    pub domain: Domain,
    pub strategies: Vec<Strategy>,
    pub synthetic_count: usize,
}
