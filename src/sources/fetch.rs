//! Fetch mechanisms behind the strategy seam
//!
//! A strategy's fetcher produces raw JSON items and knows nothing about
//! record schemas. HTTP strategies carry their own locator, query
//! parameters, and headers; fixed-data strategies return a bundled literal.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::FetchError;

/// Longest upstream body snippet carried inside an HTTP error.
const ERROR_BODY_LIMIT: usize = 200;

/// Mechanism that produces the raw items for one strategy attempt.
///
/// Implementations only classify their own failure; the fallback executor
/// owns timeouts, cancellation, and the decision to advance the chain.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, http: &reqwest::Client) -> Result<Vec<Value>, FetchError>;
}

/// HTTP GET against a JSON endpoint that returns an array of records,
/// either at the response root (SODA-style providers) or under an
/// envelope key.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    url: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    items_key: Option<&'static str>,
}

impl HttpFetcher {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            items_key: None,
        }
    }

    /// Append a query parameter. Repeated keys are sent repeatedly, which
    /// is how some providers accept multi-valued filters.
    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Attach a request header (application tokens and the like).
    pub fn with_header(mut self, key: &str, value: impl Into<String>) -> Self {
        self.headers.push((key.to_string(), value.into()));
        self
    }

    /// Read the record array from `key` in a wrapper object instead of the
    /// response root.
    pub fn with_items_key(mut self, key: &'static str) -> Self {
        self.items_key = Some(key);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, http: &reqwest::Client) -> Result<Vec<Value>, FetchError> {
        debug!(url = %self.url, "Fetching records");

        let mut request = http.get(&self.url).query(&self.query);
        for (key, value) in &self.headers {
            request = request.header(key.as_str(), value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Http {
                status: status.as_u16(),
                body: snippet(&body),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| FetchError::Schema(e.to_string()))?;

        let items = match self.items_key {
            Some(key) => body.get(key).cloned().unwrap_or(Value::Null),
            None => body,
        };

        match items {
            Value::Array(items) => Ok(items),
            other => Err(FetchError::Schema(format!(
                "expected a JSON array of records, got {}",
                json_kind(&other)
            ))),
        }
    }
}

/// Fixed-data strategy: always succeeds with a bundled literal.
///
/// Chains that should degrade in steps end in one of these ahead of the
/// synthetic generator, so a packaged snapshot outranks invented data.
#[derive(Debug, Clone)]
pub struct StaticFetcher {
    items: Vec<Value>,
}

impl StaticFetcher {
    pub fn new(items: Vec<Value>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, _http: &reqwest::Client) -> Result<Vec<Value>, FetchError> {
        Ok(self.items.clone())
    }
}

fn snippet(body: &str) -> String {
    if body.len() <= ERROR_BODY_LIMIT {
        return body.to_string();
    }
    let mut end = ERROR_BODY_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
