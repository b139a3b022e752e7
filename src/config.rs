//! Runtime configuration
//!
//! A small TOML file over compiled defaults. Resolution order: explicit
//! path, then the BOROPULSE_CONFIG environment variable, then defaults.
//! BOROPULSE_APP_TOKEN overrides the file's provider token so deployments
//! can keep credentials out of config files.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ConfigError;

/// Environment variable naming a config file to load.
pub const CONFIG_PATH_ENV: &str = "BOROPULSE_CONFIG";
/// Environment variable overriding `app_token`.
pub const APP_TOKEN_ENV: &str = "BOROPULSE_APP_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    /// Per-attempt timeout for strategy fetches, in seconds
    pub request_timeout_secs: u64,
    /// Row cap requested from row-oriented providers ($limit)
    pub row_limit: u32,
    /// Records the synthetic generator produces for a fallen-back source
    pub synthetic_records: usize,
    /// Provider application token, sent as X-App-Token when present
    pub app_token: Option<String>,
    /// Seed for the synthetic generator; entropy-seeded when absent
    pub synthetic_seed: Option<u64>,
    /// User-Agent for upstream requests
    pub user_agent: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 8,
            row_limit: 500,
            synthetic_records: 25,
            app_token: None,
            synthetic_seed: None,
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    format!("boropulse/{}", env!("CARGO_PKG_VERSION"))
}

impl IngestConfig {
    /// Resolve configuration.
    ///
    /// An explicit `path` wins; otherwise BOROPULSE_CONFIG names the file;
    /// otherwise compiled defaults apply. BOROPULSE_APP_TOKEN overrides the
    /// resolved token last.
    pub fn load(path: Option<&Path>) -> Result<IngestConfig, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match std::env::var(CONFIG_PATH_ENV) {
                Ok(env_path) => Self::from_file(Path::new(&env_path))?,
                Err(_) => {
                    debug!("No config file; using compiled defaults");
                    IngestConfig::default()
                }
            },
        };

        if let Ok(token) = std::env::var(APP_TOKEN_ENV) {
            if token.trim().is_empty() {
                warn!("{} is set but empty; ignoring it", APP_TOKEN_ENV);
            } else {
                config.app_token = Some(token);
            }
        }

        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<IngestConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let config = toml::from_str(&content)
            .map_err(|e| ConfigError::Invalid(format!("{}: {}", path.display(), e)))?;
        info!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be nonzero".to_string(),
            ));
        }
        if self.synthetic_records == 0 {
            // Zero would let an exhausted chain hand consumers an empty
            // dataset, which the synthetic fallback exists to prevent.
            return Err(ConfigError::Invalid(
                "synthetic_records must be nonzero".to_string(),
            ));
        }
        if self.row_limit == 0 {
            return Err(ConfigError::Invalid("row_limit must be nonzero".to_string()));
        }
        Ok(())
    }

    /// Per-attempt timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
