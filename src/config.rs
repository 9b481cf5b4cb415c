use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{IconError, Result};
use crate::fetcher::DEFAULT_CONCURRENCY;

/// Configuration for fetching icons over HTTP.
///
/// Missing fields take their default values when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Number of icons fetched at once; zero selects the default of 10.
    pub concurrency: usize,
    /// Overall timeout for a single icon request, in seconds.
    pub timeout_secs: u64,
    /// Value of the `User-Agent` header sent with each request.
    pub user_agent: String,
    /// Maximum accepted icon size in bytes.
    pub max_icon_size: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout_secs: 30,
            user_agent: format!("iconfetch/{}", env!("CARGO_PKG_VERSION")),
            max_icon_size: 1_048_576,
        }
    }
}

impl FetcherConfig {
    /// Parses a configuration from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| IconError::Config {
            message: format!("failed to parse config: {}", e),
        })
    }
}

/// Loads the configuration from a JSON file.
///
/// If the file does not exist, returns the default configuration.
pub fn load_config(path: &Path) -> Result<FetcherConfig> {
    if !path.exists() {
        return Ok(FetcherConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(|e| IconError::Config {
        message: format!("failed to read config file '{}': {}", path.display(), e),
    })?;

    serde_json::from_str(&contents).map_err(|e| IconError::Config {
        message: format!("failed to parse config file '{}': {}", path.display(), e),
    })
}
