//! Minimal configuration types for fundsearch core
//!
//! Core only accepts fully resolved, validated configuration.
//! All discovery, loading, and merging happens in CLI layer.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Quiet period before a typed query is committed
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

const DEFAULT_SEARCH_PATH: &str = "search";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Settings for a search session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Debounce quiet period in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Cap on the number of eligible funds shown (no cap when absent)
    #[serde(default)]
    pub max_results: Option<usize>,
    /// Remote search endpoint, absent when an offline catalog is used
    #[serde(default)]
    pub endpoint: Option<EndpointConfig>,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            max_results: None,
            endpoint: None,
        }
    }
}

impl SearchConfig {
    /// Debounce quiet period as a duration
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Set the debounce quiet period
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// Set the result cap
    pub fn with_max_results(mut self, max_results: Option<usize>) -> Self {
        self.max_results = max_results;
        self
    }

    /// Set the remote endpoint
    pub fn with_endpoint(mut self, endpoint: EndpointConfig) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_results == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "max_results".to_string(),
                value: "0".to_string(),
            });
        }

        if let Some(endpoint) = &self.endpoint {
            endpoint.validate()?;
        }

        Ok(())
    }
}

/// A fully resolved remote search endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Base URL of the fund service
    pub base_url: String,
    /// Path of the search resource, relative to the base URL
    #[serde(default = "default_search_path")]
    pub search_path: String,
    /// Transport timeout for one lookup in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Additional headers for requests
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_search_path() -> String {
    DEFAULT_SEARCH_PATH.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl EndpointConfig {
    /// Create an endpoint config with default path and timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            search_path: default_search_path(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            headers: HashMap::new(),
        }
    }

    /// Add a header
    pub fn with_header(mut self, key: String, value: String) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Add multiple headers
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Transport timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "base_url".to_string(),
            });
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "base_url".to_string(),
                value: self.base_url.clone(),
            });
        }

        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_ms".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(())
    }
}
