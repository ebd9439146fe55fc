//! Configuration for the route registry client.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::ConfigError;

/// Where and how to reach the route registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Base URL of the registry, e.g. `https://cms.internal`.
    pub host: String,
    /// Path of the route lookup endpoint.
    #[serde(default = "default_routes_path")]
    pub routes_path: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Additional headers sent with every lookup.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_routes_path() -> String {
    "/routes".to_string()
}

fn default_timeout() -> f64 {
    10.0
}

fn default_user_agent() -> String {
    "cmsrender/0.1".to_string()
}

impl RegistryConfig {
    /// Creates a configuration for `host` with defaults.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            routes_path: default_routes_path(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
            headers: HashMap::new(),
        }
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the routes path.
    #[must_use]
    pub fn with_routes_path(mut self, path: impl Into<String>) -> Self {
        self.routes_path = path.into();
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Gets timeout as Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_seconds.max(0.0))
    }

    /// Returns the lookup endpoint without its query string.
    #[must_use]
    pub fn routes_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if self.routes_path.starts_with('/') {
            format!("{host}{}", self.routes_path)
        } else {
            format!("{host}/{}", self.routes_path)
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(ConfigError::InvalidRegistry(
                "a route registry host is required".to_string(),
            ));
        }
        if !(host.starts_with("http://") || host.starts_with("https://")) {
            return Err(ConfigError::InvalidRegistry(format!(
                "host '{host}' must be an absolute http(s) URL"
            )));
        }
        if !self.timeout_seconds.is_finite() || self.timeout_seconds <= 0.0 {
            return Err(ConfigError::InvalidRegistry(format!(
                "timeout must be positive, got {}",
                self.timeout_seconds
            )));
        }
        Ok(())
    }
}
