#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::constants::{
    DEFAULT_ENVIRONMENT, DEFAULT_INSTANCE_ID, DEFAULT_METRICS_INTERVAL, DEFAULT_REFRESH_INTERVAL,
    MAX_INTERVAL,
};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Settings for [`crate::UnleashClient`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Unleash API base URL, e.g. `http://localhost:4242/api`.
    pub url: String,
    pub app_name: String,
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default = "default_instance_id")]
    pub instance_id: String,
    /// Seconds between feature refreshes.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,
    /// Seconds between metrics submissions.
    #[serde(default = "default_metrics_interval")]
    pub metrics_interval: u64,
    #[serde(default)]
    pub disable_metrics: bool,
    #[serde(default)]
    pub disable_registration: bool,
    #[serde(default)]
    pub custom_headers: HashMap<String, String>,
    /// Defaults to the platform cache directory.
    #[serde(default)]
    pub cache_directory: Option<PathBuf>,
}

fn default_environment() -> String {
    DEFAULT_ENVIRONMENT.to_string()
}

fn default_instance_id() -> String {
    DEFAULT_INSTANCE_ID.to_string()
}

fn default_refresh_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL
}

fn default_metrics_interval() -> u64 {
    DEFAULT_METRICS_INTERVAL
}

impl ClientConfig {
    pub fn new(url: impl Into<String>, app_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            app_name: app_name.into(),
            environment: default_environment(),
            instance_id: default_instance_id(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            metrics_interval: DEFAULT_METRICS_INTERVAL,
            disable_metrics: false,
            disable_registration: false,
            custom_headers: HashMap::new(),
            cache_directory: None,
        }
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    pub fn with_instance_id(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = instance_id.into();
        self
    }

    pub fn with_refresh_interval(mut self, seconds: u64) -> Self {
        self.refresh_interval = seconds;
        self
    }

    pub fn with_metrics_interval(mut self, seconds: u64) -> Self {
        self.metrics_interval = seconds;
        self
    }

    pub fn with_metrics_disabled(mut self, disabled: bool) -> Self {
        self.disable_metrics = disabled;
        self
    }

    pub fn with_registration_disabled(mut self, disabled: bool) -> Self {
        self.disable_registration = disabled;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.insert(name.into(), value.into());
        self
    }

    pub fn with_cache_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.cache_directory = Some(directory.into());
        self
    }

    /// 去掉結尾的斜線，之後直接接上 API 路徑
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(self.refresh_interval)
    }

    pub fn metrics_period(&self) -> Duration {
        Duration::from_secs(self.metrics_interval)
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("url", &self.url)?;
        validation::validate_non_empty_string("app_name", &self.app_name)?;
        validation::validate_non_empty_string("instance_id", &self.instance_id)?;
        validation::validate_number_range(
            "refresh_interval",
            self.refresh_interval,
            1,
            MAX_INTERVAL,
        )?;
        validation::validate_number_range(
            "metrics_interval",
            self.metrics_interval,
            1,
            MAX_INTERVAL,
        )?;
        validation::validate_headers("custom_headers", &self.custom_headers)?;
        if let Some(dir) = &self.cache_directory {
            validation::validate_cache_directory("cache_directory", dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("http://localhost:4242/api/", "my-app");
        assert_eq!(config.environment, "default");
        assert_eq!(config.instance_id, "unleash-client-rust");
        assert_eq!(config.refresh_period(), Duration::from_secs(15));
        assert_eq!(config.metrics_period(), Duration::from_secs(60));
        assert_eq!(config.base_url(), "http://localhost:4242/api");
        assert_ok!(config.validate());
    }

    #[test]
    fn test_validation_errors() {
        assert_err!(ClientConfig::new("localhost", "app").validate());
        assert_err!(ClientConfig::new("http://localhost", " ").validate());
        assert_err!(ClientConfig::new("http://localhost", "app")
            .with_refresh_interval(0)
            .validate());
        assert_err!(ClientConfig::new("http://localhost", "app")
            .with_header("bad header", "x")
            .validate());
    }

    #[test]
    fn test_interval_upper_bound() {
        assert_ok!(ClientConfig::new("http://localhost", "app")
            .with_metrics_interval(MAX_INTERVAL)
            .validate());
        assert_err!(ClientConfig::new("http://localhost", "app")
            .with_metrics_interval(u64::MAX / 100)
            .validate());
        assert_err!(ClientConfig::new("http://localhost", "app")
            .with_refresh_interval(MAX_INTERVAL + 1)
            .validate());
    }

    #[test]
    fn test_cache_directory_must_be_a_directory() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert_err!(ClientConfig::new("http://localhost", "app")
            .with_cache_directory(file.path())
            .validate());

        let dir = tempfile::TempDir::new().unwrap();
        assert_ok!(ClientConfig::new("http://localhost", "app")
            .with_cache_directory(dir.path())
            .validate());
    }
}
