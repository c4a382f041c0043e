use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::utils::error::{Result, UnleashError};

/// Evaluation context passed to `is_enabled`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub remote_address: Option<String>,
    pub app_name: Option<String>,
    pub environment: Option<String>,
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_remote_address(mut self, remote_address: impl Into<String>) -> Self {
        self.remote_address = Some(remote_address.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn user_id(&self) -> Result<&str> {
        self.user_id
            .as_deref()
            .ok_or_else(|| UnleashError::missing_context("userId"))
    }

    pub fn session_id(&self) -> Result<&str> {
        self.session_id
            .as_deref()
            .ok_or_else(|| UnleashError::missing_context("sessionId"))
    }

    pub fn remote_address(&self) -> Result<&str> {
        self.remote_address
            .as_deref()
            .ok_or_else(|| UnleashError::missing_context("remoteAddress"))
    }
}

/// Strategy parameters as sent by the server. Values are usually strings, but some
/// servers send numbers for `percentage`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(pub HashMap<String, serde_json::Value>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get_string(&self, strategy: &str, key: &str) -> Result<String> {
        match self.0.get(key) {
            Some(serde_json::Value::String(s)) => Ok(s.clone()),
            Some(serde_json::Value::Number(n)) => Ok(n.to_string()),
            Some(other) => Err(UnleashError::strategy(
                strategy,
                format!("parameter '{}' has unexpected type: {}", key, other),
            )),
            None => Err(UnleashError::strategy(
                strategy,
                format!("missing parameter '{}'", key),
            )),
        }
    }

    /// Splits a comma separated parameter, trimming each entry.
    pub fn get_list(&self, strategy: &str, key: &str) -> Result<Vec<String>> {
        Ok(self
            .get_string(strategy, key)?
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect())
    }

    pub fn get_percentage(&self, strategy: &str, key: &str) -> Result<u32> {
        let raw = self.get_string(strategy, key)?;
        raw.trim().parse::<u32>().map_err(|e| {
            UnleashError::strategy(
                strategy,
                format!("parameter '{}' is not a percentage ({}): {}", key, raw, e),
            )
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Parameters>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategies: Option<Vec<StrategyDefinition>>,
}

/// Body of `GET /client/features`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturesResponse {
    #[serde(default)]
    pub version: u32,
    pub features: Vec<FeatureDefinition>,
}

/// Body of `POST /client/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub app_name: String,
    pub instance_id: String,
    pub sdk_version: String,
    pub strategies: Vec<String>,
    pub started: DateTime<Utc>,
    /// Metrics interval in milliseconds.
    pub interval: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleStats {
    pub yes: u64,
    pub no: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsBucket {
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
    pub toggles: HashMap<String, ToggleStats>,
}

/// Body of `POST /client/metrics`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsRequest {
    pub app_name: String,
    pub instance_id: String,
    pub bucket: MetricsBucket,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_features_response() {
        let body = serde_json::json!({
            "version": 1,
            "features": [
                {
                    "name": "testFlag",
                    "description": "This is a test!",
                    "enabled": true,
                    "strategies": [
                        {"name": "default", "parameters": {}},
                        {"name": "gradualRolloutUserId", "parameters": {"percentage": "50", "groupId": "g"}}
                    ]
                },
                {"name": "bare", "enabled": false}
            ]
        });

        let response: FeaturesResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.features.len(), 2);
        assert_eq!(response.features[0].strategies.as_ref().unwrap().len(), 2);
        assert!(response.features[1].strategies.is_none());
    }

    #[test]
    fn test_parameters_accept_numbers_and_strings() {
        let params = Parameters::new()
            .with("percentage", 42)
            .with("other", "17");
        assert_eq!(params.get_percentage("s", "percentage").unwrap(), 42);
        assert_eq!(params.get_percentage("s", "other").unwrap(), 17);
        assert!(params.get_percentage("s", "missing").is_err());
    }

    #[test]
    fn test_parameters_list_is_trimmed() {
        let params = Parameters::new().with("userIds", " a@x.com, b@x.com ,,c@x.com");
        assert_eq!(
            params.get_list("userWithId", "userIds").unwrap(),
            vec!["a@x.com", "b@x.com", "c@x.com"]
        );
    }

    #[test]
    fn test_metrics_request_wire_format() {
        let now = Utc::now();
        let mut toggles = HashMap::new();
        toggles.insert("flag".to_string(), ToggleStats { yes: 2, no: 1 });
        let request = MetricsRequest {
            app_name: "app".to_string(),
            instance_id: "1".to_string(),
            bucket: MetricsBucket {
                start: now,
                stop: now,
                toggles,
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["appName"], "app");
        assert_eq!(value["instanceId"], "1");
        assert_eq!(value["bucket"]["toggles"]["flag"]["yes"], 2);
        assert_eq!(value["bucket"]["toggles"]["flag"]["no"], 1);
    }
}
