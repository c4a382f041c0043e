use crate::api::json_headers;
use crate::constants::{REGISTER_URL, SDK_NAME, SDK_VERSION};
use crate::domain::RegistrationRequest;
use crate::utils::error::{Result, UnleashError};
use chrono::Utc;
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use tracing::{info, warn};

/// Registers this client instance with the Unleash server.
///
/// Returns `true` when the server answered `202 Accepted`; any failure is logged.
pub async fn register_client(
    http: &Client,
    url: &str,
    app_name: &str,
    instance_id: &str,
    metrics_interval_secs: u64,
    custom_headers: &HashMap<String, String>,
    supported_strategies: Vec<String>,
) -> bool {
    let request = RegistrationRequest {
        app_name: app_name.to_string(),
        instance_id: instance_id.to_string(),
        sdk_version: format!("{}:{}", SDK_NAME, SDK_VERSION),
        strategies: supported_strategies,
        started: Utc::now(),
        interval: metrics_interval_secs.saturating_mul(1000),
    };

    info!("Registering unleash client with unleash @ {}", url);
    match post_registration(http, url, &request, custom_headers).await {
        Ok(()) => {
            info!("Unleash Client successfully registered!");
            true
        }
        Err(e) => {
            warn!("Unleash Client registration failed: {}", e);
            false
        }
    }
}

async fn post_registration(
    http: &Client,
    url: &str,
    request: &RegistrationRequest,
    custom_headers: &HashMap<String, String>,
) -> Result<()> {
    let response = http
        .post(format!("{}{}", url, REGISTER_URL))
        .headers(json_headers(custom_headers)?)
        .json(request)
        .send()
        .await?;

    if response.status() != StatusCode::ACCEPTED {
        return Err(UnleashError::UnexpectedStatusError {
            endpoint: REGISTER_URL.to_string(),
            status: response.status().as_u16(),
        });
    }
    Ok(())
}
