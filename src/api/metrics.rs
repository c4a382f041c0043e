use crate::api::json_headers;
use crate::constants::METRICS_URL;
use crate::domain::MetricsRequest;
use crate::utils::error::{Result, UnleashError};
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use tracing::{info, warn};

/// Posts a metrics bucket. Returns `true` on `202 Accepted`.
pub async fn send_metrics(
    http: &Client,
    url: &str,
    request: &MetricsRequest,
    custom_headers: &HashMap<String, String>,
) -> bool {
    info!("Sending metrics to unleash @ {}", url);
    match post_metrics(http, url, request, custom_headers).await {
        Ok(()) => {
            info!("Unleash Client metrics successfully sent!");
            true
        }
        Err(e) => {
            warn!("Unleash Client metrics submission failed: {}", e);
            false
        }
    }
}

async fn post_metrics(
    http: &Client,
    url: &str,
    request: &MetricsRequest,
    custom_headers: &HashMap<String, String>,
) -> Result<()> {
    let response = http
        .post(format!("{}{}", url, METRICS_URL))
        .headers(json_headers(custom_headers)?)
        .json(request)
        .send()
        .await?;

    if response.status() != StatusCode::ACCEPTED {
        return Err(UnleashError::UnexpectedStatusError {
            endpoint: METRICS_URL.to_string(),
            status: response.status().as_u16(),
        });
    }
    Ok(())
}
