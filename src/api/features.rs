use crate::api::build_headers;
use crate::constants::{APP_NAME_HEADER, FEATURES_URL, INSTANCE_ID_HEADER};
use crate::domain::FeaturesResponse;
use crate::utils::error::{Result, UnleashError};
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use tracing::{info, warn};

/// Fetches the feature provisioning. `None` means the fetch failed and was logged.
pub async fn get_feature_toggles(
    http: &Client,
    url: &str,
    app_name: &str,
    instance_id: &str,
    custom_headers: &HashMap<String, String>,
) -> Option<FeaturesResponse> {
    info!("Getting feature flags from {}", url);
    match fetch_features(http, url, app_name, instance_id, custom_headers).await {
        Ok(response) => Some(response),
        Err(e) => {
            warn!("Unleash feature fetch failed: {}", e);
            None
        }
    }
}

async fn fetch_features(
    http: &Client,
    url: &str,
    app_name: &str,
    instance_id: &str,
    custom_headers: &HashMap<String, String>,
) -> Result<FeaturesResponse> {
    let headers = build_headers(
        custom_headers,
        &[(APP_NAME_HEADER, app_name), (INSTANCE_ID_HEADER, instance_id)],
    )?;

    let response = http
        .get(format!("{}{}", url, FEATURES_URL))
        .headers(headers)
        .send()
        .await?;

    if response.status() != StatusCode::OK {
        return Err(UnleashError::UnexpectedStatusError {
            endpoint: FEATURES_URL.to_string(),
            status: response.status().as_u16(),
        });
    }

    Ok(response.json::<FeaturesResponse>().await?)
}
