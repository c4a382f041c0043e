pub mod features;
pub mod metrics;
pub mod register;

pub use features::get_feature_toggles;
pub use metrics::send_metrics;
pub use register::register_client;

use crate::constants::{CONTENT_TYPE_JSON, REQUEST_TIMEOUT};
use crate::utils::error::{Result, UnleashError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::collections::HashMap;

/// HTTP client shared by all Unleash calls.
pub fn build_http_client() -> Result<Client> {
    Ok(Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

/// Custom headers first, then `extra`, so protocol headers always win.
pub(crate) fn build_headers(
    custom_headers: &HashMap<String, String>,
    extra: &[(&str, &str)],
) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (name, value) in custom_headers {
        insert_header(&mut headers, name, value)?;
    }
    for (name, value) in extra {
        insert_header(&mut headers, name, value)?;
    }
    Ok(headers)
}

fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) -> Result<()> {
    let invalid = |reason: String| UnleashError::InvalidConfigValueError {
        field: "custom_headers".to_string(),
        value: name.to_string(),
        reason,
    };
    let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
    let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
    headers.insert(header_name, header_value);
    Ok(())
}

pub(crate) fn json_headers(custom_headers: &HashMap<String, String>) -> Result<HeaderMap> {
    build_headers(custom_headers, &[("content-type", CONTENT_TYPE_JSON)])
}
