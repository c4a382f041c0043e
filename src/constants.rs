use std::time::Duration;

// Library
pub const SDK_NAME: &str = "unleash-client-rust";
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// Cache keys
pub const METRIC_LAST_SENT_TIME: &str = "mlst";
pub const FEATURES_CACHE_KEY: &str = FEATURES_URL;
pub const CACHE_DIR_NAME: &str = "unleash-client";

// Headers
pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const APP_NAME_HEADER: &str = "UNLEASH-APPNAME";
pub const INSTANCE_ID_HEADER: &str = "UNLEASH-INSTANCEID";

// Paths
pub const REGISTER_URL: &str = "/client/register";
pub const FEATURES_URL: &str = "/client/features";
pub const METRICS_URL: &str = "/client/metrics";

// Client defaults
pub const DEFAULT_ENVIRONMENT: &str = "default";
pub const DEFAULT_INSTANCE_ID: &str = "unleash-client-rust";
pub const DEFAULT_REFRESH_INTERVAL: u64 = 15;
pub const DEFAULT_METRICS_INTERVAL: u64 = 60;
/// 刷新與指標上報間隔的上限（秒）
pub const MAX_INTERVAL: u64 = 86_400;
