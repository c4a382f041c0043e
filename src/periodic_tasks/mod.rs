pub mod fetch_and_load;
pub mod send_metrics;

pub use fetch_and_load::{fetch_and_load_features, FetchFeaturesJob};
pub use send_metrics::{aggregate_and_send_metrics, SendMetricsJob};

use std::collections::HashMap;

/// Where and as whom the periodic tasks talk to the server.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub url: String,
    pub app_name: String,
    pub instance_id: String,
    pub custom_headers: HashMap<String, String>,
}
