use crate::api::send_metrics;
use crate::constants::METRIC_LAST_SENT_TIME;
use crate::domain::{CacheStore, MetricsBucket, MetricsRequest};
use crate::features::FeatureMap;
use crate::periodic_tasks::ConnectionSettings;
use crate::scheduler::Job;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Collects and resets every feature's counters into one metrics bucket.
///
/// The bucket starts at the last send time stored in the cache.
pub fn aggregate_metrics<C: CacheStore>(
    settings: &ConnectionSettings,
    cache: &Mutex<C>,
    features: &RwLock<FeatureMap>,
) -> MetricsRequest {
    let toggles: HashMap<_, _> = features
        .read()
        .values()
        .map(|feature| (feature.name().to_string(), feature.take_stats()))
        .collect();

    let stop = Utc::now();
    let start = cache
        .lock()
        .get_as::<DateTime<Utc>>(METRIC_LAST_SENT_TIME)
        .unwrap_or(stop);

    MetricsRequest {
        app_name: settings.app_name.clone(),
        instance_id: settings.instance_id.clone(),
        bucket: MetricsBucket {
            start,
            stop,
            toggles,
        },
    }
}

pub async fn aggregate_and_send_metrics<C: CacheStore>(
    http: &Client,
    settings: &ConnectionSettings,
    cache: &Mutex<C>,
    features: &RwLock<FeatureMap>,
) {
    let request = aggregate_metrics(settings, cache, features);
    send_metrics(http, &settings.url, &request, &settings.custom_headers).await;

    let mut cache = cache.lock();
    let stored = cache
        .set_as(METRIC_LAST_SENT_TIME, &Utc::now())
        .and_then(|_| cache.sync());
    if let Err(e) = stored {
        warn!("Unable to persist metrics send time: {}", e);
    }
}

pub struct SendMetricsJob<C: CacheStore> {
    pub http: Client,
    pub settings: ConnectionSettings,
    pub cache: Arc<Mutex<C>>,
    pub features: Arc<RwLock<FeatureMap>>,
}

#[async_trait]
impl<C: CacheStore + 'static> Job for SendMetricsJob<C> {
    async fn run(&self) {
        aggregate_and_send_metrics(&self.http, &self.settings, &self.cache, &self.features).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::domain::{Context, ToggleStats};
    use crate::features::Feature;
    use httpmock::prelude::*;

    fn settings(url: String) -> ConnectionSettings {
        ConnectionSettings {
            url,
            app_name: "pytest".to_string(),
            instance_id: "123".to_string(),
            custom_headers: HashMap::new(),
        }
    }

    fn features() -> RwLock<FeatureMap> {
        let mut map = FeatureMap::new();
        map.insert("on".to_string(), Feature::new("on", true, vec![]));
        map.insert("off".to_string(), Feature::new("off", false, vec![]));
        RwLock::new(map)
    }

    #[test]
    fn test_aggregate_resets_counters() {
        let features = features();
        {
            let map = features.read();
            map["on"].is_enabled(&Context::new(), false);
            map["on"].is_enabled(&Context::new(), false);
            map["off"].is_enabled(&Context::new(), false);
        }

        let last_sent = Utc::now() - chrono::Duration::seconds(60);
        let mut memory = MemoryCache::new();
        memory.set_as(METRIC_LAST_SENT_TIME, &last_sent).unwrap();
        let cache = Mutex::new(memory);

        let request = aggregate_metrics(&settings("http://unused".to_string()), &cache, &features);

        assert_eq!(request.bucket.start, last_sent);
        assert!(request.bucket.stop >= last_sent);
        assert_eq!(request.bucket.toggles["on"], ToggleStats { yes: 2, no: 0 });
        assert_eq!(request.bucket.toggles["off"], ToggleStats { yes: 0, no: 1 });
        assert_eq!(features.read()["on"].stats(), ToggleStats::default());
    }

    #[tokio::test]
    async fn test_send_updates_last_sent_time() {
        let server = MockServer::start();
        let metrics_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/client/metrics")
                .json_body_partial(r#"{"appName": "pytest", "instanceId": "123"}"#);
            then.status(202);
        });

        let before = Utc::now();
        let cache = Mutex::new(MemoryCache::new());
        let features = features();

        aggregate_and_send_metrics(&Client::new(), &settings(server.base_url()), &cache, &features)
            .await;

        metrics_mock.assert();
        let last_sent: DateTime<Utc> = cache.lock().get_as(METRIC_LAST_SENT_TIME).unwrap();
        assert!(last_sent >= before);
    }
}
