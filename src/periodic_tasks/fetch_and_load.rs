use crate::api::get_feature_toggles;
use crate::constants::FEATURES_CACHE_KEY;
use crate::domain::CacheStore;
use crate::features::{load_features, FeatureMap};
use crate::periodic_tasks::ConnectionSettings;
use crate::scheduler::Job;
use crate::strategies::StrategyRegistry;
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use reqwest::Client;
use std::sync::Arc;
use tracing::warn;

/// Fetches provisioning, stores it in the cache on success and reloads features from the
/// cache either way.
pub async fn fetch_and_load_features<C: CacheStore>(
    http: &Client,
    settings: &ConnectionSettings,
    cache: &Mutex<C>,
    features: &RwLock<FeatureMap>,
    registry: &StrategyRegistry,
) {
    let provisioning = get_feature_toggles(
        http,
        &settings.url,
        &settings.app_name,
        &settings.instance_id,
        &settings.custom_headers,
    )
    .await;

    let mut cache = cache.lock();
    match provisioning {
        Some(provisioning) => {
            let stored = cache
                .set_as(FEATURES_CACHE_KEY, &provisioning)
                .and_then(|_| cache.sync());
            if let Err(e) = stored {
                warn!("Unable to persist feature provisioning to cache: {}", e);
            }
        }
        None => warn!("Unable to get feature flag toggles, using cached provisioning."),
    }

    let mut features = features.write();
    load_features(&*cache, &mut features, registry);
}

pub struct FetchFeaturesJob<C: CacheStore> {
    pub http: Client,
    pub settings: ConnectionSettings,
    pub cache: Arc<Mutex<C>>,
    pub features: Arc<RwLock<FeatureMap>>,
    pub registry: Arc<StrategyRegistry>,
}

#[async_trait]
impl<C: CacheStore + 'static> Job for FetchFeaturesJob<C> {
    async fn run(&self) {
        fetch_and_load_features(
            &self.http,
            &self.settings,
            &self.cache,
            &self.features,
            &self.registry,
        )
        .await;
    }
}
