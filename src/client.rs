use crate::api::{build_http_client, register_client};
use crate::cache::FileCache;
use crate::config::ClientConfig;
use crate::constants::METRIC_LAST_SENT_TIME;
use crate::domain::{CacheStore, Context, StrategyFactory};
use crate::features::FeatureMap;
use crate::periodic_tasks::{
    fetch_and_load_features, ConnectionSettings, FetchFeaturesJob, SendMetricsJob,
};
use crate::scheduler::Scheduler;
use crate::strategies::StrategyRegistry;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

const FETCH_JOB: &str = "fetch_features";
const METRICS_JOB: &str = "send_metrics";

/// Client for the Unleash feature toggle server.
///
/// ```no_run
/// # async fn run() -> unleash_client::Result<()> {
/// use std::collections::HashMap;
/// use unleash_client::{ClientConfig, Context, UnleashClient};
///
/// let config = ClientConfig::new("http://localhost:4242/api", "my-app");
/// let mut client = UnleashClient::new(config, HashMap::new())?;
/// client.initialize_client().await;
///
/// let context = Context::new().with_user_id("42");
/// if client.is_enabled("new-checkout", &context, false) {
///     // ...
/// }
/// client.destroy().await?;
/// # Ok(())
/// # }
/// ```
pub struct UnleashClient {
    config: ClientConfig,
    settings: ConnectionSettings,
    http: Client,
    cache: Arc<Mutex<FileCache>>,
    features: Arc<RwLock<FeatureMap>>,
    registry: Arc<StrategyRegistry>,
    scheduler: Scheduler,
    is_initialized: bool,
}

impl UnleashClient {
    /// Creates a client. `custom_strategies` extends the built-in strategies; a custom
    /// strategy cannot override a built-in name.
    pub fn new(
        config: ClientConfig,
        custom_strategies: HashMap<String, StrategyFactory>,
    ) -> Result<Self> {
        config.validate()?;

        let mut cache = FileCache::open(&config.instance_id, config.cache_directory.as_deref())?;
        cache.set_as(METRIC_LAST_SENT_TIME, &Utc::now())?;
        cache.sync()?;

        let settings = ConnectionSettings {
            url: config.base_url().to_string(),
            app_name: config.app_name.clone(),
            instance_id: config.instance_id.clone(),
            custom_headers: config.custom_headers.clone(),
        };

        Ok(Self {
            settings,
            http: build_http_client()?,
            cache: Arc::new(Mutex::new(cache)),
            features: Arc::new(RwLock::new(FeatureMap::new())),
            registry: Arc::new(StrategyRegistry::with_custom(custom_strategies)),
            scheduler: Scheduler::new(),
            is_initialized: false,
            config,
        })
    }

    /// Registers the client, loads features once and starts the refresh and metrics jobs.
    ///
    /// Must be called from inside a Tokio runtime.
    pub async fn initialize_client(&mut self) {
        if self.is_initialized {
            warn!("Unleash client is already initialized");
            return;
        }

        if !self.config.disable_registration {
            register_client(
                &self.http,
                &self.settings.url,
                &self.settings.app_name,
                &self.settings.instance_id,
                self.config.metrics_interval,
                &self.settings.custom_headers,
                self.registry.names(),
            )
            .await;
        }

        fetch_and_load_features(
            &self.http,
            &self.settings,
            &self.cache,
            &self.features,
            &self.registry,
        )
        .await;

        self.scheduler.add_job(
            FETCH_JOB,
            self.config.refresh_period(),
            Arc::new(FetchFeaturesJob {
                http: self.http.clone(),
                settings: self.settings.clone(),
                cache: Arc::clone(&self.cache),
                features: Arc::clone(&self.features),
                registry: Arc::clone(&self.registry),
            }),
        );

        if !self.config.disable_metrics {
            self.scheduler.add_job(
                METRICS_JOB,
                self.config.metrics_period(),
                Arc::new(SendMetricsJob {
                    http: self.http.clone(),
                    settings: self.settings.clone(),
                    cache: Arc::clone(&self.cache),
                    features: Arc::clone(&self.features),
                }),
            );
        }

        self.is_initialized = true;
        info!(
            "Unleash client initialized for {} ({} features)",
            self.settings.app_name,
            self.features.read().len()
        );
    }

    pub fn is_initialized(&self) -> bool {
        self.is_initialized
    }

    /// Checks whether `feature_name` is enabled for `context`.
    ///
    /// Returns `default_value` when the client is not initialized or the feature is unknown.
    pub fn is_enabled(&self, feature_name: &str, context: &Context, default_value: bool) -> bool {
        if !self.is_initialized {
            warn!("Returning default value for feature: {}", feature_name);
            warn!(
                "Attempted to get feature_flag {}, but client wasn't initialized!",
                feature_name
            );
            return default_value;
        }

        let context = self.with_static_context(context);
        let features = self.features.read();
        match features.get(feature_name) {
            Some(feature) => feature.is_enabled(&context, default_value),
            None => {
                warn!("Returning default value for feature: {}", feature_name);
                warn!("Feature {} is not known to the client", feature_name);
                default_value
            }
        }
    }

    fn with_static_context(&self, context: &Context) -> Context {
        let mut context = context.clone();
        context.app_name = Some(self.config.app_name.clone());
        context.environment = Some(self.config.environment.clone());
        context
    }

    pub fn feature_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.features.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Stops the periodic jobs and deletes the on-disk cache.
    pub async fn destroy(mut self) -> Result<()> {
        self.scheduler.remove_job(FETCH_JOB).await;
        self.scheduler.remove_job(METRICS_JOB).await;
        self.scheduler.shutdown().await;

        self.cache.lock().delete()?;
        debug!("Unleash client for {} destroyed", self.settings.app_name);
        Ok(())
    }
}
