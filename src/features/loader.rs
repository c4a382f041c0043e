use crate::constants::FEATURES_CACHE_KEY;
use crate::domain::{CacheStore, FeatureDefinition, FeaturesResponse, Strategy};
use crate::features::Feature;
use crate::strategies::{InvalidStrategy, StrategyRegistry};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

pub type FeatureMap = HashMap<String, Feature>;

/// Builds every strategy of `definition`.
///
/// A strategy that cannot be built is kept as an [`InvalidStrategy`], so the feature
/// evaluates to the caller's default rather than to "no strategies, always on".
fn create_strategies(
    definition: &FeatureDefinition,
    registry: &StrategyRegistry,
) -> Vec<Box<dyn Strategy>> {
    let Some(definitions) = definition.strategies.as_ref() else {
        return Vec::new();
    };

    definitions
        .iter()
        .map(|strategy| match registry.build(strategy) {
            Ok(built) => built,
            Err(e) => {
                warn!(
                    "Failed to load strategy {} for feature {}. This may be a problem with a custom strategy: {}",
                    strategy.name, definition.name, e
                );
                let invalid = InvalidStrategy::new(&strategy.name, e.to_string());
                Box::new(invalid) as Box<dyn Strategy>
            }
        })
        .collect()
}

fn create_feature(definition: &FeatureDefinition, registry: &StrategyRegistry) -> Feature {
    Feature::new(
        definition.name.clone(),
        definition.enabled,
        create_strategies(definition, registry),
    )
}

/// Reconciles `features` with the provisioning stored in `cache`.
///
/// Existing features are updated in place so their evaluation counters survive a refresh.
pub fn load_features<C: CacheStore>(cache: &C, features: &mut FeatureMap, registry: &StrategyRegistry) {
    let Some(provisioning) = cache.get_as::<FeaturesResponse>(FEATURES_CACHE_KEY) else {
        warn!("No cached feature provisioning available, keeping current features");
        return;
    };

    apply_provisioning(&provisioning, features, registry);
}

pub fn apply_provisioning(
    provisioning: &FeaturesResponse,
    features: &mut FeatureMap,
    registry: &StrategyRegistry,
) {
    let names: HashSet<&str> = provisioning
        .features
        .iter()
        .map(|f| f.name.as_str())
        .collect();

    // 移除伺服器上已不存在的 feature
    features.retain(|name, _| names.contains(name.as_str()));

    for definition in &provisioning.features {
        match features.get_mut(&definition.name) {
            Some(existing) => {
                existing.enabled = definition.enabled;
                let has_strategies = definition
                    .strategies
                    .as_ref()
                    .is_some_and(|s| !s.is_empty());
                if has_strategies {
                    existing.strategies = create_strategies(definition, registry);
                }
            }
            None => {
                features.insert(definition.name.clone(), create_feature(definition, registry));
            }
        }
    }

    debug!("Loaded {} features", features.len());
}
