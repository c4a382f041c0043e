pub mod application_hostname;
pub mod default;
pub mod gradual_rollout_random;
pub mod gradual_rollout_session_id;
pub mod gradual_rollout_user_id;
pub mod invalid;
pub mod remote_address;
pub mod user_with_id;

pub use application_hostname::ApplicationHostname;
pub use default::DefaultStrategy;
pub use gradual_rollout_random::GradualRolloutRandom;
pub use gradual_rollout_session_id::GradualRolloutSessionId;
pub use gradual_rollout_user_id::GradualRolloutUserId;
pub use invalid::InvalidStrategy;
pub use remote_address::RemoteAddress;
pub use user_with_id::UserWithId;

use crate::domain::{Parameters, Strategy, StrategyDefinition, StrategyFactory};
use crate::utils::error::{Result, UnleashError};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Wraps a constructor into a [`StrategyFactory`].
pub fn factory<S, F>(build: F) -> StrategyFactory
where
    S: Strategy + 'static,
    F: Fn(&Parameters) -> Result<S> + Send + Sync + 'static,
{
    Arc::new(move |parameters: &Parameters| {
        build(parameters).map(|strategy| Box::new(strategy) as Box<dyn Strategy>)
    })
}

/// Maps strategy names, as sent by the server, to their constructors.
#[derive(Clone)]
pub struct StrategyRegistry {
    factories: BTreeMap<String, StrategyFactory>,
}

impl StrategyRegistry {
    /// Registry holding only the built-in strategies.
    pub fn builtin() -> Self {
        let mut factories: BTreeMap<String, StrategyFactory> = BTreeMap::new();
        factories.insert(
            ApplicationHostname::NAME.to_string(),
            factory(ApplicationHostname::from_parameters),
        );
        factories.insert(
            DefaultStrategy::NAME.to_string(),
            factory(DefaultStrategy::from_parameters),
        );
        factories.insert(
            GradualRolloutRandom::NAME.to_string(),
            factory(GradualRolloutRandom::from_parameters),
        );
        factories.insert(
            GradualRolloutSessionId::NAME.to_string(),
            factory(GradualRolloutSessionId::from_parameters),
        );
        factories.insert(
            GradualRolloutUserId::NAME.to_string(),
            factory(GradualRolloutUserId::from_parameters),
        );
        factories.insert(
            RemoteAddress::NAME.to_string(),
            factory(RemoteAddress::from_parameters),
        );
        factories.insert(
            UserWithId::NAME.to_string(),
            factory(UserWithId::from_parameters),
        );
        Self { factories }
    }

    /// Built-ins plus custom strategies. A custom strategy cannot replace a built-in one.
    pub fn with_custom(custom: HashMap<String, StrategyFactory>) -> Self {
        let mut registry = Self::builtin();
        for (name, strategy_factory) in custom {
            if registry.factories.contains_key(&name) {
                tracing::warn!("Custom strategy '{}' shadows a built-in strategy and is ignored", name);
                continue;
            }
            registry.factories.insert(name, strategy_factory);
        }
        registry
    }

    pub fn names(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn build(&self, definition: &StrategyDefinition) -> Result<Box<dyn Strategy>> {
        let strategy_factory = self.factories.get(&definition.name).ok_or_else(|| {
            UnleashError::strategy(&definition.name, "strategy is not registered")
        })?;

        let empty = Parameters::new();
        strategy_factory(definition.parameters.as_ref().unwrap_or(&empty))
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("strategies", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Context;

    struct AlwaysOff;

    impl Strategy for AlwaysOff {
        fn name(&self) -> &str {
            "alwaysOff"
        }

        fn is_enabled(&self, _context: &Context) -> Result<bool> {
            Ok(false)
        }
    }

    #[test]
    fn test_builtin_names() {
        let names = StrategyRegistry::builtin().names();
        assert_eq!(
            names,
            vec![
                "applicationHostname",
                "default",
                "gradualRolloutRandom",
                "gradualRolloutSessionId",
                "gradualRolloutUserId",
                "remoteAddress",
                "userWithId",
            ]
        );
    }

    #[test]
    fn test_custom_strategy_is_registered() {
        let mut custom = HashMap::new();
        custom.insert("alwaysOff".to_string(), factory(|_| Ok(AlwaysOff)));
        let registry = StrategyRegistry::with_custom(custom);

        assert!(registry.contains("alwaysOff"));
        let strategy = registry
            .build(&StrategyDefinition {
                name: "alwaysOff".to_string(),
                parameters: None,
            })
            .unwrap();
        assert!(!strategy.is_enabled(&Context::new()).unwrap());
    }

    #[test]
    fn test_builtin_wins_over_custom() {
        let mut custom = HashMap::new();
        custom.insert("default".to_string(), factory(|_| Ok(AlwaysOff)));
        let registry = StrategyRegistry::with_custom(custom);

        let strategy = registry
            .build(&StrategyDefinition {
                name: "default".to_string(),
                parameters: None,
            })
            .unwrap();
        assert!(strategy.is_enabled(&Context::new()).unwrap());
    }

    #[test]
    fn test_unknown_strategy() {
        let registry = StrategyRegistry::builtin();
        let result = registry.build(&StrategyDefinition {
            name: "doesNotExist".to_string(),
            parameters: None,
        });
        assert!(result.is_err());
    }
}
