use crate::domain::model::{Context, Parameters};
use crate::utils::error::Result;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// An activation strategy attached to a feature.
pub trait Strategy: Send + Sync {
    fn name(&self) -> &str;
    fn is_enabled(&self, context: &Context) -> Result<bool>;
}

/// Builds a strategy from the parameters the server sent for it.
pub type StrategyFactory = Arc<dyn Fn(&Parameters) -> Result<Box<dyn Strategy>> + Send + Sync>;

/// Key/value store that survives restarts.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value);
    fn sync(&mut self) -> Result<()>;
    fn delete(&mut self) -> Result<()>;

    fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T>
    where
        Self: Sized,
    {
        self.get(key).and_then(|value| {
            serde_json::from_value(value)
                .map_err(|e| tracing::warn!("Ignoring unreadable cache entry '{}': {}", key, e))
                .ok()
        })
    }

    fn set_as<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()>
    where
        Self: Sized,
    {
        self.set(key, serde_json::to_value(value)?);
        Ok(())
    }
}
