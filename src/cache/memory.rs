use crate::domain::CacheStore;
use crate::utils::error::Result;
use serde_json::Value;
use std::collections::HashMap;

/// Cache that lives only as long as the process. `sync` is a no-op.
#[derive(Debug, Default, Clone)]
pub struct MemoryCache {
    entries: HashMap<String, Value>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }

    fn sync(&mut self) -> Result<()> {
        Ok(())
    }

    fn delete(&mut self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }
}
