use crate::domain::{Context, Strategy, ToggleStats};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// A feature toggle with its activation strategies and evaluation counters.
pub struct Feature {
    name: String,
    pub(crate) enabled: bool,
    pub(crate) strategies: Vec<Box<dyn Strategy>>,
    yes_count: AtomicU64,
    no_count: AtomicU64,
}

impl Feature {
    pub fn new(name: impl Into<String>, enabled: bool, strategies: Vec<Box<dyn Strategy>>) -> Self {
        Self {
            name: name.into(),
            enabled,
            strategies,
            yes_count: AtomicU64::new(0),
            no_count: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Evaluates the toggle and records the result.
    ///
    /// A disabled feature yields `default_value`. An enabled feature yields
    /// `default_value || any strategy`, where no strategies at all counts as on. An error
    /// from any strategy leaves the result at `default_value`.
    pub fn is_enabled(&self, context: &Context, default_value: bool) -> bool {
        let mut flag_value = default_value;

        if self.enabled {
            match self.evaluate_strategies(context) {
                Ok(strategy_result) => flag_value = flag_value || strategy_result,
                Err(e) => tracing::warn!("Error checking feature flag {}: {}", self.name, e),
            }
        }

        self.increment_stats(flag_value);
        tracing::debug!("Feature toggle status for feature {}: {}", self.name, flag_value);
        flag_value
    }

    fn evaluate_strategies(&self, context: &Context) -> crate::utils::error::Result<bool> {
        if self.strategies.is_empty() {
            return Ok(true);
        }

        // 所有策略都要評估，任何一個出錯就回到預設值，與順序無關
        let mut any_enabled = false;
        for strategy in &self.strategies {
            any_enabled |= strategy.is_enabled(context)?;
        }
        Ok(any_enabled)
    }

    pub fn increment_stats(&self, result: bool) {
        let counter = if result { &self.yes_count } else { &self.no_count };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stats(&self) -> ToggleStats {
        ToggleStats {
            yes: self.yes_count.load(Ordering::Relaxed),
            no: self.no_count.load(Ordering::Relaxed),
        }
    }

    /// Returns the counters and zeroes them in one step per counter.
    pub fn take_stats(&self) -> ToggleStats {
        ToggleStats {
            yes: self.yes_count.swap(0, Ordering::Relaxed),
            no: self.no_count.swap(0, Ordering::Relaxed),
        }
    }

    pub fn reset_stats(&self) {
        self.yes_count.store(0, Ordering::Relaxed);
        self.no_count.store(0, Ordering::Relaxed);
    }
}

impl fmt::Debug for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feature")
            .field("name", &self.name)
            .field("enabled", &self.enabled)
            .field("strategies", &self.strategy_names())
            .field("stats", &self.stats())
            .finish()
    }
}
