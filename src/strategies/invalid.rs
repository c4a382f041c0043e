use crate::domain::{Context, Strategy};
use crate::utils::error::{Result, UnleashError};

/// Stands in for a strategy the server sent but the client could not build, such as an
/// unregistered name or a rollout with a malformed `percentage`.
///
/// Every evaluation fails, so the feature falls back to the caller's default instead of
/// losing the strategy and turning on for everyone.
#[derive(Debug, Clone)]
pub struct InvalidStrategy {
    name: String,
    reason: String,
}

impl InvalidStrategy {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl Strategy for InvalidStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self, _context: &Context) -> Result<bool> {
        Err(UnleashError::strategy(&self.name, &self.reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_errors() {
        let strategy = InvalidStrategy::new("gradualRolloutUserId", "percentage is not a number");

        assert_eq!(strategy.name(), "gradualRolloutUserId");
        let err = strategy
            .is_enabled(&Context::new().with_user_id("1"))
            .unwrap_err();
        assert!(err.to_string().contains("percentage is not a number"));
    }
}
