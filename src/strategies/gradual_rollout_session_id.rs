use crate::domain::{Context, Parameters, Strategy};
use crate::utils::error::Result;
use crate::utils::hashing::normalized_hash;

/// Sticky rollout on `sessionId`.
#[derive(Debug, Clone)]
pub struct GradualRolloutSessionId {
    percentage: u32,
    group_id: String,
}

impl GradualRolloutSessionId {
    pub const NAME: &'static str = "gradualRolloutSessionId";

    pub fn from_parameters(parameters: &Parameters) -> Result<Self> {
        Ok(Self {
            percentage: parameters.get_percentage(Self::NAME, "percentage")?,
            group_id: parameters.get_string(Self::NAME, "groupId")?,
        })
    }
}

impl Strategy for GradualRolloutSessionId {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn is_enabled(&self, context: &Context) -> Result<bool> {
        let bucket = normalized_hash(context.session_id()?, &self.group_id)?;
        Ok(bucket <= self.percentage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strategy(percentage: u32) -> GradualRolloutSessionId {
        let params = Parameters::new()
            .with("percentage", percentage.to_string())
            .with("groupId", "gr1");
        GradualRolloutSessionId::from_parameters(&params).unwrap()
    }

    #[test]
    fn test_bucket_boundary() {
        // session "123" in "gr1" hashes to bucket 73
        let context = Context::new().with_session_id("123");
        assert!(strategy(73).is_enabled(&context).unwrap());
        assert!(!strategy(72).is_enabled(&context).unwrap());
    }

    #[test]
    fn test_full_rollout() {
        let strategy = strategy(100);
        for i in 0..100 {
            let context = Context::new().with_session_id(format!("session-{}", i));
            assert!(strategy.is_enabled(&context).unwrap());
        }
    }

    #[test]
    fn test_missing_session_is_an_error() {
        assert!(strategy(50).is_enabled(&Context::new()).is_err());
    }
}
