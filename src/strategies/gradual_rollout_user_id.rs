use crate::domain::{Context, Parameters, Strategy};
use crate::utils::error::Result;
use crate::utils::hashing::normalized_hash;

/// Sticky rollout on `userId`.
#[derive(Debug, Clone)]
pub struct GradualRolloutUserId {
    percentage: u32,
    group_id: String,
}

impl GradualRolloutUserId {
    pub const NAME: &'static str = "gradualRolloutUserId";

    pub fn from_parameters(parameters: &Parameters) -> Result<Self> {
        Ok(Self {
            percentage: parameters.get_percentage(Self::NAME, "percentage")?,
            group_id: parameters.get_string(Self::NAME, "groupId")?,
        })
    }
}

impl Strategy for GradualRolloutUserId {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn is_enabled(&self, context: &Context) -> Result<bool> {
        let bucket = normalized_hash(context.user_id()?, &self.group_id)?;
        Ok(bucket <= self.percentage)
    }
}
