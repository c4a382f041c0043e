use crate::domain::{Context, Parameters, Strategy};
use crate::utils::error::Result;
use rand::Rng;

/// Enabled for a random `percentage` of evaluations.
#[derive(Debug, Clone)]
pub struct GradualRolloutRandom {
    percentage: u32,
}

impl GradualRolloutRandom {
    pub const NAME: &'static str = "gradualRolloutRandom";

    pub fn from_parameters(parameters: &Parameters) -> Result<Self> {
        Ok(Self {
            percentage: parameters.get_percentage(Self::NAME, "percentage")?,
        })
    }
}

impl Strategy for GradualRolloutRandom {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn is_enabled(&self, _context: &Context) -> Result<bool> {
        let roll: u32 = rand::thread_rng().gen_range(1..=100);
        Ok(roll <= self.percentage)
    }
}
