use crate::domain::{Context, Parameters, Strategy};
use crate::utils::error::Result;

/// Enabled for everyone.
#[derive(Debug, Clone, Copy)]
pub struct DefaultStrategy;

impl DefaultStrategy {
    pub const NAME: &'static str = "default";

    pub fn from_parameters(_parameters: &Parameters) -> Result<Self> {
        Ok(Self)
    }
}

impl Strategy for DefaultStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn is_enabled(&self, _context: &Context) -> Result<bool> {
        Ok(true)
    }
}
