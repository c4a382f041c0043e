use crate::domain::{Context, Parameters, Strategy};
use crate::utils::error::Result;
use std::collections::HashSet;

/// Enabled for the users listed in `userIds`.
#[derive(Debug, Clone)]
pub struct UserWithId {
    user_ids: HashSet<String>,
}

impl UserWithId {
    pub const NAME: &'static str = "userWithId";

    pub fn from_parameters(parameters: &Parameters) -> Result<Self> {
        Ok(Self {
            user_ids: parameters
                .get_list(Self::NAME, "userIds")?
                .into_iter()
                .collect(),
        })
    }
}

impl Strategy for UserWithId {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn is_enabled(&self, context: &Context) -> Result<bool> {
        Ok(self.user_ids.contains(context.user_id()?))
    }
}
