use crate::domain::{Context, Parameters, Strategy};
use crate::utils::error::Result;

/// Enabled on hosts listed in the `hostNames` parameter.
#[derive(Debug, Clone)]
pub struct ApplicationHostname {
    host_names: Vec<String>,
    hostname: String,
}

impl ApplicationHostname {
    pub const NAME: &'static str = "applicationHostname";

    pub fn from_parameters(parameters: &Parameters) -> Result<Self> {
        let hostname = gethostname::gethostname().to_string_lossy().into_owned();
        Self::with_hostname(parameters, hostname)
    }

    pub fn with_hostname(parameters: &Parameters, hostname: impl Into<String>) -> Result<Self> {
        Ok(Self {
            host_names: parameters.get_list(Self::NAME, "hostNames")?,
            hostname: hostname.into(),
        })
    }
}

impl Strategy for ApplicationHostname {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn is_enabled(&self, _context: &Context) -> Result<bool> {
        Ok(self.host_names.iter().any(|h| h == &self.hostname))
    }
}
