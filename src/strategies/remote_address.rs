use crate::domain::{Context, Parameters, Strategy};
use crate::utils::error::{Result, UnleashError};
use ipnet::IpNet;
use std::net::IpAddr;

#[derive(Debug, Clone, PartialEq)]
enum AddressRule {
    Single(IpAddr),
    Network(IpNet),
}

impl AddressRule {
    fn matches(&self, address: &IpAddr) -> bool {
        match self {
            AddressRule::Single(ip) => ip == address,
            AddressRule::Network(net) => net.contains(address),
        }
    }
}

/// Enabled for client addresses listed in `IPs`, which may mix single addresses and CIDR
/// ranges of either family.
#[derive(Debug, Clone)]
pub struct RemoteAddress {
    rules: Vec<AddressRule>,
}

impl RemoteAddress {
    pub const NAME: &'static str = "remoteAddress";

    pub fn from_parameters(parameters: &Parameters) -> Result<Self> {
        let mut rules = Vec::new();
        for entry in parameters.get_list(Self::NAME, "IPs")? {
            let parsed = if entry.contains('/') {
                entry.parse::<IpNet>().map(AddressRule::Network).ok()
            } else {
                entry.parse::<IpAddr>().map(AddressRule::Single).ok()
            };

            match parsed {
                Some(rule) => rules.push(rule),
                None => tracing::warn!("Skipping invalid IP entry in remoteAddress: {}", entry),
            }
        }

        Ok(Self { rules })
    }
}

impl Strategy for RemoteAddress {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn is_enabled(&self, context: &Context) -> Result<bool> {
        let raw = context.remote_address()?;
        let address: IpAddr = raw.trim().parse().map_err(|e| {
            UnleashError::strategy(Self::NAME, format!("invalid remote address '{}': {}", raw, e))
        })?;

        Ok(self.rules.iter().any(|rule| rule.matches(&address)))
    }
}
