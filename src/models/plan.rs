//! One entry of a subnet division plan.

use super::{serialize_count, NetworkRange};
use serde::Serialize;

/// Host range text used when a subnet has no usable hosts.
pub const NO_HOSTS: &str = "N/A";

/// A child subnet produced by division, with its host summary.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SubnetPlanEntry {
    /// Subnet in `network/prefix` notation.
    pub subnet: String,
    pub netmask: String,
    pub network_address: String,
    pub broadcast_address: String,
    /// Addresses minus network and broadcast, floored at 0.
    #[serde(serialize_with = "serialize_count")]
    pub usable_hosts: u128,
    /// `first - last` usable address, or [`NO_HOSTS`].
    pub host_range: String,
}

impl From<&NetworkRange> for SubnetPlanEntry {
    fn from(net: &NetworkRange) -> Self {
        let host_range = match (net.first_usable(), net.last_usable()) {
            (Some(first), Some(last)) => format!("{first} - {last}"),
            _ => NO_HOSTS.to_string(),
        };
        SubnetPlanEntry {
            subnet: net.cidr(),
            netmask: net.netmask().to_string(),
            network_address: net.network_addr().to_string(),
            broadcast_address: net.broadcast_addr().to_string(),
            usable_hosts: net.usable(),
            host_range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_from_range() {
        let net: NetworkRange = "192.168.0.64/26".parse().unwrap();
        let entry = SubnetPlanEntry::from(&net);
        assert_eq!(entry.subnet, "192.168.0.64/26");
        assert_eq!(entry.netmask, "255.255.255.192");
        assert_eq!(entry.broadcast_address, "192.168.0.127");
        assert_eq!(entry.usable_hosts, 62);
        assert_eq!(entry.host_range, "192.168.0.65 - 192.168.0.126");
    }

    #[test]
    fn test_entry_without_hosts() {
        let net: NetworkRange = "10.0.0.4/31".parse().unwrap();
        let entry = SubnetPlanEntry::from(&net);
        assert_eq!(entry.usable_hosts, 0);
        assert_eq!(entry.host_range, NO_HOSTS);
    }
}
