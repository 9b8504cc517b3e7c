//! Description of a network as reported by the calculator.

use super::{serialize_count, AddressCount, NetworkRange};
use serde::Serialize;

/// Everything the calculator reports about one network.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NetworkInfo {
    pub is_private: bool,
    /// `network/netmask` form.
    pub network: String,
    pub network_cidr: String,
    pub network_address: String,
    pub broadcast_address: String,
    pub total_ips: AddressCount,
    #[serde(serialize_with = "serialize_count")]
    pub usable_ips: u128,
    pub first_usable: Option<String>,
    pub last_usable: Option<String>,
    pub prefix_length: u8,
    pub netmask: String,
    pub hostmask: String,
}

impl NetworkInfo {
    pub fn new(net: &NetworkRange, is_private: bool) -> Self {
        NetworkInfo {
            is_private,
            network: format!("{}/{}", net.network_addr(), net.netmask()),
            network_cidr: net.cidr(),
            network_address: net.network_addr().to_string(),
            broadcast_address: net.broadcast_addr().to_string(),
            total_ips: net.total(),
            usable_ips: net.usable(),
            first_usable: net.first_usable().map(|a| a.to_string()),
            last_usable: net.last_usable().map(|a| a.to_string()),
            prefix_length: net.prefix(),
            netmask: net.netmask().to_string(),
            hostmask: net.hostmask().to_string(),
        }
    }
}
