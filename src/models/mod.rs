//! Value types for address arithmetic.
//!
//! This module contains the data structures shared by the calculators:
//! - [`NetworkRange`] - address block with derived boundaries and counts
//! - [`AddressRun`] - a single address or a run of consecutive addresses
//! - [`SubnetPlanEntry`] - one child subnet of a division plan
//! - [`NetworkInfo`] - the full description of a network

mod info;
mod ipv4;
mod network;
mod plan;
mod run;

// Re-export public types
pub use info::NetworkInfo;
pub use ipv4::{get_cidr_mask, mask_len, parse_mask, MAX_LENGTH};
pub use network::{
    addr_value, parse_prefix, serialize_count, AddressCount, Family, NetworkRange, Subnets,
};
pub use plan::{SubnetPlanEntry, NO_HOSTS};
pub use run::AddressRun;
