//! Subnet division.
//!
//! Splits a network into equal-sized children, sized either by how many
//! subnets are wanted or by how many hosts each one must hold.

use crate::error::NetError;
use crate::models::{NetworkRange, SubnetPlanEntry, Subnets};
use serde::{Deserialize, Serialize};

/// How the division target is expressed.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DivideType {
    /// Number of subnets wanted.
    Count,
    /// Minimum host capacity per subnet.
    Hosts,
}

/// Prefix length of the children for `divide_type`/`value`.
fn child_prefix(
    parent: &NetworkRange,
    divide_type: DivideType,
    value: u64,
) -> Result<u8, NetError> {
    if value == 0 {
        return Err(NetError::range(format!(
            "{divide_type:?} value must be at least 1"
        )));
    }
    let bits = parent.family().bits() as u32;
    let prefix = parent.prefix() as u32;

    match divide_type {
        DivideType::Count => {
            // Smallest b with 2^b >= value
            let extra = value
                .checked_next_power_of_two()
                .map_or(u64::BITS, u64::trailing_zeros);
            if prefix + extra > bits {
                return Err(NetError::range(format!(
                    "too many subnets: {value} subnets do not fit in {}",
                    parent.cidr()
                )));
            }
            Ok((prefix + extra) as u8)
        }
        DivideType::Hosts => {
            // Bit length of value; network and broadcast are not added
            let host_bits = u64::BITS - value.leading_zeros();
            if host_bits > bits || bits - host_bits < prefix {
                return Err(NetError::range(format!(
                    "too many hosts: {value} hosts per subnet do not fit in {}",
                    parent.cidr()
                )));
            }
            Ok((bits - host_bits) as u8)
        }
    }
}

/// Division result, produced one entry at a time.
#[derive(Debug, Clone)]
pub struct SubnetPlan {
    subnets: Subnets,
    prefix: u8,
    remaining: u128,
}

impl SubnetPlan {
    /// Plan the division of `network` into equal children.
    ///
    /// `network` must be a CIDR block with no host bits set. In `Count` mode
    /// the plan holds exactly `value` subnets; in `Hosts` mode it covers the
    /// whole parent.
    pub fn new(network: &str, divide_type: DivideType, value: u64) -> Result<Self, NetError> {
        let parent = NetworkRange::parse_cidr(network, true)?;
        let prefix = child_prefix(&parent, divide_type, value)?;
        let available = parent.subnet_count(prefix).unwrap_or(u128::MAX);
        let remaining = match divide_type {
            DivideType::Count => available.min(value as u128),
            DivideType::Hosts => available,
        };
        log::debug!(
            "divide({}, {divide_type:?}, {value}) -> {remaining} x /{prefix}",
            parent.cidr()
        );
        Ok(SubnetPlan {
            subnets: parent.subnets(prefix)?,
            prefix,
            remaining,
        })
    }

    /// Prefix length of every child.
    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Entries not yet produced.
    pub fn remaining(&self) -> u128 {
        self.remaining
    }
}

impl Iterator for SubnetPlan {
    type Item = SubnetPlanEntry;

    fn next(&mut self) -> Option<SubnetPlanEntry> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.subnets.next().map(|net| SubnetPlanEntry::from(&net))
    }
}

/// Divide `network` into equal children, in ascending address order.
///
/// See [`SubnetPlan::new`] for the rules. Every entry is materialized; use
/// [`SubnetPlan`] directly to check the size first.
pub fn divide(
    network: &str,
    divide_type: DivideType,
    value: u64,
) -> Result<Vec<SubnetPlanEntry>, NetError> {
    Ok(SubnetPlan::new(network, divide_type, value)?.collect())
}
