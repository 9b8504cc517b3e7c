//! Runs of consecutive addresses.

use super::network::{addr_value, Family, NetworkRange};
use serde::{Serialize, Serializer};
use std::fmt;
use std::net::IpAddr;

/// A single address or a closed interval of consecutive addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressRun {
    Single(IpAddr),
    Span { start: IpAddr, end: IpAddr },
}

impl AddressRun {
    /// Build a run from integer bounds, `start <= end`.
    pub fn from_values(family: Family, start: u128, end: u128) -> AddressRun {
        if start == end {
            AddressRun::Single(family.to_addr(start))
        } else {
            AddressRun::Span {
                start: family.to_addr(start),
                end: family.to_addr(end),
            }
        }
    }

    pub fn start(&self) -> IpAddr {
        match *self {
            AddressRun::Single(addr) => addr,
            AddressRun::Span { start, .. } => start,
        }
    }

    pub fn end(&self) -> IpAddr {
        match *self {
            AddressRun::Single(addr) => addr,
            AddressRun::Span { end, .. } => end,
        }
    }

    /// Split the run into the fewest aligned CIDR blocks, in ascending order.
    pub fn to_cidrs(&self) -> Vec<NetworkRange> {
        let family = Family::of(self.start());
        let bits = family.bits() as u32;
        let mut cur = addr_value(self.start());
        let end = addr_value(self.end());
        let mut blocks = Vec::new();

        loop {
            // Largest block the start address is aligned to
            let align = cur.trailing_zeros().min(bits);
            // Largest block that still fits in what is left
            let fit = match (end - cur).checked_add(1) {
                Some(left) => 127 - left.leading_zeros(),
                None => 128,
            };
            let host_bits = align.min(fit);
            blocks.push(NetworkRange::from_value(family, cur, (bits - host_bits) as u8));

            let size = match 1u128.checked_shl(host_bits) {
                Some(size) => size,
                None => break,
            };
            match cur.checked_add(size) {
                Some(next) if next <= end => cur = next,
                _ => break,
            }
        }
        blocks
    }
}

impl fmt::Display for AddressRun {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AddressRun::Single(addr) => write!(f, "{addr}"),
            AddressRun::Span { start, end } => write!(f, "{start}-{end}"),
        }
    }
}

impl Serialize for AddressRun {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
