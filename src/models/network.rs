//! Address family arithmetic and the [`NetworkRange`] value type.
//!
//! Addresses of both families are handled as `u128` integers so that the
//! same mask/boundary code serves IPv4 (32 bits) and IPv6 (128 bits).

use super::ipv4;
use crate::error::NetError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Exact decimal value of 2^128, the size of the whole IPv6 space.
const IPV6_SPACE: &str = "340282366920938463463374607431768211456";

/// IP address family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    pub fn of(addr: IpAddr) -> Family {
        match addr {
            IpAddr::V4(_) => Family::V4,
            IpAddr::V6(_) => Family::V6,
        }
    }

    /// Address width in bits.
    pub fn bits(self) -> u8 {
        match self {
            Family::V4 => 32,
            Family::V6 => 128,
        }
    }

    /// Highest address value of the family.
    pub fn max_value(self) -> u128 {
        match self {
            Family::V4 => u32::MAX as u128,
            Family::V6 => u128::MAX,
        }
    }

    /// Bits left for hosts under `prefix` set to 1.
    pub fn host_mask(self, prefix: u8) -> u128 {
        let host_bits = self.bits().saturating_sub(prefix);
        if host_bits >= 128 {
            u128::MAX
        } else {
            (1u128 << host_bits) - 1
        }
    }

    /// Network mask for `prefix`, limited to the family width.
    pub fn net_mask(self, prefix: u8) -> u128 {
        self.max_value() & !self.host_mask(prefix)
    }

    /// Build an address of this family from its integer value.
    pub fn to_addr(self, value: u128) -> IpAddr {
        match self {
            Family::V4 => IpAddr::V4(Ipv4Addr::from(value as u32)),
            Family::V6 => IpAddr::V6(Ipv6Addr::from(value)),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Family::V4 => write!(f, "IPv4"),
            Family::V6 => write!(f, "IPv6"),
        }
    }
}

/// Integer value of an address.
pub fn addr_value(addr: IpAddr) -> u128 {
    match addr {
        IpAddr::V4(a) => u32::from(a) as u128,
        IpAddr::V6(a) => u128::from(a),
    }
}

/// Number of addresses in a block of `2^host_bits` addresses.
///
/// Kept as a bit count because the full IPv6 space does not fit in `u128`.
/// Serializes like [`serialize_count`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressCount {
    host_bits: u8,
}

impl AddressCount {
    pub fn new(host_bits: u8) -> Self {
        AddressCount { host_bits }
    }

    /// The count, if it fits in `u128`.
    pub fn value(&self) -> Option<u128> {
        1u128.checked_shl(self.host_bits as u32)
    }

    /// Count minus network and broadcast, floored at 0.
    pub fn usable(&self) -> u128 {
        match self.value() {
            _ if self.host_bits <= 1 => 0,
            Some(total) => total - 2,
            None => u128::MAX - 1,
        }
    }
}

impl fmt::Display for AddressCount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.value() {
            Some(total) => write!(f, "{total}"),
            None => f.write_str(IPV6_SPACE),
        }
    }
}

impl Serialize for AddressCount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.value() {
            Some(total) => serialize_count(&total, serializer),
            None => serializer.serialize_str(IPV6_SPACE),
        }
    }
}

/// Serialize a count as a JSON number when it fits `u64`, else as a
/// decimal string.
pub fn serialize_count<S>(count: &u128, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match u64::try_from(*count) {
        Ok(small) => serializer.serialize_u64(small),
        Err(_) => serializer.collect_str(count),
    }
}

/// An address block: a base address plus prefix length.
///
/// The base may carry host bits; [`NetworkRange::network`] clears them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkRange {
    family: Family,
    base: u128,
    prefix: u8,
}

impl NetworkRange {
    /// Create a range, checking the prefix against the address family.
    pub fn new(addr: IpAddr, prefix: u8) -> Result<NetworkRange, NetError> {
        let family = Family::of(addr);
        if prefix > family.bits() {
            return Err(NetError::range(format!(
                "prefix length {prefix} is out of range for {family} (0-{})",
                family.bits()
            )));
        }
        Ok(NetworkRange {
            family,
            base: addr_value(addr),
            prefix,
        })
    }

    /// Range from an integer base; `prefix` must fit the family.
    pub(crate) fn from_value(family: Family, base: u128, prefix: u8) -> NetworkRange {
        debug_assert!(prefix <= family.bits());
        NetworkRange {
            family,
            base,
            prefix,
        }
    }

    /// Parse `address`, `address/prefix` or (IPv4 only) `address/netmask`.
    ///
    /// When `strict` is set the address must already be the network
    /// address of the block.
    pub fn parse_cidr(text: &str, strict: bool) -> Result<NetworkRange, NetError> {
        let text = text.trim();
        let (addr_part, prefix_part) = match text.split_once('/') {
            Some((addr, prefix)) => (addr.trim(), Some(prefix.trim())),
            None => (text, None),
        };
        let addr: IpAddr = addr_part.parse().map_err(|_| {
            NetError::format(format!("invalid IP address '{addr_part}' in '{text}'"))
        })?;
        let family = Family::of(addr);

        let prefix = match prefix_part {
            None => family.bits(),
            Some(p) if family == Family::V4 && p.contains('.') => ipv4::parse_mask(p)?,
            Some(p) => parse_prefix(p)?,
        };
        let range = NetworkRange::new(addr, prefix)?;

        if strict && range.base != range.network() {
            return Err(NetError::parse(format!("{text} has host bits set")));
        }
        Ok(range)
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// The address the range was built from.
    pub fn base_addr(&self) -> IpAddr {
        self.family.to_addr(self.base)
    }

    /// Lowest address value of the block.
    pub fn network(&self) -> u128 {
        self.base & self.family.net_mask(self.prefix)
    }

    /// Highest address value of the block.
    pub fn broadcast(&self) -> u128 {
        self.network() | self.family.host_mask(self.prefix)
    }

    pub fn network_addr(&self) -> IpAddr {
        self.family.to_addr(self.network())
    }

    pub fn broadcast_addr(&self) -> IpAddr {
        self.family.to_addr(self.broadcast())
    }

    pub fn netmask(&self) -> IpAddr {
        self.family.to_addr(self.family.net_mask(self.prefix))
    }

    pub fn hostmask(&self) -> IpAddr {
        self.family.to_addr(self.family.host_mask(self.prefix))
    }

    pub fn total(&self) -> AddressCount {
        AddressCount::new(self.family.bits() - self.prefix)
    }

    pub fn usable(&self) -> u128 {
        self.total().usable()
    }

    /// First host address, `None` when the block has no usable hosts.
    pub fn first_usable(&self) -> Option<IpAddr> {
        (self.usable() > 0).then(|| self.family.to_addr(self.network() + 1))
    }

    /// Last host address, `None` when the block has no usable hosts.
    pub fn last_usable(&self) -> Option<IpAddr> {
        (self.usable() > 0).then(|| self.family.to_addr(self.broadcast() - 1))
    }

    pub fn contains(&self, value: u128) -> bool {
        value >= self.network() && value <= self.broadcast()
    }

    /// Canonical `network/prefix` text.
    pub fn cidr(&self) -> String {
        format!("{}/{}", self.network_addr(), self.prefix)
    }

    /// How many blocks of `new_prefix` fit in this one, if it fits in `u128`.
    pub fn subnet_count(&self, new_prefix: u8) -> Option<u128> {
        let diff = new_prefix.checked_sub(self.prefix)?;
        1u128.checked_shl(diff as u32)
    }

    /// Iterate the child blocks of `new_prefix` in ascending order.
    pub fn subnets(&self, new_prefix: u8) -> Result<Subnets, NetError> {
        if new_prefix < self.prefix || new_prefix > self.family.bits() {
            return Err(NetError::range(format!(
                "cannot split {} into /{new_prefix} blocks",
                self.cidr()
            )));
        }
        let host_bits = (self.family.bits() - new_prefix) as u32;
        Ok(Subnets {
            family: self.family,
            next: self.network(),
            prefix: new_prefix,
            step: 1u128.checked_shl(host_bits).unwrap_or(0),
            remaining: self.subnet_count(new_prefix).unwrap_or(u128::MAX),
        })
    }
}

impl fmt::Display for NetworkRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.base_addr(), self.prefix)
    }
}

impl FromStr for NetworkRange {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NetworkRange::parse_cidr(s, false)
    }
}

impl Serialize for NetworkRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.cidr())
    }
}

/// Parse a decimal prefix length. The family bound is checked by the caller.
pub fn parse_prefix(text: &str) -> Result<u8, NetError> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NetError::format(format!("invalid prefix length '{text}'")));
    }
    text.parse::<u8>()
        .map_err(|_| NetError::range(format!("prefix length {text} is out of range")))
}

/// Iterator over equal-sized child blocks, see [`NetworkRange::subnets`].
#[derive(Debug, Clone)]
pub struct Subnets {
    family: Family,
    next: u128,
    prefix: u8,
    step: u128,
    remaining: u128,
}

impl Iterator for Subnets {
    type Item = NetworkRange;

    fn next(&mut self) -> Option<NetworkRange> {
        if self.remaining == 0 {
            return None;
        }
        let subnet = NetworkRange {
            family: self.family,
            base: self.next,
            prefix: self.prefix,
        };
        self.remaining -= 1;
        self.next = self.next.wrapping_add(self.step);
        Some(subnet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net(text: &str) -> NetworkRange {
        NetworkRange::parse_cidr(text, false).unwrap()
    }

    #[test]
    fn test_boundaries_v4() {
        let n = net("192.168.1.42/24");
        assert_eq!(n.network_addr().to_string(), "192.168.1.0");
        assert_eq!(n.broadcast_addr().to_string(), "192.168.1.255");
        assert_eq!(n.netmask().to_string(), "255.255.255.0");
        assert_eq!(n.hostmask().to_string(), "0.0.0.255");
        assert_eq!(n.total().value(), Some(256));
        assert_eq!(n.usable(), 254);
        assert_eq!(n.first_usable().unwrap().to_string(), "192.168.1.1");
        assert_eq!(n.last_usable().unwrap().to_string(), "192.168.1.254");
        assert_eq!(n.to_string(), "192.168.1.42/24");
        assert_eq!(n.cidr(), "192.168.1.0/24");
    }

    #[test]
    fn test_edge_prefixes_v4() {
        let all = net("10.1.2.3/0");
        assert_eq!(all.network_addr().to_string(), "0.0.0.0");
        assert_eq!(all.broadcast_addr().to_string(), "255.255.255.255");
        assert_eq!(all.total().value(), Some(1 << 32));

        let host = net("10.1.2.3/32");
        assert_eq!(host.network_addr(), host.broadcast_addr());
        assert_eq!(host.usable(), 0);
        assert_eq!(host.first_usable(), None);

        let pair = net("10.1.2.2/31");
        assert_eq!(pair.total().value(), Some(2));
        assert_eq!(pair.usable(), 0);
        assert_eq!(pair.last_usable(), None);
    }

    #[test]
    fn test_boundaries_v6() {
        let n = net("2001:db8::1/64");
        assert_eq!(n.network_addr().to_string(), "2001:db8::");
        assert_eq!(
            n.broadcast_addr().to_string(),
            "2001:db8::ffff:ffff:ffff:ffff"
        );
        assert_eq!(n.netmask().to_string(), "ffff:ffff:ffff:ffff::");
        assert_eq!(n.total().value(), Some(1 << 64));

        let all = net("::/0");
        assert_eq!(all.total().value(), None);
        assert_eq!(all.total().to_string(), IPV6_SPACE);
        assert_eq!(all.usable(), u128::MAX - 1);
    }

    #[test]
    fn test_count_serialization() {
        let json = |c: AddressCount| serde_json::to_value(c).unwrap();
        assert_eq!(json(AddressCount::new(8)), serde_json::json!(256));
        assert_eq!(json(AddressCount::new(63)), serde_json::json!(1u64 << 63));
        assert_eq!(
            json(AddressCount::new(64)),
            serde_json::json!("18446744073709551616")
        );
        assert_eq!(json(AddressCount::new(128)), serde_json::json!(IPV6_SPACE));
    }

    #[test]
    fn test_parse_cidr_forms() {
        assert_eq!(net("10.0.0.7").prefix(), 32);
        assert_eq!(net("::1").prefix(), 128);
        assert_eq!(net("10.0.0.0/255.255.0.0").prefix(), 16);
        assert_eq!(net("10.0.0.0/0.0.255.255").prefix(), 16);
        assert!(matches!(
            NetworkRange::parse_cidr("10.0.0.300/8", false),
            Err(NetError::Format(_))
        ));
        assert!(matches!(
            NetworkRange::parse_cidr("10.0.0.0/33", false),
            Err(NetError::Range(_))
        ));
        assert!(matches!(
            NetworkRange::parse_cidr("10.0.0.0/abc", false),
            Err(NetError::Format(_))
        ));
        assert!(matches!(
            NetworkRange::parse_cidr("2001:db8::/129", false),
            Err(NetError::Range(_))
        ));
    }

    #[test]
    fn test_parse_cidr_strict() {
        assert!(NetworkRange::parse_cidr("10.0.0.0/8", true).is_ok());
        assert_eq!(
            NetworkRange::parse_cidr("10.0.0.1/8", true).unwrap_err(),
            NetError::Parse("10.0.0.1/8 has host bits set".to_string())
        );
    }

    #[test]
    fn test_subnets() {
        let parent = net("10.1.1.0/24");
        let children: Vec<String> = parent.subnets(26).unwrap().map(|s| s.cidr()).collect();
        assert_eq!(
            children,
            vec!["10.1.1.0/26", "10.1.1.64/26", "10.1.1.128/26", "10.1.1.192/26"]
        );
        assert_eq!(parent.subnets(24).unwrap().count(), 1);
        assert!(parent.subnets(23).is_err());
        assert!(parent.subnets(33).is_err());
    }

    #[test]
    fn test_subnets_at_top_of_space() {
        let top = net("255.255.255.0/24");
        let last = top.subnets(25).unwrap().last().unwrap();
        assert_eq!(last.cidr(), "255.255.255.128/25");
        assert_eq!(net("::/0").subnets(0).unwrap().count(), 1);
    }

    #[test]
    fn test_contains() {
        let n = net("10.0.0.0/30");
        assert!(n.contains(addr_value("10.0.0.3".parse().unwrap())));
        assert!(!n.contains(addr_value("10.0.0.4".parse().unwrap())));
    }
}
