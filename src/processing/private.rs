//! Private (non globally reachable) address tables.
//!
//! Entries follow the IANA IPv4 and IPv6 special-purpose address registries.

use crate::models::{addr_value, Family, NetworkRange};
use std::net::IpAddr;

const PRIVATE_V4: &[&str] = &[
    "0.0.0.0/8",
    "10.0.0.0/8",
    "127.0.0.0/8",
    "169.254.0.0/16",
    "172.16.0.0/12",
    "192.0.0.0/29",
    "192.0.0.170/31",
    "192.0.2.0/24",
    "192.168.0.0/16",
    "198.18.0.0/15",
    "198.51.100.0/24",
    "203.0.113.0/24",
    "240.0.0.0/4",
    "255.255.255.255/32",
];

/// Globally reachable blocks carved out of the private ones.
const PUBLIC_V4_EXCEPTIONS: &[&str] = &["192.0.0.9/32", "192.0.0.10/32"];

const PRIVATE_V6: &[&str] = &[
    "::1/128",
    "::/128",
    "::ffff:0:0/96",
    "64:ff9b:1::/48",
    "100::/64",
    "2001::/23",
    "2001:db8::/32",
    "2002::/16",
    "fc00::/7",
    "fe80::/10",
];

const PUBLIC_V6_EXCEPTIONS: &[&str] = &[
    "2001:1::1/128",
    "2001:1::2/128",
    "2001:3::/32",
    "2001:4:112::/48",
    "2001:20::/28",
    "2001:30::/28",
];

fn in_table(table: &[&str], value: u128) -> bool {
    table
        .iter()
        .filter_map(|cidr| NetworkRange::parse_cidr(cidr, true).ok())
        .any(|net| net.contains(value))
}

/// Whether a single address is private.
pub fn is_private_addr(addr: IpAddr) -> bool {
    let (private, exceptions) = match Family::of(addr) {
        Family::V4 => (PRIVATE_V4, PUBLIC_V4_EXCEPTIONS),
        Family::V6 => (PRIVATE_V6, PUBLIC_V6_EXCEPTIONS),
    };
    let value = addr_value(addr);
    in_table(private, value) && !in_table(exceptions, value)
}

/// A network is private when both its first and last addresses are.
pub fn is_private(net: &NetworkRange) -> bool {
    is_private_addr(net.network_addr()) && is_private_addr(net.broadcast_addr())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn private(text: &str) -> bool {
        is_private(&NetworkRange::parse_cidr(text, false).unwrap())
    }

    #[test]
    fn test_tables_parse() {
        for cidr in PRIVATE_V4
            .iter()
            .chain(PUBLIC_V4_EXCEPTIONS)
            .chain(PRIVATE_V6)
            .chain(PUBLIC_V6_EXCEPTIONS)
        {
            assert!(NetworkRange::parse_cidr(cidr, true).is_ok(), "{cidr}");
        }
    }

    #[test]
    fn test_private_v4() {
        assert!(private("192.168.1.0/24"));
        assert!(private("10.10.0.0/16"));
        assert!(private("172.31.255.255"));
        assert!(!private("172.32.0.0/16"));
        assert!(!private("8.8.8.8"));
        assert!(!private("192.0.0.9"));
        // Straddles 10.0.0.0/8 and public space
        assert!(!private("10.0.0.0/7"));
    }

    #[test]
    fn test_private_v6() {
        assert!(private("fd00::/8"));
        assert!(private("fe80::1"));
        assert!(private("2001:db8::/48"));
        assert!(!private("2606:4700::1111"));
        assert!(!private("2001:3::/32"));
    }
}
