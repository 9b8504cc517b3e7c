//! Network calculator: describe the network an address belongs to.

use super::private::is_private;
use crate::error::NetError;
use crate::models::{parse_mask, parse_prefix, Family, NetworkInfo, NetworkRange};
use std::net::IpAddr;

/// Describe the network of `address` under `mask_or_prefix`.
///
/// `mask_or_prefix` is either a dotted IPv4 netmask or a prefix length.
/// Host bits in `address` are allowed and cleared.
pub fn describe(address: &str, mask_or_prefix: &str) -> Result<NetworkInfo, NetError> {
    let addr: IpAddr = address
        .trim()
        .parse()
        .map_err(|_| NetError::parse(format!("'{}' is not a valid IP address", address.trim())))?;
    let family = Family::of(addr);
    let mask_text = mask_or_prefix.trim().trim_start_matches('/');

    let prefix = if mask_text.contains('.') {
        if family != Family::V4 {
            return Err(NetError::parse(format!(
                "dotted netmask {mask_text} cannot be used with IPv6 address {addr}"
            )));
        }
        parse_mask(mask_text)?
    } else {
        let prefix = parse_prefix(mask_text)?;
        if prefix > Family::V6.bits() {
            return Err(NetError::range(format!(
                "prefix length {prefix} is larger than 128"
            )));
        }
        if prefix > family.bits() {
            return Err(NetError::parse(format!(
                "prefix length /{prefix} is not valid for {family} address {addr}"
            )));
        }
        prefix
    };

    let net = NetworkRange::new(addr, prefix)?;
    log::debug!("describe({addr}, {mask_text}) -> {}", net.cidr());
    Ok(NetworkInfo::new(&net, is_private(&net)))
}
