//! IPv4 <-> IPv6 mapping.

use crate::error::NetError;
use std::net::{Ipv4Addr, Ipv6Addr};

fn non_blank<S: AsRef<str>>(items: &[S]) -> impl Iterator<Item = &str> {
    items
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
}

/// Embed each IPv4 address under `ipv6_prefix` by appending its dotted form.
///
/// This is textual: `2001:db8::` + `1.2.3.4` must itself be a valid IPv6
/// literal (`2001:db8::1.2.3.4`), which is then printed canonically.
pub fn v4_to_v6<S: AsRef<str>>(
    ipv4_list: &[S],
    ipv6_prefix: &str,
) -> Result<Vec<String>, NetError> {
    let prefix = ipv6_prefix.trim();
    non_blank(ipv4_list)
        .map(|text| -> Result<String, NetError> {
            let v4: Ipv4Addr = text
                .parse()
                .map_err(|_| NetError::format(format!("'{text}' is not a valid IPv4 address")))?;
            let literal = format!("{prefix}{v4}");
            let v6: Ipv6Addr = literal.parse().map_err(|_| {
                NetError::format(format!(
                    "prefix '{prefix}' with {v4} gives '{literal}', not a valid IPv6 address"
                ))
            })?;
            Ok(v6.to_string())
        })
        .collect()
}

/// Take the last 32 bits of each IPv6 address as an IPv4 address.
pub fn v6_to_v4<S: AsRef<str>>(ipv6_list: &[S]) -> Result<Vec<String>, NetError> {
    non_blank(ipv6_list)
        .map(|text| -> Result<String, NetError> {
            let v6: Ipv6Addr = text
                .parse()
                .map_err(|_| NetError::format(format!("'{text}' is not a valid IPv6 address")))?;
            let [.., a, b, c, d] = v6.octets();
            Ok(Ipv4Addr::new(a, b, c, d).to_string())
        })
        .collect()
}
