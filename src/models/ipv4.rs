//! IPv4 subnet mask utilities.
//!
//! Converts between a CIDR prefix length and the 32-bit mask it stands for,
//! enforcing the contiguous-mask rule in the other direction.

use crate::error::NetError;
use std::net::Ipv4Addr;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Convert a CIDR prefix length to a subnet mask as u32.
///
/// # Examples
/// ```
/// use ip_toolbox::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(len: u8) -> Result<u32, NetError> {
    if len > MAX_LENGTH {
        Err(NetError::range(format!(
            "prefix length {len} must be between 0 and {MAX_LENGTH}"
        )))
    } else {
        let right_len = MAX_LENGTH - len;
        let all_bits = u32::MAX as u64;

        let mask = (all_bits >> right_len) << right_len;

        Ok(mask as u32)
    }
}

/// Prefix length of a contiguous mask.
///
/// A mask whose 1-bits are not all ahead of its 0-bits is rejected.
pub fn mask_len(mask: u32) -> Result<u8, NetError> {
    let ones = mask.leading_ones();
    if ones + mask.trailing_zeros() != u32::BITS {
        return Err(NetError::range(format!(
            "non-contiguous mask {}",
            Ipv4Addr::from(mask)
        )));
    }
    Ok(ones as u8)
}

/// Parse a dotted mask such as `255.255.255.0` into its prefix length.
///
/// A hostmask (`0.0.0.255`) is accepted too, when the text is not a valid
/// netmask.
pub fn parse_mask(text: &str) -> Result<u8, NetError> {
    let mask: Ipv4Addr = text
        .trim()
        .parse()
        .map_err(|_| NetError::format(format!("invalid netmask {text}")))?;
    let mask = u32::from(mask);
    mask_len(mask).or_else(|e| mask_len(!mask).map_err(|_| e))
}
