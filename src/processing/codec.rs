//! IPv4 textual representations.
//!
//! Converts dotted addresses between decimal, binary and hex octets, and
//! netmasks between dotted form and prefix length.

use crate::error::NetError;
use crate::models::{get_cidr_mask, mask_len, MAX_LENGTH};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::sync::OnceLock;

static DECIMAL_REGEX: OnceLock<Regex> = OnceLock::new();
static BINARY_REGEX: OnceLock<Regex> = OnceLock::new();
static HEX_REGEX: OnceLock<Regex> = OnceLock::new();

fn decimal_regex() -> &'static Regex {
    DECIMAL_REGEX.get_or_init(|| Regex::new(r"^[0-9]+$").expect("Invalid Regex"))
}

fn binary_regex() -> &'static Regex {
    BINARY_REGEX.get_or_init(|| Regex::new(r"^[01]{8}$").expect("Invalid Regex"))
}

fn hex_regex() -> &'static Regex {
    HEX_REGEX.get_or_init(|| Regex::new(r"^[0-9A-Fa-f]{1,2}$").expect("Invalid Regex"))
}

/// Split a dotted address into exactly four trimmed parts.
fn split_octets(text: &str) -> Result<[&str; 4], NetError> {
    let parts: Vec<&str> = text.trim().split('.').map(str::trim).collect();
    <[&str; 4]>::try_from(parts).map_err(|parts| {
        NetError::format(format!(
            "address '{text}' must have 4 dot-separated parts, found {}",
            parts.len()
        ))
    })
}

/// Parse dotted-decimal octets, each 0-255.
pub fn decimal_octets(text: &str) -> Result<[u8; 4], NetError> {
    let mut octets = [0u8; 4];
    for (octet, part) in octets.iter_mut().zip(split_octets(text)?) {
        if !decimal_regex().is_match(part) {
            return Err(NetError::format(format!(
                "octet '{part}' of '{text}' is not a decimal number"
            )));
        }
        *octet = part.parse().map_err(|_| {
            NetError::range(format!("octet {part} of '{text}' must be between 0 and 255"))
        })?;
    }
    Ok(octets)
}

fn join_octets(octets: impl IntoIterator<Item = String>) -> String {
    octets.into_iter().collect::<Vec<_>>().join(".")
}

/// `192.168.1.1` -> `11000000.10101000.00000001.00000001`
pub fn decimal_to_binary(text: &str) -> Result<String, NetError> {
    let octets = decimal_octets(text)?;
    Ok(join_octets(octets.iter().map(|o| format!("{o:08b}"))))
}

/// Inverse of [`decimal_to_binary`]; every part must be eight 0/1 digits.
pub fn binary_to_decimal(text: &str) -> Result<String, NetError> {
    let parts = split_octets(text)?;
    let mut out = Vec::with_capacity(4);
    for part in parts {
        if !binary_regex().is_match(part) {
            return Err(NetError::format(format!(
                "part '{part}' of '{text}' must be exactly 8 binary digits"
            )));
        }
        let value = u8::from_str_radix(part, 2)
            .map_err(|e| NetError::format(format!("part '{part}' of '{text}': {e}")))?;
        out.push(value.to_string());
    }
    Ok(join_octets(out))
}

/// `192.168.1.1` -> `C0.A8.01.01`
pub fn decimal_to_hex(text: &str) -> Result<String, NetError> {
    let octets = decimal_octets(text)?;
    Ok(join_octets(octets.iter().map(|o| format!("{o:02X}"))))
}

/// Inverse of [`decimal_to_hex`]; parts are 1-2 hex digits, any case.
pub fn hex_to_decimal(text: &str) -> Result<String, NetError> {
    let parts = split_octets(text)?;
    let mut out = Vec::with_capacity(4);
    for part in parts {
        if !hex_regex().is_match(part) {
            return Err(NetError::format(format!(
                "part '{part}' of '{text}' must be 1-2 hex digits"
            )));
        }
        let value = u8::from_str_radix(part, 16)
            .map_err(|e| NetError::format(format!("part '{part}' of '{text}': {e}")))?;
        out.push(value.to_string());
    }
    Ok(join_octets(out))
}

/// `255.255.255.0` -> `24`. Rejects non-contiguous masks.
pub fn mask_to_prefix(text: &str) -> Result<String, NetError> {
    let mask = u32::from_be_bytes(decimal_octets(text)?);
    Ok(mask_len(mask)?.to_string())
}

/// `24` -> `255.255.255.0`
pub fn prefix_to_mask(text: &str) -> Result<String, NetError> {
    let trimmed = text.trim();
    let len: i64 = trimmed
        .parse()
        .map_err(|_| NetError::format(format!("prefix length '{trimmed}' is not a number")))?;
    if !(0..=MAX_LENGTH as i64).contains(&len) {
        return Err(NetError::range(format!(
            "prefix length {len} must be between 0 and {MAX_LENGTH}"
        )));
    }
    let mask = get_cidr_mask(len as u8)?;
    Ok(Ipv4Addr::from(mask).to_string())
}

/// One of the textual conversions, as named by the request layer.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Conversion {
    DecToBin,
    BinToDec,
    DecToHex,
    HexToDec,
    MaskToCidr,
    CidrToMask,
}

impl Conversion {
    pub fn apply(self, text: &str) -> Result<String, NetError> {
        match self {
            Conversion::DecToBin => decimal_to_binary(text),
            Conversion::BinToDec => binary_to_decimal(text),
            Conversion::DecToHex => decimal_to_hex(text),
            Conversion::HexToDec => hex_to_decimal(text),
            Conversion::MaskToCidr => mask_to_prefix(text),
            Conversion::CidrToMask => prefix_to_mask(text),
        }
    }
}

/// Apply `conversion` to every non-blank item.
///
/// All or nothing: the first invalid item fails the whole batch.
pub fn convert_batch<S: AsRef<str>>(
    conversion: Conversion,
    items: &[S],
) -> Result<Vec<String>, NetError> {
    let result: Vec<String> = items
        .iter()
        .map(AsRef::as_ref)
        .filter(|item| !item.trim().is_empty())
        .map(|item| conversion.apply(item))
        .collect::<Result<_, _>>()?;
    log::debug!("convert_batch({conversion:?}) converted {} items", result.len());
    Ok(result)
}
