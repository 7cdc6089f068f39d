//! Field validators
//!
//! Range and format checks for individual definition fields. Integer fields
//! accept JSON numbers or decimal/`0x`-prefixed strings; each check returns
//! the normalized value.

use ccf_common::{ClassifierError, ClassifierResult};
use serde_json::Value;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Ethertype value declaring an IPv4 payload
pub const ETHERTYPE_IPV4: i64 = 0x0800;

/// Ethertype value declaring an IPv6 payload
pub const ETHERTYPE_IPV6: i64 = 0x86DD;

/// The 21 standard DSCP codepoints (CS0-CS7, AF11-AF43, EF)
pub const DSCP_VALID_MARKS: [i64; 21] = [
    0, 8, 10, 12, 14, 16, 18, 20, 22, 24, 26, 28, 30, 32, 34, 36, 38, 40, 46, 48, 56,
];

/// The four ECN codepoints
pub const ECN_VALID_MARKS: [i64; 4] = [0, 1, 2, 3];

fn invalid_mark(field: &str, value: impl ToString) -> ClassifierError {
    ClassifierError::InvalidClassificationMark {
        field: field.to_string(),
        value: value.to_string(),
    }
}

fn invalid_mask(field: &str, value: impl ToString) -> ClassifierError {
    ClassifierError::InvalidClassificationMask {
        field: field.to_string(),
        value: value.to_string(),
    }
}

/// Extract an integer from a JSON number or a decimal/hex string
pub fn parse_int_value(field: &str, value: &Value) -> ClassifierResult<i64> {
    match value {
        Value::Number(n) => n.as_i64().ok_or_else(|| invalid_mark(field, n)),
        Value::String(s) => {
            let s = s.trim();
            let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                i64::from_str_radix(hex, 16).ok()
            } else {
                s.parse::<i64>().ok()
            };
            parsed.ok_or_else(|| invalid_mark(field, s))
        }
        other => Err(invalid_mark(field, other)),
    }
}

/// Extract a string from a JSON value
pub fn string_value<'a>(field: &str, value: &'a Value) -> ClassifierResult<&'a str> {
    value.as_str().ok_or_else(|| invalid_mark(field, value))
}

/// DSCP mark: one of the standard codepoints
pub fn check_valid_dscp_mark(dscp: i64) -> ClassifierResult<i64> {
    if DSCP_VALID_MARKS.contains(&dscp) {
        Ok(dscp)
    } else {
        Err(invalid_mark("dscp", dscp))
    }
}

/// DSCP mask: six mask bits
pub fn check_valid_dscp_mask(mask: i64) -> ClassifierResult<i64> {
    if (0..=63).contains(&mask) {
        Ok(mask)
    } else {
        Err(invalid_mask("dscp", mask))
    }
}

/// ECN mark: two codepoint bits
pub fn check_valid_ecn_mark(ecn: i64) -> ClassifierResult<i64> {
    if ECN_VALID_MARKS.contains(&ecn) {
        Ok(ecn)
    } else {
        Err(invalid_mark("ecn", ecn))
    }
}

/// ECN mask: two mask bits
pub fn check_valid_ecn_mask(mask: i64) -> ClassifierResult<i64> {
    if (0..=3).contains(&mask) {
        Ok(mask)
    } else {
        Err(invalid_mask("ecn", mask))
    }
}

/// IP protocol / IPv6 next-header number
pub fn check_valid_protocol_mark(protocol: i64) -> ClassifierResult<i64> {
    if (0..=255).contains(&protocol) {
        Ok(protocol)
    } else {
        Err(invalid_mark("protocol", protocol))
    }
}

/// IPv4 address: exactly four dot-separated octets in [0,255]
pub fn check_valid_ipv4_address(address: &str) -> ClassifierResult<Ipv4Addr> {
    address
        .parse::<Ipv4Addr>()
        .map_err(|_| invalid_mark("address", address))
}

/// IPv4 prefix length in [0,32]
pub fn check_valid_ipv4_cidr(cidr: i64) -> ClassifierResult<u8> {
    if (0..=32).contains(&cidr) {
        Ok(cidr as u8)
    } else {
        Err(invalid_mask("cidr", cidr))
    }
}

/// IPv6 address in RFC 4291 textual form
pub fn check_valid_ipv6_address(address: &str) -> ClassifierResult<Ipv6Addr> {
    address
        .parse::<Ipv6Addr>()
        .map_err(|_| invalid_mark("address", address))
}

/// IPv6 prefix length in [0,128]
pub fn check_valid_ipv6_cidr(cidr: i64) -> ClassifierResult<u8> {
    if (0..=128).contains(&cidr) {
        Ok(cidr as u8)
    } else {
        Err(invalid_mask("cidr", cidr))
    }
}

/// MAC address: six colon-separated hex octets
pub fn check_valid_mac_address(address: &str) -> ClassifierResult<[u8; 6]> {
    let mut octets = [0u8; 6];
    let mut parts = address.split(':');
    for slot in &mut octets {
        let part = parts
            .next()
            .filter(|p| p.len() == 2)
            .ok_or_else(|| invalid_mark("mac address", address))?;
        *slot = u8::from_str_radix(part, 16).map_err(|_| invalid_mark("mac address", address))?;
    }
    if parts.next().is_some() {
        return Err(invalid_mark("mac address", address));
    }
    Ok(octets)
}

/// Ethertype in [0,0xFFFF]
pub fn check_valid_ethertype(ethertype: i64) -> ClassifierResult<i64> {
    if (0..=0xFFFF).contains(&ethertype) {
        Ok(ethertype)
    } else {
        Err(invalid_mark("ethertype", ethertype))
    }
}

/// Transport port in [0,65535]
pub fn check_valid_port(port: i64) -> ClassifierResult<i64> {
    if (0..=65_535).contains(&port) {
        Ok(port)
    } else {
        Err(invalid_mark("port", port))
    }
}

/// Header/payload length bound in [0,65535]
pub fn check_valid_length(length: i64) -> ClassifierResult<i64> {
    if (0..=65_535).contains(&length) {
        Ok(length)
    } else {
        Err(invalid_mark("length", length))
    }
}

/// TTL / hop-limit bound in [0,255]
pub fn check_valid_ttl(ttl: i64) -> ClassifierResult<i64> {
    if (0..=255).contains(&ttl) {
        Ok(ttl)
    } else {
        Err(invalid_mark("ttl", ttl))
    }
}

/// Header flag bits in [0,255]
pub fn check_valid_flags(flags: i64) -> ClassifierResult<i64> {
    if (0..=255).contains(&flags) {
        Ok(flags)
    } else {
        Err(invalid_mark("flags", flags))
    }
}

/// Flag mask bits in [0,255]
pub fn check_valid_flags_mask(mask: i64) -> ClassifierResult<i64> {
    if (0..=255).contains(&mask) {
        Ok(mask)
    } else {
        Err(invalid_mask("flags", mask))
    }
}

/// TCP window bound in [0,65535]
pub fn check_valid_window(window: i64) -> ClassifierResult<i64> {
    if (0..=65_535).contains(&window) {
        Ok(window)
    } else {
        Err(invalid_mark("window", window))
    }
}
