//! Hex wire-format helpers.
//!
//! Every byte value that crosses the SDK boundary (digests, addresses, keys,
//! signatures, call data) is lowercase hex with a leading `0x`.

use rand::{CryptoRng, RngCore};
use thiserror::Error;

/// Marker prefixed to every hex value on the wire.
pub const HEX_PREFIX: &str = "0x";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HexError {
    #[error("Hex decode error: {0}")]
    Decode(#[from] hex::FromHexError),
    #[error("Hex value is not valid UTF-8 text")]
    Utf8,
}

/// Remove a leading `0x` if present.
pub fn strip_hex_prefix(value: &str) -> &str {
    value.strip_prefix(HEX_PREFIX).unwrap_or(value)
}

/// Add a leading `0x` unless one is already there.
pub fn add_hex_prefix(value: &str) -> String {
    if value.starts_with(HEX_PREFIX) {
        value.to_string()
    } else {
        format!("{HEX_PREFIX}{value}")
    }
}

/// Left-pad a hex value with zeros to `width` digits and re-prefix it.
pub fn pad_hex(value: &str, width: usize) -> String {
    format!("{HEX_PREFIX}{:0>width$}", strip_hex_prefix(value), width = width)
}

/// Encode bytes as `0x` + lowercase hex.
pub fn encode_hex(bytes: impl AsRef<[u8]>) -> String {
    format!("{HEX_PREFIX}{}", hex::encode(bytes))
}

/// Decode a hex string, with or without the `0x` marker.
pub fn decode_hex(value: &str) -> Result<Vec<u8>, HexError> {
    Ok(hex::decode(strip_hex_prefix(value.trim()))?)
}

/// `true` for `0x` followed by zero or more hex digits.
pub fn is_valid_hex(value: &str) -> bool {
    value
        .strip_prefix(HEX_PREFIX)
        .map(|digits| digits.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false)
}

/// UTF-8 text to `0x` hex.
pub fn string_to_hex(text: &str) -> String {
    encode_hex(text.as_bytes())
}

/// `0x` hex back to UTF-8 text.
pub fn hex_to_string(value: &str) -> Result<String, HexError> {
    let bytes = decode_hex(value)?;
    String::from_utf8(bytes).map_err(|_| HexError::Utf8)
}

/// Shorten an address for display: `0x1234...abcd`.
///
/// Values too short to shorten are returned unchanged.
pub fn shorten_address(address: &str, chars: usize) -> String {
    if address.len() < chars * 2 + HEX_PREFIX.len() || !address.is_ascii() {
        return address.to_string();
    }
    format!(
        "{}...{}",
        &address[..chars + HEX_PREFIX.len()],
        &address[address.len() - chars..]
    )
}

/// `length` random bytes from `rng`, hex encoded with the marker.
pub fn random_hex<R: RngCore + CryptoRng>(length: usize, rng: &mut R) -> String {
    let mut bytes = vec![0u8; length];
    rng.fill_bytes(&mut bytes);
    encode_hex(bytes)
}
