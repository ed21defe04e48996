//! Address derivation and conversion for KodeChain's two address widths.
//!
//! KodeChain uses two hex address formats:
//! - **native** (canonical): `0x` + 64 hex chars, the full 32-byte quantum hash
//!   of an ML-DSA-65 public key
//! - **evm** (compatibility): `0x` + 40 hex chars, the last 20 bytes of the native form
//!
//! Every address this crate derives is native. The EVM view is lossy and only
//! exists for endpoints that still expect 20-byte addresses.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hashing::quantum_hash_bytes;
use crate::hex_utils::{self, HexError};

/// Bytes in a canonical address.
pub const NATIVE_ADDRESS_BYTES: usize = 32;
/// Bytes in the EVM-compatible view.
pub const EVM_ADDRESS_BYTES: usize = 20;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AddressError {
    #[error("Invalid address format: {0}")]
    InvalidFormat(String),
    #[error("Hex decode error: {0}")]
    HexDecode(#[from] HexError),
}

/// Which width to present an address in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFormat {
    #[default]
    Native,
    Evm,
}

fn address_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^0x([0-9a-fA-F]{40}|[0-9a-fA-F]{64})$").ok())
        .as_ref()
}

/// Derive the native address of a public key.
///
/// Only the public key participates; the same key always yields the same address.
pub fn address_from_public_key(public_key: &[u8]) -> String {
    hex_utils::encode_hex(quantum_hash_bytes(public_key))
}

/// Parse a 20- or 32-byte `0x` address into 32 bytes.
///
/// - 20-byte: right-aligned (left-padded with 12 zero bytes)
/// - 32-byte: used directly
pub fn parse_address(input: &str) -> Result<[u8; NATIVE_ADDRESS_BYTES], AddressError> {
    if !input.starts_with(hex_utils::HEX_PREFIX) {
        return Err(AddressError::InvalidFormat(format!(
            "Address must start with 0x: {}",
            input
        )));
    }
    let bytes = hex_utils::decode_hex(input)?;
    let mut addr = [0u8; NATIVE_ADDRESS_BYTES];
    match bytes.len() {
        EVM_ADDRESS_BYTES => addr[NATIVE_ADDRESS_BYTES - EVM_ADDRESS_BYTES..].copy_from_slice(&bytes),
        NATIVE_ADDRESS_BYTES => addr.copy_from_slice(&bytes),
        n => {
            return Err(AddressError::InvalidFormat(format!(
                "Expected 20 or 32 bytes, got {}",
                n
            )));
        }
    }
    Ok(addr)
}

/// Normalize any accepted address to the native lowercase form.
pub fn to_native_address(input: &str) -> Result<String, AddressError> {
    Ok(hex_utils::encode_hex(parse_address(input)?))
}

/// 20-byte EVM view of an address (last 20 bytes).
pub fn to_evm_address(input: &str) -> Result<String, AddressError> {
    let bytes = parse_address(input)?;
    Ok(hex_utils::encode_hex(&bytes[NATIVE_ADDRESS_BYTES - EVM_ADDRESS_BYTES..]))
}

/// Render an address in the requested format.
pub fn format_address(input: &str, format: AddressFormat) -> Result<String, AddressError> {
    match format {
        AddressFormat::Native => to_native_address(input),
        AddressFormat::Evm => to_evm_address(input),
    }
}

/// Validate a 0x hex address (20 or 32 bytes).
pub fn is_valid_hex_address(addr: &str) -> bool {
    address_regex().map_or(false, |re| re.is_match(addr))
}

/// Validate a 20-byte 0x address.
pub fn is_valid_evm_address(addr: &str) -> bool {
    is_valid_hex_address(addr) && addr.len() == 2 + EVM_ADDRESS_BYTES * 2
}

/// Validate a 32-byte 0x address.
pub fn is_valid_native_address(addr: &str) -> bool {
    is_valid_hex_address(addr) && addr.len() == 2 + NATIVE_ADDRESS_BYTES * 2
}
