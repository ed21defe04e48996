//! Quantum hash: the identity digest behind addresses and function selectors.
//!
//! Inputs are normalized before hashing:
//! - text starting with `0x` is hex-decoded (the marker is dropped),
//! - any other text is hashed as its UTF-8 bytes,
//! - byte slices are hashed as-is.

use thiserror::Error;

use crate::hex_utils::{self, HexError, HEX_PREFIX};
use crate::sponge::{SpongeState, STATE_BYTES};

/// 32-byte digest.
pub type Digest = [u8; STATE_BYTES];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HashError {
    #[error("Invalid hex input: {0}")]
    Hex(#[from] HexError),
}

/// Input accepted by [`quantum_hash`].
#[derive(Debug, Clone, Copy)]
pub enum HashInput<'a> {
    Text(&'a str),
    Bytes(&'a [u8]),
}

impl<'a> HashInput<'a> {
    /// Resolve to the byte sequence that is actually absorbed.
    pub fn normalize(self) -> Result<Vec<u8>, HashError> {
        match self {
            HashInput::Text(text) => match text.strip_prefix(HEX_PREFIX) {
                Some(_) => Ok(hex_utils::decode_hex(text)?),
                None => Ok(text.as_bytes().to_vec()),
            },
            HashInput::Bytes(bytes) => Ok(bytes.to_vec()),
        }
    }
}

impl<'a> From<&'a str> for HashInput<'a> {
    fn from(text: &'a str) -> Self {
        HashInput::Text(text)
    }
}

impl<'a> From<&'a String> for HashInput<'a> {
    fn from(text: &'a String) -> Self {
        HashInput::Text(text.as_str())
    }
}

impl<'a> From<&'a [u8]> for HashInput<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        HashInput::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for HashInput<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        HashInput::Bytes(bytes.as_slice())
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for HashInput<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        HashInput::Bytes(bytes.as_slice())
    }
}

/// Digest raw bytes. Infallible since no normalization is needed.
pub fn quantum_hash_bytes(data: &[u8]) -> Digest {
    let mut sponge = SpongeState::new();
    sponge.absorb(data);
    let digest = sponge.squeeze_digest();
    log::trace!("quantum_hash: {} bytes absorbed", data.len());
    digest
}

/// Digest text or bytes after normalization.
pub fn quantum_hash<'a>(input: impl Into<HashInput<'a>>) -> Result<Digest, HashError> {
    let bytes = input.into().normalize()?;
    Ok(quantum_hash_bytes(&bytes))
}

/// [`quantum_hash`] as `0x`-prefixed lowercase hex.
pub fn quantum_hash_hex<'a>(input: impl Into<HashInput<'a>>) -> Result<String, HashError> {
    Ok(hex_utils::encode_hex(quantum_hash(input)?))
}
