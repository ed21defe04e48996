//! Call-data ABI codec.
//!
//! KodeChain contracts take parameters as a flat run of 32-byte words, one per
//! argument, with no length prefixes and no dynamic section:
//!
//! ```text
//! 0x | selector (8 hex) | word 0 (64 hex) | word 1 (64 hex) | ...
//! ```
//!
//! Encoding intent is explicit: callers build [`AbiValue`]s rather than letting
//! the codec guess from string shape.
//!
//! ```ignore
//! let data = encode_function_call(
//!     "transfer(address,uint256)",
//!     &[AbiValue::address("0x1234...")?, AbiValue::from(1_000_000u64)],
//! )?;
//! ```

use std::convert::Infallible;
use std::str::FromStr;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::address_utils;
use crate::hashing::quantum_hash_bytes;
use crate::hex_utils::{self, HEX_PREFIX};

/// Bytes in one ABI word.
pub const WORD_BYTES: usize = 32;
/// Hex characters in one ABI word.
pub const WORD_HEX_LEN: usize = WORD_BYTES * 2;
/// Bytes in a function selector.
pub const SELECTOR_BYTES: usize = 4;
/// Widest integer a word can carry.
pub const MAX_UINT_BITS: u64 = 256;

const EVM_ADDRESS_HEX_LEN: usize = 40;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AbiError {
    #[error("Integer needs {0} bits, a word holds at most 256")]
    IntegerOverflow(u64),
    #[error("Invalid address parameter: {0}")]
    InvalidAddress(String),
    #[error("Byte blob of {0} bytes does not fit in a 32-byte word")]
    BlobTooLong(usize),
    #[error("Invalid raw word: {0}")]
    InvalidWord(String),
    #[error("Call data is not valid hex: {0}")]
    InvalidCallData(String),
    #[error("Call data length mismatch: expected {expected} hex chars, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("Decoded string is not valid UTF-8")]
    InvalidText,
}

/// A single typed parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    /// Unsigned integer up to 256 bits.
    Uint(BigUint),
    /// `0x` + 40 or 64 hex chars, stored lowercase.
    Address(String),
    Bool(bool),
    /// Raw bytes, right-padded into the word.
    Bytes(Vec<u8>),
    /// UTF-8 text, encoded like [`AbiValue::Bytes`].
    Text(String),
    /// A verbatim word (`0x` + 64 hex). Produced when decoding an unknown type.
    Word(String),
}

impl AbiValue {
    pub fn uint(value: impl Into<BigUint>) -> Self {
        AbiValue::Uint(value.into())
    }

    /// Validated address parameter (20- or 32-byte hex).
    pub fn address(address: &str) -> Result<Self, AbiError> {
        if !address_utils::is_valid_hex_address(address) {
            return Err(AbiError::InvalidAddress(address.to_string()));
        }
        Ok(AbiValue::Address(address.to_ascii_lowercase()))
    }

    pub fn text(text: impl Into<String>) -> Self {
        AbiValue::Text(text.into())
    }

    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        AbiValue::Bytes(bytes.into())
    }

    pub fn as_uint(&self) -> Option<&BigUint> {
        match self {
            AbiValue::Uint(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AbiValue::Address(s) | AbiValue::Text(s) | AbiValue::Word(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AbiValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<u64> for AbiValue {
    fn from(value: u64) -> Self {
        AbiValue::Uint(BigUint::from(value))
    }
}

impl From<u128> for AbiValue {
    fn from(value: u128) -> Self {
        AbiValue::Uint(BigUint::from(value))
    }
}

impl From<BigUint> for AbiValue {
    fn from(value: BigUint) -> Self {
        AbiValue::Uint(value)
    }
}

impl From<bool> for AbiValue {
    fn from(value: bool) -> Self {
        AbiValue::Bool(value)
    }
}

/// Type tag used to interpret a word when decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiType {
    Uint256,
    /// Decoded as a non-negative integer, same as `uint256`.
    Int256,
    /// 20-byte address: last 40 hex chars of the word.
    Address,
    /// 32-byte address: the whole word.
    Address64,
    Bool,
    String,
    /// Anything else; decodes to [`AbiValue::Word`].
    Other(String),
}

impl AbiType {
    pub fn as_str(&self) -> &str {
        match self {
            AbiType::Uint256 => "uint256",
            AbiType::Int256 => "int256",
            AbiType::Address => "address",
            AbiType::Address64 => "address64",
            AbiType::Bool => "bool",
            AbiType::String => "string",
            AbiType::Other(name) => name,
        }
    }
}

impl FromStr for AbiType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "uint256" => AbiType::Uint256,
            "int256" => AbiType::Int256,
            "address" => AbiType::Address,
            "address64" => AbiType::Address64,
            "bool" => AbiType::Bool,
            "string" => AbiType::String,
            other => AbiType::Other(other.to_string()),
        })
    }
}

impl From<&str> for AbiType {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(ty) => ty,
            Err(never) => match never {},
        }
    }
}

/// How to treat call data whose length does not match the requested types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeMode {
    /// Reject with [`AbiError::LengthMismatch`].
    #[default]
    Strict,
    /// Decode positionally: extra words are ignored, a short trailing chunk is
    /// decoded from whatever is present.
    Lenient,
}

// --- Encoding ---

/// Encode one value into a 64-char word (no `0x`).
pub fn encode_parameter(value: &AbiValue) -> Result<String, AbiError> {
    match value {
        AbiValue::Uint(v) => {
            let bits = v.bits();
            if bits > MAX_UINT_BITS {
                return Err(AbiError::IntegerOverflow(bits));
            }
            Ok(left_pad(&v.to_str_radix(16)))
        }
        AbiValue::Address(addr) => {
            if !address_utils::is_valid_hex_address(addr) {
                return Err(AbiError::InvalidAddress(addr.clone()));
            }
            Ok(left_pad(&hex_utils::strip_hex_prefix(addr).to_ascii_lowercase()))
        }
        AbiValue::Bool(b) => Ok(left_pad(if *b { "1" } else { "0" })),
        AbiValue::Bytes(bytes) => encode_blob(bytes),
        AbiValue::Text(text) => encode_blob(text.as_bytes()),
        AbiValue::Word(word) => {
            let digits = hex_utils::strip_hex_prefix(word);
            if digits.len() != WORD_HEX_LEN || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(AbiError::InvalidWord(word.clone()));
            }
            Ok(digits.to_ascii_lowercase())
        }
    }
}

/// Concatenate the words of every value, in order.
pub fn encode_parameters(values: &[AbiValue]) -> Result<String, AbiError> {
    let mut out = String::with_capacity(values.len() * WORD_HEX_LEN);
    for value in values {
        out.push_str(&encode_parameter(value)?);
    }
    Ok(out)
}

/// 4-byte selector for a function signature, as 8 hex chars (no `0x`).
///
/// Whitespace is stripped first, so `"transfer(address, uint256)"` and
/// `"transfer(address,uint256)"` share a selector. Collisions are not detected.
pub fn function_selector(signature: &str) -> String {
    let normalized: String = signature.chars().filter(|c| !c.is_whitespace()).collect();
    let digest = quantum_hash_bytes(normalized.as_bytes());
    hex::encode(&digest[..SELECTOR_BYTES])
}

/// Full call data: `0x` + selector + encoded parameters.
pub fn encode_function_call(signature: &str, params: &[AbiValue]) -> Result<String, AbiError> {
    let selector = function_selector(signature);
    let encoded = encode_parameters(params)?;
    Ok(format!("{HEX_PREFIX}{selector}{encoded}"))
}

fn left_pad(digits: &str) -> String {
    format!("{:0>width$}", digits, width = WORD_HEX_LEN)
}

fn encode_blob(bytes: &[u8]) -> Result<String, AbiError> {
    if bytes.len() > WORD_BYTES {
        return Err(AbiError::BlobTooLong(bytes.len()));
    }
    Ok(format!("{:0<width$}", hex::encode(bytes), width = WORD_HEX_LEN))
}

// --- Decoding ---

/// Stateless codec carrying only the decode policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AbiCoder {
    mode: DecodeMode,
}

impl AbiCoder {
    pub fn new(mode: DecodeMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> DecodeMode {
        self.mode
    }

    /// See [`encode_parameters`].
    pub fn encode(&self, values: &[AbiValue]) -> Result<String, AbiError> {
        encode_parameters(values)
    }

    /// See [`encode_function_call`].
    pub fn encode_call(&self, signature: &str, params: &[AbiValue]) -> Result<String, AbiError> {
        encode_function_call(signature, params)
    }

    /// Split `data` into words and decode word `i` as `types[i]`.
    pub fn decode(&self, data: &str, types: &[AbiType]) -> Result<Vec<AbiValue>, AbiError> {
        let body = hex_utils::strip_hex_prefix(data.trim());
        if !body.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AbiError::InvalidCallData(data.to_string()));
        }

        let expected = types.len() * WORD_HEX_LEN;
        if body.len() != expected {
            match self.mode {
                DecodeMode::Strict => {
                    return Err(AbiError::LengthMismatch {
                        expected,
                        actual: body.len(),
                    });
                }
                DecodeMode::Lenient => {
                    log::warn!(
                        "Lenient ABI decode: {} hex chars for {} words ({} expected)",
                        body.len(),
                        types.len(),
                        expected
                    );
                }
            }
        }

        types
            .iter()
            .enumerate()
            .map(|(i, ty)| {
                let start = (i * WORD_HEX_LEN).min(body.len());
                let end = ((i + 1) * WORD_HEX_LEN).min(body.len());
                decode_word(&body[start..end], ty)
            })
            .collect()
    }
}

/// Strict positional decode. See [`AbiCoder::decode`].
pub fn decode_parameters(data: &str, types: &[AbiType]) -> Result<Vec<AbiValue>, AbiError> {
    AbiCoder::new(DecodeMode::Strict).decode(data, types)
}

fn decode_word(chunk: &str, ty: &AbiType) -> Result<AbiValue, AbiError> {
    match ty {
        AbiType::Uint256 | AbiType::Int256 => {
            if chunk.is_empty() {
                return Ok(AbiValue::Uint(BigUint::default()));
            }
            BigUint::parse_bytes(chunk.as_bytes(), 16)
                .map(AbiValue::Uint)
                .ok_or_else(|| AbiError::InvalidCallData(chunk.to_string()))
        }
        AbiType::Address => Ok(AbiValue::Address(format!(
            "{HEX_PREFIX}{}",
            tail(chunk, EVM_ADDRESS_HEX_LEN).to_ascii_lowercase()
        ))),
        AbiType::Address64 => Ok(AbiValue::Address(format!(
            "{HEX_PREFIX}{}",
            tail(chunk, WORD_HEX_LEN).to_ascii_lowercase()
        ))),
        AbiType::Bool => Ok(AbiValue::Bool(chunk.chars().any(|c| c != '0'))),
        AbiType::String => {
            let bytes =
                hex::decode(chunk).map_err(|_| AbiError::InvalidCallData(chunk.to_string()))?;
            let text = String::from_utf8(bytes).map_err(|_| AbiError::InvalidText)?;
            Ok(AbiValue::Text(text.trim_end_matches('\0').to_string()))
        }
        AbiType::Other(_) => Ok(AbiValue::Word(format!("{HEX_PREFIX}{chunk}"))),
    }
}

fn tail(chunk: &str, len: usize) -> &str {
    &chunk[chunk.len().saturating_sub(len)..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(value: AbiValue) -> String {
        encode_parameter(&value).unwrap()
    }

    #[test]
    fn test_encode_uint() {
        assert_eq!(word(AbiValue::from(0u64)), "0".repeat(64));
        assert_eq!(word(AbiValue::from(123u64)), format!("{}07b", "0".repeat(61)));

        let max = (BigUint::from(1u8) << 256) - 1u8;
        assert_eq!(word(AbiValue::uint(max)), "f".repeat(64));

        let too_big = BigUint::from(1u8) << 256;
        assert_eq!(
            encode_parameter(&AbiValue::uint(too_big)),
            Err(AbiError::IntegerOverflow(257))
        );
    }

    #[test]
    fn test_encode_address() {
        let address = "0x1234567890123456789012345678901234567890";
        let encoded = word(AbiValue::address(address).unwrap());
        assert_eq!(encoded, format!("{}{}", "0".repeat(24), &address[2..]));

        let native = format!("0x{}", "ab".repeat(32));
        assert_eq!(word(AbiValue::address(&native).unwrap()), "ab".repeat(32));

        assert!(AbiValue::address("0x1234").is_err());
        assert!(encode_parameter(&AbiValue::Address("not-an-address".into())).is_err());
    }

    #[test]
    fn test_encode_bool() {
        assert_eq!(word(AbiValue::from(true)), format!("{}1", "0".repeat(63)));
        assert_eq!(word(AbiValue::from(false)), "0".repeat(64));
    }

    #[test]
    fn test_encode_text_and_bytes() {
        let encoded = word(AbiValue::text("abc"));
        assert!(encoded.starts_with("616263"));
        assert_eq!(encoded.len(), 64);
        assert_eq!(encoded, word(AbiValue::bytes(b"abc".to_vec())));

        assert_eq!(word(AbiValue::bytes(vec![0xff; 32])), "ff".repeat(32));
        assert_eq!(
            encode_parameter(&AbiValue::bytes(vec![0u8; 33])),
            Err(AbiError::BlobTooLong(33))
        );
    }

    #[test]
    fn test_encode_parameters_concatenates() {
        let encoded = encode_parameters(&[
            AbiValue::from(1u64),
            AbiValue::from(true),
            AbiValue::text("hi"),
        ])
        .unwrap();
        assert_eq!(encoded.len(), 3 * 64);
        assert_eq!(&encoded[64..128], format!("{}1", "0".repeat(63)));
        assert!(encode_parameters(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_selector_shape_and_whitespace() {
        let selector = function_selector("transfer(address,uint256)");
        assert_eq!(selector.len(), 8);
        assert_eq!(function_selector("transfer(address, uint256)"), selector);
        assert_eq!(function_selector(" transfer ( address ,\tuint256 ) "), selector);
    }

    #[test]
    fn test_selector_fixtures() {
        // Short signatures leave the digest's leading bytes untouched.
        assert_eq!(function_selector("transfer(address,uint256)"), "00000000");
        assert_eq!(function_selector("transferFrom(address,address,uint256)"), "56eca0a0");
        assert_eq!(function_selector("approveAndCall(address,uint256,bytes32)"), "0ed6868c");
    }

    #[test]
    fn test_encode_function_call() {
        let data = encode_function_call(
            "transferFrom(address,address,uint256)",
            &[
                AbiValue::address("0x9876543210987654321098765432109876543210").unwrap(),
                AbiValue::address("0x1234567890123456789012345678901234567890").unwrap(),
                AbiValue::from(1_000_000u64),
            ],
        )
        .unwrap();
        assert!(data.starts_with("0x56eca0a0"));
        assert_eq!(data.len(), 2 + 8 + 3 * 64);
    }

    #[test]
    fn test_decode_uint_and_address() {
        let chunk = format!("{}07b", "0".repeat(61));
        let decoded = decode_parameters(&chunk, &[AbiType::Uint256]).unwrap();
        assert_eq!(decoded[0], AbiValue::from(123u64));

        let address = "1234567890123456789012345678901234567890";
        let chunk = format!("0x{}{}", "0".repeat(24), address);
        let decoded = decode_parameters(&chunk, &[AbiType::Address]).unwrap();
        assert_eq!(decoded[0], AbiValue::Address(format!("0x{}", address)));

        let decoded = decode_parameters(&chunk, &[AbiType::Address64]).unwrap();
        assert_eq!(decoded[0].as_str().unwrap().len(), 66);
    }

    #[test]
    fn test_round_trip() {
        let values = vec![
            AbiValue::from(u128::MAX),
            AbiValue::address("0x1234567890123456789012345678901234567890").unwrap(),
            AbiValue::from(true),
            AbiValue::from(false),
            AbiValue::address(&format!("0x{}", "cd".repeat(32))).unwrap(),
        ];
        let types = [
            AbiType::Uint256,
            AbiType::Address,
            AbiType::Bool,
            AbiType::Bool,
            AbiType::Address64,
        ];
        let encoded = encode_parameters(&values).unwrap();
        assert_eq!(decode_parameters(&encoded, &types).unwrap(), values);
    }

    #[test]
    fn test_decode_string_strips_trailing_nul() {
        let encoded = word(AbiValue::text("KodeChain"));
        let decoded = decode_parameters(&encoded, &[AbiType::String]).unwrap();
        assert_eq!(decoded[0], AbiValue::text("KodeChain"));
    }

    #[test]
    fn test_decode_unknown_type_returns_raw_word() {
        let encoded = word(AbiValue::from(5u64));
        let decoded = decode_parameters(&encoded, &["bytes32".into()]).unwrap();
        assert_eq!(decoded[0], AbiValue::Word(format!("0x{}", encoded)));
        // Raw words re-encode verbatim.
        assert_eq!(word(decoded[0].clone()), encoded);
    }

    #[test]
    fn test_strict_length_mismatch() {
        let encoded = encode_parameters(&[AbiValue::from(1u64), AbiValue::from(2u64)]).unwrap();
        let err = decode_parameters(&encoded, &[AbiType::Uint256]).unwrap_err();
        assert_eq!(err, AbiError::LengthMismatch { expected: 64, actual: 128 });

        let err = decode_parameters(&encoded[..100], &[AbiType::Uint256, AbiType::Uint256]);
        assert!(matches!(err, Err(AbiError::LengthMismatch { .. })));
    }

    #[test]
    fn test_lenient_decodes_positionally() {
        let coder = AbiCoder::new(DecodeMode::Lenient);
        let encoded = encode_parameters(&[AbiValue::from(1u64), AbiValue::from(2u64)]).unwrap();

        // Extra trailing word is ignored.
        let decoded = coder.decode(&encoded, &[AbiType::Uint256]).unwrap();
        assert_eq!(decoded, vec![AbiValue::from(1u64)]);

        // Missing word decodes as zero.
        let decoded = coder
            .decode(&encoded, &[AbiType::Uint256, AbiType::Uint256, AbiType::Uint256])
            .unwrap();
        assert_eq!(decoded[2], AbiValue::from(0u64));
    }

    #[test]
    fn test_decode_rejects_non_hex() {
        let bad = format!("0x{}zz", "0".repeat(62));
        assert!(matches!(
            decode_parameters(&bad, &[AbiType::Uint256]),
            Err(AbiError::InvalidCallData(_))
        ));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(AbiType::from("uint256"), AbiType::Uint256);
        assert_eq!(AbiType::from("address64"), AbiType::Address64);
        assert_eq!(AbiType::from("bytes32"), AbiType::Other("bytes32".into()));
        assert_eq!(AbiType::Bool.as_str(), "bool");
    }
}
