//! # KodeChain SDK
//!
//! Core toolkit for the KodeChain blockchain:
//!
//! - **Hashing**: 32-byte sponge "quantum hash" used for addresses and selectors
//! - **ABI**: word-per-parameter call-data encoding and positional decoding
//! - **Wallet**: ML-DSA-65 quantum-resistant keys, signing, keystore files
//! - **Address utilities**: native 32-byte and EVM 20-byte address formats

// Hash engine
pub mod sponge;
pub mod hashing;
pub mod hex_utils;

// ABI
pub mod abi;

// Wallet
pub mod mldsa;
pub mod address_utils;
pub mod wallet;
pub mod config;

// Hash exports
pub use sponge::SpongeState;
pub use hashing::{quantum_hash, quantum_hash_bytes, quantum_hash_hex, Digest, HashError, HashInput};
pub use hex_utils::HexError;

// ABI exports
pub use abi::{
    decode_parameters, encode_function_call, encode_parameters, function_selector, AbiCoder,
    AbiError, AbiType, AbiValue, DecodeMode,
};

// Wallet exports
pub use mldsa::{KeyPair, MlDsa65, SignatureError, SignatureScheme};
pub use wallet::{QuantumWallet, WalletError, WalletInfo};
pub use address_utils::{AddressError, AddressFormat};
pub use config::CoreConfig;
