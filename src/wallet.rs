//! Quantum-resistant wallet: ML-DSA-65 keys with a quantum-hash address.
//!
//! A [`QuantumWallet`] is either **keyed** (holds the 4032-byte secret key and
//! can sign) or **watch-only** (public key and address only). The variant is
//! fixed at construction.
//!
//! The address is `quantum_hash(public_key)` as `0x` + 64 hex chars. The secret
//! key never participates, so a keyed and a watch-only wallet built from the
//! same public key report the same address.
//!
//! ```ignore
//! let wallet = QuantumWallet::from_seed_hex("0x0123...cdef")?;
//! let signature = wallet.sign("Hello KodeChain")?;
//! assert!(wallet.verify(&signature, "Hello KodeChain")?);
//! ```

use std::fmt;
use std::path::Path;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::address_utils::{AddressFormat, EVM_ADDRESS_BYTES, NATIVE_ADDRESS_BYTES};
use crate::hashing::{quantum_hash_bytes, Digest};
use crate::hex_utils::{self, HexError};
use crate::mldsa::{
    KeyPair, MlDsa65, SignatureError, SignatureScheme, PUBLIC_KEY_BYTES, SECRET_KEY_BYTES,
    SEED_BYTES, SIGNATURE_BYTES,
};

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Hex decode error: {0}")]
    Hex(#[from] HexError),
    #[error("Invalid seed length: expected 32 bytes, got {0}")]
    InvalidSeedLength(usize),
    #[error("Invalid secret key length: expected 4032 bytes, got {0}")]
    InvalidSecretKeyLength(usize),
    #[error("Invalid key length: expected 32 (seed) or 4032 (secret key) bytes, got {0}")]
    InvalidKeyLength(usize),
    #[error("Invalid public key length: expected 1952 bytes, got {0}")]
    InvalidPublicKeyLength(usize),
    #[error("Watch-only wallet has no secret key")]
    NoSecretKey,
    #[error("Signature error: {0}")]
    Signature(#[from] SignatureError),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Background task failed: {0}")]
    Background(String),
}

/// Public, shareable view of a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletInfo {
    pub address: String,
    pub evm_address: String,
    pub public_key: String,
    pub watch_only: bool,
}

impl WalletInfo {
    pub fn to_json(&self) -> Result<String, WalletError> {
        serde_json::to_string_pretty(self).map_err(|e| WalletError::Serialization(e.to_string()))
    }
}

/// ML-DSA-65 wallet. Keyed or watch-only, immutable once built.
#[derive(Clone)]
pub struct QuantumWallet {
    digest: Digest,
    address: String,
    public_key: Vec<u8>,
    secret_key: Option<Zeroizing<Vec<u8>>>,
}

impl QuantumWallet {
    fn assemble(public_key: Vec<u8>, secret_key: Option<Zeroizing<Vec<u8>>>) -> Self {
        let digest = quantum_hash_bytes(&public_key);
        let address = hex_utils::encode_hex(digest);
        log::debug!(
            "Wallet {} ({})",
            address,
            if secret_key.is_some() { "keyed" } else { "watch-only" }
        );
        Self {
            digest,
            address,
            public_key,
            secret_key,
        }
    }

    fn from_keypair(keypair: KeyPair) -> Self {
        let KeyPair {
            public_key,
            secret_key,
        } = keypair;
        Self::assemble(public_key, Some(secret_key))
    }

    // --- Construction ---

    /// Generate a new random wallet from the OS CSPRNG.
    pub fn create_random() -> Self {
        Self::create_random_with(&mut OsRng)
    }

    /// Generate a new random wallet, drawing the seed from `rng`.
    pub fn create_random_with<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut seed = Zeroizing::new([0u8; SEED_BYTES]);
        rng.fill_bytes(&mut seed[..]);
        Self::from_keypair(MlDsa65.keygen(&seed))
    }

    /// Deterministic wallet from a 32-byte seed.
    pub fn from_seed(seed: &[u8]) -> Result<Self, WalletError> {
        let seed: &[u8; SEED_BYTES] = seed
            .try_into()
            .map_err(|_| WalletError::InvalidSeedLength(seed.len()))?;
        Ok(Self::from_keypair(MlDsa65.keygen(seed)))
    }

    /// [`from_seed`](Self::from_seed) for a hex seed, with or without `0x`.
    pub fn from_seed_hex(seed_hex: &str) -> Result<Self, WalletError> {
        let seed = Zeroizing::new(hex_utils::decode_hex(seed_hex)?);
        Self::from_seed(&seed)
    }

    /// Keyed wallet from a full 4032-byte ML-DSA-65 secret key.
    pub fn from_secret_key(secret_key: &[u8]) -> Result<Self, WalletError> {
        if secret_key.len() != SECRET_KEY_BYTES {
            return Err(WalletError::InvalidSecretKeyLength(secret_key.len()));
        }
        let public_key = MlDsa65.derive_public_key(secret_key)?;
        Ok(Self::assemble(
            public_key,
            Some(Zeroizing::new(secret_key.to_vec())),
        ))
    }

    /// Import from either a 32-byte seed or a 4032-byte secret key.
    pub fn from_private_key(key: &[u8]) -> Result<Self, WalletError> {
        match key.len() {
            SEED_BYTES => Self::from_seed(key),
            SECRET_KEY_BYTES => Self::from_secret_key(key),
            n => Err(WalletError::InvalidKeyLength(n)),
        }
    }

    /// [`from_private_key`](Self::from_private_key) for hex input, with or without `0x`.
    pub fn from_private_key_hex(key_hex: &str) -> Result<Self, WalletError> {
        let key = Zeroizing::new(hex_utils::decode_hex(key_hex)?);
        Self::from_private_key(&key)
    }

    /// Watch-only wallet from a 1952-byte public key.
    pub fn watch_only(public_key: &[u8]) -> Result<Self, WalletError> {
        if public_key.len() != PUBLIC_KEY_BYTES {
            return Err(WalletError::InvalidPublicKeyLength(public_key.len()));
        }
        Ok(Self::assemble(public_key.to_vec(), None))
    }

    /// [`watch_only`](Self::watch_only) for a hex public key.
    pub fn watch_only_hex(public_key_hex: &str) -> Result<Self, WalletError> {
        Self::watch_only(&hex_utils::decode_hex(public_key_hex)?)
    }

    // --- Accessors ---

    /// Native address: `0x` + 64 hex chars.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// 20-byte EVM view of the address (last 20 bytes).
    pub fn evm_address(&self) -> String {
        hex_utils::encode_hex(&self.digest[NATIVE_ADDRESS_BYTES - EVM_ADDRESS_BYTES..])
    }

    /// Address in the requested format.
    pub fn formatted_address(&self, format: AddressFormat) -> String {
        match format {
            AddressFormat::Native => self.address.clone(),
            AddressFormat::Evm => self.evm_address(),
        }
    }

    pub fn public_key_bytes(&self) -> &[u8] {
        &self.public_key
    }

    /// Public key as `0x` hex.
    pub fn get_public_key(&self) -> String {
        hex_utils::encode_hex(&self.public_key)
    }

    /// Secret key as `0x` hex; `None` for watch-only wallets.
    pub fn get_private_key(&self) -> Option<String> {
        self.secret_key
            .as_ref()
            .map(|sk| hex_utils::encode_hex(sk.as_slice()))
    }

    pub fn is_watch_only(&self) -> bool {
        self.secret_key.is_none()
    }

    pub fn info(&self) -> WalletInfo {
        WalletInfo {
            address: self.address.clone(),
            evm_address: self.evm_address(),
            public_key: self.get_public_key(),
            watch_only: self.is_watch_only(),
        }
    }

    // --- Signing ---

    /// Sign raw bytes (or UTF-8 text), returning the raw signature.
    pub fn sign_bytes(&self, data: impl AsRef<[u8]>) -> Result<Vec<u8>, WalletError> {
        let secret_key = self.secret_key.as_ref().ok_or(WalletError::NoSecretKey)?;
        let message = data.as_ref();
        let signature = MlDsa65.sign(message, secret_key)?;
        log::debug!(
            "Wallet {} signed {} bytes ({} byte signature)",
            self.address,
            message.len(),
            signature.len()
        );
        Ok(signature)
    }

    /// Sign raw bytes (or UTF-8 text), returning the signature as `0x` hex.
    pub fn sign(&self, data: impl AsRef<[u8]>) -> Result<String, WalletError> {
        Ok(hex_utils::encode_hex(self.sign_bytes(data)?))
    }

    /// Check a hex signature over `message` against this wallet's public key.
    pub fn verify(&self, signature_hex: &str, message: impl AsRef<[u8]>) -> Result<bool, WalletError> {
        let signature = hex_utils::decode_hex(signature_hex)?;
        if signature.len() != SIGNATURE_BYTES {
            return Err(SignatureError::InvalidSignatureLength(signature.len()).into());
        }
        Ok(MlDsa65.verify(&signature, message.as_ref(), &self.public_key))
    }

    // --- Background work ---

    /// [`create_random`](Self::create_random) on tokio's blocking pool.
    pub async fn generate_in_background() -> Result<Self, WalletError> {
        tokio::task::spawn_blocking(Self::create_random)
            .await
            .map_err(|e| WalletError::Background(e.to_string()))
    }

    /// [`sign`](Self::sign) on tokio's blocking pool.
    pub async fn sign_in_background(&self, data: Vec<u8>) -> Result<String, WalletError> {
        let wallet = self.clone();
        tokio::task::spawn_blocking(move || wallet.sign(&data))
            .await
            .map_err(|e| WalletError::Background(e.to_string()))?
    }

    // --- Keystore ---

    /// Load from a file holding a hex seed or secret key.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, WalletError> {
        let contents = Zeroizing::new(std::fs::read_to_string(path.as_ref())?);
        let wallet = Self::from_private_key_hex(&contents)?;
        log::debug!("Loaded wallet {} from {}", wallet.address, path.as_ref().display());
        Ok(wallet)
    }

    /// Save the secret key as hex to a file (chmod 600 on Unix).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), WalletError> {
        let secret_key = self.secret_key.as_ref().ok_or(WalletError::NoSecretKey)?;
        let hex_str = Zeroizing::new(hex::encode(secret_key.as_slice()));
        std::fs::write(&path, hex_str.as_bytes())?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
        }
        log::debug!("Saved wallet {} to {}", self.address, path.as_ref().display());
        Ok(())
    }
}

impl fmt::Debug for QuantumWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuantumWallet")
            .field("address", &self.address)
            .field("watch_only", &self.is_watch_only())
            .field("secret_key", &"<redacted>")
            .finish()
    }
}
