//! ML-DSA-65 (FIPS 204) signature engine.
//!
//! Wallets depend only on the [`SignatureScheme`] contract:
//! - keygen is a pure function of a 32-byte seed,
//! - the public key can be recovered from the full 4032-byte secret key,
//! - sign/verify over arbitrary message bytes.
//!
//! Key and signature sizes are checked here before any lattice work runs.

use std::fmt;

use fips204::ml_dsa_65;
use fips204::traits::{KeyGen, SerDes, Signer, Verifier};
use thiserror::Error;
use zeroize::Zeroizing;

/// Seed length for deterministic key generation.
pub const SEED_BYTES: usize = 32;
/// ML-DSA-65 public key length.
pub const PUBLIC_KEY_BYTES: usize = ml_dsa_65::PK_LEN;
/// ML-DSA-65 secret key length.
pub const SECRET_KEY_BYTES: usize = ml_dsa_65::SK_LEN;
/// ML-DSA-65 signature length.
pub const SIGNATURE_BYTES: usize = ml_dsa_65::SIG_LEN;

/// Empty FIPS 204 context string; the node signs and verifies without one.
const CONTEXT: &[u8] = &[];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Invalid public key length: expected 1952 bytes, got {0}")]
    InvalidPublicKeyLength(usize),
    #[error("Invalid secret key length: expected 4032 bytes, got {0}")]
    InvalidSecretKeyLength(usize),
    #[error("Invalid signature length: expected 3309 bytes, got {0}")]
    InvalidSignatureLength(usize),
    #[error("Malformed key material: {0}")]
    MalformedKey(&'static str),
    #[error("Signing failed: {0}")]
    Signing(&'static str),
}

/// Public/secret key pair. The secret half is wiped on drop.
#[derive(Clone)]
pub struct KeyPair {
    pub public_key: Vec<u8>,
    pub secret_key: Zeroizing<Vec<u8>>,
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key_len", &self.public_key.len())
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Contract between wallets and the underlying post-quantum primitive.
pub trait SignatureScheme {
    /// Deterministic key generation: identical seeds give identical pairs.
    fn keygen(&self, seed: &[u8; SEED_BYTES]) -> KeyPair;

    /// Recover the public key from full secret key material.
    fn derive_public_key(&self, secret_key: &[u8]) -> Result<Vec<u8>, SignatureError>;

    /// Sign `message` with a full secret key.
    fn sign(&self, message: &[u8], secret_key: &[u8]) -> Result<Vec<u8>, SignatureError>;

    /// `true` only for a well-formed signature over `message` under `public_key`.
    fn verify(&self, signature: &[u8], message: &[u8], public_key: &[u8]) -> bool;
}

/// ML-DSA-65 backed by the `fips204` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct MlDsa65;

impl MlDsa65 {
    fn private_key(secret_key: &[u8]) -> Result<ml_dsa_65::PrivateKey, SignatureError> {
        if secret_key.len() != SECRET_KEY_BYTES {
            return Err(SignatureError::InvalidSecretKeyLength(secret_key.len()));
        }
        let mut bytes = Zeroizing::new([0u8; SECRET_KEY_BYTES]);
        bytes.copy_from_slice(secret_key);
        ml_dsa_65::PrivateKey::try_from_bytes(*bytes).map_err(SignatureError::MalformedKey)
    }

    fn public_key(public_key: &[u8]) -> Result<ml_dsa_65::PublicKey, SignatureError> {
        let bytes: [u8; PUBLIC_KEY_BYTES] = public_key
            .try_into()
            .map_err(|_| SignatureError::InvalidPublicKeyLength(public_key.len()))?;
        ml_dsa_65::PublicKey::try_from_bytes(bytes).map_err(SignatureError::MalformedKey)
    }
}

impl SignatureScheme for MlDsa65 {
    fn keygen(&self, seed: &[u8; SEED_BYTES]) -> KeyPair {
        let (pk, sk) = ml_dsa_65::KG::keygen_from_seed(seed);
        KeyPair {
            public_key: pk.into_bytes().to_vec(),
            secret_key: Zeroizing::new(sk.into_bytes().to_vec()),
        }
    }

    fn derive_public_key(&self, secret_key: &[u8]) -> Result<Vec<u8>, SignatureError> {
        let sk = Self::private_key(secret_key)?;
        Ok(sk.get_public_key().into_bytes().to_vec())
    }

    fn sign(&self, message: &[u8], secret_key: &[u8]) -> Result<Vec<u8>, SignatureError> {
        let sk = Self::private_key(secret_key)?;
        let signature = sk.try_sign(message, CONTEXT).map_err(SignatureError::Signing)?;
        Ok(signature.to_vec())
    }

    fn verify(&self, signature: &[u8], message: &[u8], public_key: &[u8]) -> bool {
        let pk = match Self::public_key(public_key) {
            Ok(pk) => pk,
            Err(e) => {
                log::debug!("ML-DSA-65 verify rejected public key: {}", e);
                return false;
            }
        };
        let sig: [u8; SIGNATURE_BYTES] = match signature.try_into() {
            Ok(sig) => sig,
            Err(_) => {
                log::debug!(
                    "ML-DSA-65 verify rejected signature of {} bytes",
                    signature.len()
                );
                return false;
            }
        };
        pk.verify(message, &sig, CONTEXT)
    }
}
