//! SDK configuration: TOML-backed defaults for address display, ABI decoding and the keystore.

use serde::{Deserialize, Serialize};
use std::path::Path;
use anyhow::{Context, Result};

use crate::abi::{AbiCoder, DecodeMode};
use crate::address_utils::AddressFormat;
use crate::wallet::QuantumWallet;

/// SDK configuration (stored as `kodechain.toml`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// How addresses are displayed: `native` (32-byte) or `evm` (20-byte view)
    #[serde(default)]
    pub address_format: AddressFormat,

    /// ABI decode behavior on length mismatch: `strict` or `lenient`
    #[serde(default)]
    pub decode_mode: DecodeMode,

    /// Path to the hex keystore file (seed or secret key)
    #[serde(default = "default_keystore_path")]
    pub keystore_path: String,
}

fn default_keystore_path() -> String { "./wallet.key".into() }

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            address_format: AddressFormat::default(),
            decode_mode: DecodeMode::default(),
            keystore_path: default_keystore_path(),
        }
    }
}

impl CoreConfig {
    /// Load config from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("reading config {}", path.as_ref().display()))?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// ABI coder using the configured decode mode.
    pub fn abi_coder(&self) -> AbiCoder {
        AbiCoder::new(self.decode_mode)
    }

    /// Wallet address in the configured display format.
    pub fn display_address(&self, wallet: &QuantumWallet) -> String {
        wallet.formatted_address(self.address_format)
    }

    /// Load the wallet stored at `keystore_path`.
    pub fn load_wallet(&self) -> Result<QuantumWallet> {
        QuantumWallet::load(&self.keystore_path)
            .with_context(|| format!("loading keystore {}", self.keystore_path))
    }

    /// Save a keyed wallet to `keystore_path`.
    pub fn save_wallet(&self, wallet: &QuantumWallet) -> Result<()> {
        wallet
            .save(&self.keystore_path)
            .with_context(|| format!("saving keystore {}", self.keystore_path))
    }
}
