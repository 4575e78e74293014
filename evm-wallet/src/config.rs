//! Generation settings

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::crypto::entropy::EntropyStrength;

/// Directory wallet records are written to unless configured otherwise
pub const DEFAULT_OUTPUT_DIR: &str = "wallets";

/// How the mnemonic is laid out in the persisted record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MnemonicFormat {
    /// One word per line, numbered from 1
    #[default]
    Numbered,
    /// All words on a single line
    Inline,
}

/// Settings for a single generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    pub output_dir: PathBuf,
    pub strength: EntropyStrength,
    pub mnemonic_format: MnemonicFormat,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            strength: EntropyStrength::Bits256,
            mnemonic_format: MnemonicFormat::Numbered,
        }
    }
}

impl WalletConfig {
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_strength(mut self, strength: EntropyStrength) -> Self {
        self.strength = strength;
        self
    }

    pub fn with_mnemonic_format(mut self, format: MnemonicFormat) -> Self {
        self.mnemonic_format = format;
        self
    }
}
