//! EVM Wallet Core
//!
//! Generates a single Ethereum-compatible wallet: fresh entropy is encoded
//! as a BIP39 mnemonic, stretched into a seed, walked down the BIP44 path
//! `m/44'/60'/0'/0/0`, and the resulting key and address are written to a
//! plaintext record on disk.

pub mod error;
pub mod config;
pub mod crypto;
pub mod account;
pub mod storage;

use std::path::PathBuf;

// Re-export commonly used types for convenience
pub use error::{Error, Result};
pub use config::{MnemonicFormat, WalletConfig};
pub use account::{generate_wallet, Address, Wallet};
pub use crypto::entropy::EntropyStrength;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generate one wallet and persist it according to `config`.
///
/// Either both steps succeed or an error is returned; a wallet whose record
/// could not be written is never handed back.
pub fn create_wallet(config: &WalletConfig) -> Result<(Wallet, PathBuf)> {
    let wallet = generate_wallet(config.strength)?;
    let path = storage::persist_at(
        &wallet,
        &config.output_dir,
        config.mnemonic_format,
        wallet.created_at(),
    )?;
    Ok((wallet, path))
}
