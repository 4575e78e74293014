//! Error types for the evm-wallet library

use thiserror::Error;

/// Custom error type for evm-wallet operations
///
/// Every variant is fatal for the generation run: nothing retries, and a
/// wallet is only reported once it has been derived and written to disk.
#[derive(Error, Debug)]
pub enum Error {
    /// The operating system random source failed
    #[error("Entropy error: {0}")]
    Entropy(String),

    /// Unsupported entropy strength or malformed mnemonic
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// An intermediate extended key was invalid
    #[error("Key derivation error: {0}")]
    Derivation(String),

    /// The final key material is not a valid secp256k1 scalar
    #[error("Key error: {0}")]
    Key(String),

    /// The wallet record could not be written
    #[error("Persistence error: {context}")]
    Persistence {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    pub(crate) fn persistence(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Persistence {
            context: context.into(),
            source,
        }
    }
}

/// Result type for evm-wallet operations
pub type Result<T> = std::result::Result<T, Error>;
