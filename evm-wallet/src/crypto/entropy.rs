//! Entropy generation for new mnemonics

use rand::{rngs::OsRng, CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Supported BIP39 entropy strengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EntropyStrength {
    /// 12 words (128 bits)
    Bits128,
    /// 15 words (160 bits)
    Bits160,
    /// 18 words (192 bits)
    Bits192,
    /// 21 words (224 bits)
    Bits224,
    /// 24 words (256 bits)
    #[default]
    Bits256,
}

impl EntropyStrength {
    pub const ALL: [EntropyStrength; 5] = [
        Self::Bits128,
        Self::Bits160,
        Self::Bits192,
        Self::Bits224,
        Self::Bits256,
    ];

    /// Look up a strength by its size in bits
    pub fn from_bits(bits: usize) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|strength| strength.bits() == bits)
            .ok_or_else(|| Error::InvalidInput(format!("Unsupported entropy strength: {} bits", bits)))
    }

    /// Look up a strength by the number of mnemonic words it produces
    pub fn from_word_count(words: usize) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|strength| strength.word_count() == words)
            .ok_or_else(|| Error::InvalidInput(format!("Unsupported mnemonic length: {} words", words)))
    }

    /// Entropy size in bits
    pub fn bits(&self) -> usize {
        match self {
            Self::Bits128 => 128,
            Self::Bits160 => 160,
            Self::Bits192 => 192,
            Self::Bits224 => 224,
            Self::Bits256 => 256,
        }
    }

    /// Entropy size in bytes
    pub fn byte_len(&self) -> usize {
        self.bits() / 8
    }

    /// Number of words in the encoded mnemonic
    pub fn word_count(&self) -> usize {
        self.bits() / 32 * 3
    }
}

/// Raw entropy bytes, wiped from memory when dropped
pub type Entropy = Zeroizing<Vec<u8>>;

/// Generate entropy from the operating system's secure random source
pub fn generate_entropy(strength: EntropyStrength) -> Result<Entropy> {
    generate_entropy_with(&mut OsRng, strength)
}

/// Generate entropy from the given cryptographically secure generator.
///
/// A failing generator aborts generation. There is no fallback source.
pub fn generate_entropy_with<R>(rng: &mut R, strength: EntropyStrength) -> Result<Entropy>
where
    R: RngCore + CryptoRng,
{
    let mut entropy = Zeroizing::new(vec![0u8; strength.byte_len()]);
    rng.try_fill_bytes(&mut entropy)
        .map_err(|e| Error::Entropy(format!("Random source unavailable: {}", e)))?;

    tracing::debug!(bits = strength.bits(), "Generated entropy");
    Ok(entropy)
}
