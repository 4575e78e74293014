//! Mnemonic phrase generation and handling

use std::fmt;

use bip39::Mnemonic;
use zeroize::Zeroizing;

use crate::crypto::entropy::{generate_entropy, Entropy, EntropyStrength};
use crate::error::{Error, Result};

/// Length of a BIP39 seed in bytes
pub const SEED_LEN: usize = 64;

/// A validated BIP39 mnemonic phrase (English wordlist)
#[derive(Clone, PartialEq, Eq)]
pub struct MnemonicPhrase {
    phrase: Zeroizing<String>,
}

impl MnemonicPhrase {
    /// Parse and validate a phrase, normalizing it to NFKD single-space form
    pub fn parse(phrase: &str) -> Result<Self> {
        let mnemonic = parse_mnemonic(phrase)?;
        Ok(Self::from_mnemonic(&mnemonic))
    }

    fn from_mnemonic(mnemonic: &Mnemonic) -> Self {
        Self {
            phrase: Zeroizing::new(mnemonic.to_string()),
        }
    }

    /// The phrase as a single space-separated string
    pub fn as_str(&self) -> &str {
        &self.phrase
    }

    /// Iterate over the words in order
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.phrase.split(' ')
    }

    pub fn word_count(&self) -> usize {
        self.words().count()
    }
}

impl fmt::Debug for MnemonicPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MnemonicPhrase")
            .field("words", &self.word_count())
            .finish_non_exhaustive()
    }
}

/// A 512-bit BIP39 seed, wiped from memory when dropped
#[derive(Clone)]
pub struct Seed(Zeroizing<[u8; SEED_LEN]>);

impl Seed {
    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }
}

impl AsRef<[u8]> for Seed {
    fn as_ref(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(<redacted>)")
    }
}

fn parse_mnemonic(phrase: &str) -> Result<Mnemonic> {
    Mnemonic::parse(phrase).map_err(|e| Error::Encoding(format!("Invalid mnemonic: {}", e)))
}

/// Generate a new random mnemonic phrase with the specified strength
pub fn generate_mnemonic(strength: EntropyStrength) -> Result<MnemonicPhrase> {
    let entropy = generate_entropy(strength)?;
    entropy_to_mnemonic(&entropy)
}

/// Encode entropy as a mnemonic.
///
/// The entropy must be 16, 20, 24, 28 or 32 bytes long.
pub fn entropy_to_mnemonic(entropy: &[u8]) -> Result<MnemonicPhrase> {
    let mnemonic = Mnemonic::from_entropy(entropy)
        .map_err(|e| Error::Encoding(format!("Cannot encode {} bytes of entropy: {}", entropy.len(), e)))?;

    tracing::debug!(words = mnemonic.word_count(), "Encoded entropy as mnemonic");
    Ok(MnemonicPhrase::from_mnemonic(&mnemonic))
}

/// Decode a mnemonic back into the entropy it encodes, verifying the checksum
pub fn mnemonic_to_entropy(phrase: &str) -> Result<Entropy> {
    let mnemonic = parse_mnemonic(phrase)?;
    Ok(Zeroizing::new(mnemonic.to_entropy()))
}

/// Validate a mnemonic phrase
pub fn validate_mnemonic(phrase: &str) -> Result<()> {
    parse_mnemonic(phrase).map(|_| ())
}

/// Stretch a mnemonic and passphrase into a seed (PBKDF2-HMAC-SHA512, 2048 rounds)
pub fn mnemonic_to_seed(phrase: &str, passphrase: &str) -> Result<Seed> {
    let mnemonic = parse_mnemonic(phrase)?;
    Ok(Seed(Zeroizing::new(mnemonic.to_seed(passphrase))))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABANDON_ABOUT: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_generate_mnemonic() {
        let mnemonic = generate_mnemonic(EntropyStrength::Bits256).unwrap();
        assert!(validate_mnemonic(mnemonic.as_str()).is_ok());
        assert_eq!(mnemonic.word_count(), 24);
    }

    #[test]
    fn test_round_trip_all_strengths() {
        for strength in EntropyStrength::ALL {
            let entropy: Vec<u8> = (0..strength.byte_len() as u8).map(|b| b.wrapping_mul(37)).collect();
            let mnemonic = entropy_to_mnemonic(&entropy).unwrap();
            assert_eq!(mnemonic.word_count(), strength.word_count());

            let decoded = mnemonic_to_entropy(mnemonic.as_str()).unwrap();
            assert_eq!(*decoded, entropy);
        }
    }

    #[test]
    fn test_zero_entropy_vectors() {
        let mnemonic = entropy_to_mnemonic(&[0u8; 16]).unwrap();
        assert_eq!(mnemonic.as_str(), ABANDON_ABOUT);

        let mnemonic = entropy_to_mnemonic(&[0u8; 32]).unwrap();
        let words: Vec<&str> = mnemonic.words().collect();
        assert_eq!(words.len(), 24);
        assert!(words[..23].iter().all(|w| *w == "abandon"));
        assert_eq!(words[23], "art");
    }

    #[test]
    fn test_unsupported_entropy_length() {
        for len in [0usize, 8, 15, 17, 33, 64] {
            let err = entropy_to_mnemonic(&vec![0u8; len]).unwrap_err();
            assert!(matches!(err, Error::Encoding(_)), "length {}", len);
        }
    }

    #[test]
    fn test_validate_mnemonic() {
        let invalid = "invalid mnemonic phrase test test test test test test test test test";
        let bad_checksum = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon";

        assert!(validate_mnemonic(ABANDON_ABOUT).is_ok());
        assert!(matches!(validate_mnemonic(invalid), Err(Error::Encoding(_))));
        assert!(matches!(validate_mnemonic(bad_checksum), Err(Error::Encoding(_))));
    }

    #[test]
    fn test_mnemonic_to_seed() {
        let seed = mnemonic_to_seed(ABANDON_ABOUT, "").unwrap();
        assert_eq!(
            hex::encode(seed.as_bytes()),
            "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc1\
             9a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
        );

        let again = mnemonic_to_seed(ABANDON_ABOUT, "").unwrap();
        assert_eq!(seed.as_bytes(), again.as_bytes());
    }

    #[test]
    fn test_seed_rejects_unknown_word() {
        let phrase = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon zzzz";
        assert!(matches!(mnemonic_to_seed(phrase, ""), Err(Error::Encoding(_))));
    }

    #[test]
    fn test_parsed_mnemonic_is_wiped_on_drop() {
        fn assert_wiped_on_drop<T: zeroize::Zeroize + zeroize::ZeroizeOnDrop>() {}
        assert_wiped_on_drop::<Mnemonic>();
    }

    #[test]
    fn test_debug_hides_words() {
        let mnemonic = MnemonicPhrase::parse(ABANDON_ABOUT).unwrap();
        let debug = format!("{:?}", mnemonic);
        assert!(!debug.contains("abandon"));
        assert!(!format!("{:?}", mnemonic_to_seed(ABANDON_ABOUT, "").unwrap()).contains("5eb0"));
    }
}
