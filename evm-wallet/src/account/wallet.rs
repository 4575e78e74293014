//! Wallet generation pipeline
//!
//! entropy -> mnemonic -> seed -> m/44'/60'/0'/0/0 -> address

use std::fmt;

use chrono::{DateTime, Local};
use rand::{rngs::OsRng, CryptoRng, RngCore};
use serde::{Serialize, Serializer};

use crate::account::Address;
use crate::crypto::entropy::{generate_entropy_with, EntropyStrength};
use crate::crypto::keys::{derive_from_seed, DerivationPath, KeyPair, PrivateKey, PublicKey};
use crate::crypto::mnemonic::{entropy_to_mnemonic, mnemonic_to_seed, MnemonicPhrase};
use crate::error::Result;

/// A freshly generated Ethereum wallet
///
/// Immutable once created. The mnemonic and private key are wiped from
/// memory when the wallet is dropped.
#[derive(Clone)]
pub struct Wallet {
    mnemonic: MnemonicPhrase,
    path: DerivationPath,
    key_pair: KeyPair,
    created_at: DateTime<Local>,
}

impl Wallet {
    pub fn mnemonic(&self) -> &MnemonicPhrase {
        &self.mnemonic
    }

    pub fn derivation_path(&self) -> &DerivationPath {
        &self.path
    }

    pub fn private_key(&self) -> &PrivateKey {
        self.key_pair.private_key()
    }

    pub fn public_key(&self) -> &PublicKey {
        self.key_pair.public_key()
    }

    pub fn address(&self) -> &Address {
        self.key_pair.address()
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    /// Serializable view of everything the wallet discloses
    pub fn record(&self) -> WalletRecord<'_> {
        WalletRecord {
            mnemonic: self.mnemonic.as_str(),
            derivation_path: self.path.to_string(),
            address: *self.address(),
            private_key: self.private_key(),
            created_at: self.created_at,
        }
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("path", &self.path.to_string())
            .field("address", &self.address().to_string())
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// The secret and public material of a wallet, as disclosed to the user
#[derive(Debug, Serialize)]
pub struct WalletRecord<'a> {
    pub mnemonic: &'a str,
    pub derivation_path: String,
    pub address: Address,
    #[serde(serialize_with = "serialize_private_key")]
    pub private_key: &'a PrivateKey,
    pub created_at: DateTime<Local>,
}

fn serialize_private_key<S: Serializer>(key: &&PrivateKey, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&key.to_hex())
}

/// Generate a new wallet using the operating system's random source
pub fn generate_wallet(strength: EntropyStrength) -> Result<Wallet> {
    generate_wallet_with_rng(&mut OsRng, strength)
}

/// Generate a new wallet using the given random source
pub fn generate_wallet_with_rng<R>(rng: &mut R, strength: EntropyStrength) -> Result<Wallet>
where
    R: RngCore + CryptoRng,
{
    let mnemonic = {
        let entropy = generate_entropy_with(rng, strength)?;
        entropy_to_mnemonic(&entropy)?
    };
    derive_wallet(&mnemonic)
}

/// Run the deterministic part of the pipeline for a mnemonic.
///
/// The seed is derived with an empty passphrase and the key is taken from
/// `m/44'/60'/0'/0/0`.
pub fn derive_wallet(mnemonic: &MnemonicPhrase) -> Result<Wallet> {
    let path = DerivationPath::ethereum();
    let leaf = {
        let seed = mnemonic_to_seed(mnemonic.as_str(), "")?;
        derive_from_seed(seed.as_ref(), &path)?
    };
    let key_pair = KeyPair::from_private_key(leaf.key_material())?;

    tracing::debug!(path = %path, address = %key_pair.address(), "Derived wallet");
    Ok(Wallet {
        mnemonic: mnemonic.clone(),
        path,
        key_pair,
        created_at: Local::now(),
    })
}
