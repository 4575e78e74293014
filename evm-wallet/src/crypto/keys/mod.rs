//! Key derivation and management
//!
//! Hierarchical derivation lives in [`derivation`], secp256k1 key handling
//! and Ethereum address computation in [`ethereum`].

pub mod derivation;
pub mod ethereum;

use std::fmt;

use secp256k1::{Secp256k1, SecretKey};
use zeroize::Zeroizing;

use crate::account::Address;
use crate::error::{Error, Result};

pub use derivation::*;

/// A secp256k1 private key, wiped from memory when dropped
#[derive(Clone)]
pub struct PrivateKey {
    bytes: Zeroizing<[u8; 32]>,
}

impl PrivateKey {
    /// Create a private key, checking that it is a scalar in [1, n - 1]
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        SecretKey::from_slice(bytes)
            .map_err(|e| Error::Key(format!("Invalid private key: {}", e)))?;

        let mut key = Zeroizing::new([0u8; 32]);
        key.copy_from_slice(bytes);
        Ok(Self { bytes: key })
    }

    /// Get the raw private key bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Hex encoding with a `0x` prefix
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(format!("0x{}", hex::encode(self.bytes.as_slice())))
    }

    pub(crate) fn secret_key(&self) -> Result<SecretKey> {
        SecretKey::from_slice(self.bytes.as_slice())
            .map_err(|e| Error::Key(format!("Invalid private key: {}", e)))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// An uncompressed secp256k1 public key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    inner: secp256k1::PublicKey,
}

impl PublicKey {
    /// Compute the public key for a private key
    pub fn from_private_key(private_key: &PrivateKey) -> Result<Self> {
        let secp = Secp256k1::signing_only();
        let secret_key = private_key.secret_key()?;
        Ok(Self {
            inner: secp256k1::PublicKey::from_secret_key(&secp, &secret_key),
        })
    }

    /// 65-byte SEC1 uncompressed encoding (`0x04 || x || y`)
    pub fn to_uncompressed(&self) -> [u8; 65] {
        self.inner.serialize_uncompressed()
    }

    /// 33-byte SEC1 compressed encoding
    pub fn to_compressed(&self) -> [u8; 33] {
        self.inner.serialize()
    }
}

/// A private key together with its public key and address
#[derive(Debug, Clone)]
pub struct KeyPair {
    private_key: PrivateKey,
    public_key: PublicKey,
    address: Address,
}

impl KeyPair {
    /// Build a key pair from raw private key material
    pub fn from_private_key(key_material: &[u8]) -> Result<Self> {
        let private_key = PrivateKey::from_slice(key_material)?;
        let (public_key, address) = ethereum::private_key_to_address(key_material)?;
        Ok(Self {
            private_key,
            public_key,
            address,
        })
    }

    /// Get the private key
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Get the public key
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Get the Ethereum address
    pub fn address(&self) -> &Address {
        &self.address
    }
}
