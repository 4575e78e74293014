//! BIP-32 hierarchical key derivation over secp256k1

use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use secp256k1::{Scalar, Secp256k1, SecretKey, Signing};
use sha2::Sha512;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{Error, Result};

/// Offset of the first hardened child index
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// The BIP-44 path of the first Ethereum account's first receiving address
pub const ETHEREUM_PATH: &str = "m/44'/60'/0'/0/0";

const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// One step of a derivation path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildIndex {
    /// Index below 2^31, derived from the parent public key
    Normal(u32),
    /// Index at or above 2^31, derived from the parent private key
    Hardened(u32),
}

impl ChildIndex {
    pub fn normal(index: u32) -> Result<Self> {
        if index >= HARDENED_OFFSET {
            return Err(Error::InvalidInput(format!("Child index out of range: {}", index)));
        }
        Ok(Self::Normal(index))
    }

    pub fn hardened(index: u32) -> Result<Self> {
        if index >= HARDENED_OFFSET {
            return Err(Error::InvalidInput(format!("Child index out of range: {}'", index)));
        }
        Ok(Self::Hardened(index))
    }

    pub fn is_hardened(&self) -> bool {
        matches!(self, Self::Hardened(_))
    }

    /// The 32-bit index as serialized into the HMAC input
    pub fn to_u32(&self) -> u32 {
        match *self {
            Self::Normal(index) => index,
            Self::Hardened(index) => index | HARDENED_OFFSET,
        }
    }
}

impl From<u32> for ChildIndex {
    fn from(raw: u32) -> Self {
        if raw >= HARDENED_OFFSET {
            Self::Hardened(raw - HARDENED_OFFSET)
        } else {
            Self::Normal(raw)
        }
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal(index) => write!(f, "{}", index),
            Self::Hardened(index) => write!(f, "{}'", index),
        }
    }
}

impl FromStr for ChildIndex {
    type Err = Error;

    fn from_str(component: &str) -> Result<Self> {
        let invalid = || Error::InvalidInput(format!("Invalid derivation path component: {}", component));

        let (digits, hardened) = match component.strip_suffix(|c: char| matches!(c, '\'' | 'h' | 'H')) {
            Some(digits) => (digits, true),
            None => (component, false),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let index = digits.parse::<u32>().map_err(|_| invalid())?;
        if hardened {
            Self::hardened(index)
        } else {
            Self::normal(index)
        }
    }
}

/// A BIP-32 derivation path such as `m/44'/60'/0'/0/0`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DerivationPath {
    components: Vec<ChildIndex>,
}

impl DerivationPath {
    pub fn new(components: Vec<ChildIndex>) -> Self {
        Self { components }
    }

    /// `m/44'/60'/0'/0/0`: purpose, coin type, account, change, address index
    pub fn ethereum() -> Self {
        Self::new(vec![
            ChildIndex::Hardened(44),
            ChildIndex::Hardened(60),
            ChildIndex::Hardened(0),
            ChildIndex::Normal(0),
            ChildIndex::Normal(0),
        ])
    }

    pub fn components(&self) -> &[ChildIndex] {
        &self.components
    }

    pub fn is_master(&self) -> bool {
        self.components.is_empty()
    }
}

impl Default for DerivationPath {
    fn default() -> Self {
        Self::ethereum()
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for component in &self.components {
            write!(f, "/{}", component)?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(path: &str) -> Result<Self> {
        let mut parts = path.split('/');
        if parts.next() != Some("m") {
            return Err(Error::InvalidInput(format!("Invalid derivation path: {}", path)));
        }

        let components = parts.map(str::parse).collect::<Result<Vec<ChildIndex>>>()?;
        Ok(Self::new(components))
    }
}

/// A node of the derivation tree: 32 bytes of key material and a chain code.
///
/// Key material is only checked against the curve order when it is used.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ExtendedKey {
    key: [u8; 32],
    chain_code: [u8; 32],
    depth: u8,
}

impl ExtendedKey {
    /// Derive the master key: HMAC-SHA512(key = "Bitcoin seed", data = seed)
    pub fn master(seed: &[u8]) -> Result<Self> {
        let (key, chain_code) = hmac_sha512_split(MASTER_HMAC_KEY, seed)?;
        Ok(Self {
            key,
            chain_code,
            depth: 0,
        })
    }

    pub fn key_material(&self) -> &[u8; 32] {
        &self.key
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Derive a single child key
    pub fn derive_child(&self, index: ChildIndex) -> Result<Self> {
        let secp = Secp256k1::signing_only();
        self.derive_child_with(&secp, index)
    }

    /// Walk every component of `path` starting from this key
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        let secp = Secp256k1::signing_only();
        let mut current = self.clone();
        for &index in path.components() {
            current = current.derive_child_with(&secp, index)?;
        }
        Ok(current)
    }

    fn derive_child_with<C: Signing>(&self, secp: &Secp256k1<C>, index: ChildIndex) -> Result<Self> {
        let parent_secret_key = SecretKey::from_slice(&self.key)
            .map_err(|e| Error::Derivation(format!("Invalid parent key at depth {}: {}", self.depth, e)))?;

        let depth = self.depth.checked_add(1)
            .ok_or_else(|| Error::Derivation("Maximum derivation depth exceeded".to_string()))?;

        let mut data = Zeroizing::new(Vec::<u8>::with_capacity(37));
        if index.is_hardened() {
            data.push(0);
            data.extend_from_slice(&self.key);
        } else {
            let parent_public_key = secp256k1::PublicKey::from_secret_key(secp, &parent_secret_key);
            data.extend_from_slice(&parent_public_key.serialize());
        }
        data.extend_from_slice(&index.to_u32().to_be_bytes());

        let (mut tweak, chain_code) = hmac_sha512_split(&self.chain_code, &data)?;

        // IL must be below the curve order and the child key must be non-zero
        let scalar = Scalar::from_be_bytes(tweak)
            .map_err(|_| Error::Derivation(format!("Derived tweak out of range at index {}", index)));
        tweak.zeroize();
        let child_secret_key = parent_secret_key
            .add_tweak(&scalar?)
            .map_err(|e| Error::Derivation(format!("Invalid child key at index {}: {}", index, e)))?;

        Ok(Self {
            key: child_secret_key.secret_bytes(),
            chain_code,
            depth,
        })
    }
}

impl fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedKey")
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

/// Derive the master extended key from a seed
pub fn master_key_from_seed(seed: &[u8]) -> Result<ExtendedKey> {
    ExtendedKey::master(seed)
}

/// Derive the key at `path` from a seed
pub fn derive_from_seed(seed: &[u8], path: &DerivationPath) -> Result<ExtendedKey> {
    let key = master_key_from_seed(seed)?.derive_path(path)?;
    tracing::debug!(path = %path, "Derived child key");
    Ok(key)
}

fn hmac_sha512_split(key: &[u8], data: &[u8]) -> Result<([u8; 32], [u8; 32])> {
    let mut mac = <Hmac<Sha512> as Mac>::new_from_slice(key)
        .map_err(|_| Error::Derivation("HMAC error".to_string()))?;
    mac.update(data);

    let mut output = Zeroizing::new([0u8; 64]);
    output.copy_from_slice(&mac.finalize().into_bytes());

    let mut left = [0u8; 32];
    let mut right = [0u8; 32];
    left.copy_from_slice(&output[..32]);
    right.copy_from_slice(&output[32..]);
    Ok((left, right))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bip32_vector1_seed() -> Vec<u8> {
        hex::decode("000102030405060708090a0b0c0d0e0f").unwrap()
    }

    #[test]
    fn test_parse_derivation_path() {
        let path: DerivationPath = ETHEREUM_PATH.parse().unwrap();
        assert_eq!(path, DerivationPath::ethereum());
        assert_eq!(path.to_string(), ETHEREUM_PATH);

        let alt: DerivationPath = "m/44h/60H/0'/0/0".parse().unwrap();
        assert_eq!(alt, path);

        let master: DerivationPath = "m".parse().unwrap();
        assert!(master.is_master());
    }

    #[test]
    fn test_parse_invalid_paths() {
        for bad in ["", "44'/60'", "m/", "m/x", "m/-1", "m/+1", "m/2147483648", "m/2147483648'", "m//0", "m/0''"] {
            assert!(bad.parse::<DerivationPath>().is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_child_index_raw_values() {
        assert_eq!(ChildIndex::Hardened(44).to_u32(), 0x8000_002C);
        assert_eq!(ChildIndex::Hardened(60).to_u32(), 0x8000_003C);
        assert_eq!(ChildIndex::Normal(0).to_u32(), 0);
        assert_eq!(ChildIndex::from(0x8000_0000), ChildIndex::Hardened(0));
        assert_eq!(ChildIndex::from(5), ChildIndex::Normal(5));
    }

    #[test]
    fn test_bip32_vector1_master() {
        let master = master_key_from_seed(&bip32_vector1_seed()).unwrap();
        assert_eq!(
            hex::encode(master.key_material()),
            "e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"
        );
        assert_eq!(
            hex::encode(master.chain_code()),
            "873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508"
        );
        assert_eq!(master.depth(), 0);
    }

    #[test]
    fn test_bip32_vector1_children() {
        let master = master_key_from_seed(&bip32_vector1_seed()).unwrap();

        let hardened = master.derive_child(ChildIndex::Hardened(0)).unwrap();
        assert_eq!(
            hex::encode(hardened.key_material()),
            "edb2e14f9ee77d26dd93b4ecede8d16ed408ce149b6cd80b0715a2d911a0afea"
        );
        assert_eq!(
            hex::encode(hardened.chain_code()),
            "47fdacbd0f1097043b78c63c20c34ef4ed9a111d980047ad16282c7ae6236141"
        );

        let normal = hardened.derive_child(ChildIndex::Normal(1)).unwrap();
        assert_eq!(
            hex::encode(normal.key_material()),
            "3c6cb8d0f6a264c91ea8b5030fadaa8e538b020f0a387421a12de9319dc93368"
        );
        assert_eq!(
            hex::encode(normal.chain_code()),
            "2a7857631386ba23dacac34180dd1983734e444fdbf774041578e9b6adb37c19"
        );
        assert_eq!(normal.depth(), 2);

        let via_path = master.derive_path(&"m/0'/1".parse().unwrap()).unwrap();
        assert_eq!(via_path.key_material(), normal.key_material());
    }

    #[test]
    fn test_master_key_accepts_any_seed_length() {
        for len in [0usize, 16, 32, 64, 128] {
            let master = master_key_from_seed(&vec![0x5au8; len]).unwrap();
            assert_eq!(master.depth(), 0);
        }
        let key = hmac_sha512_split(&[], b"data").unwrap();
        assert_ne!(key.0, [0u8; 32]);
    }

    #[test]
    fn test_master_key_is_deterministic() {
        let seed = [7u8; 64];
        let a = master_key_from_seed(&seed).unwrap();
        let b = master_key_from_seed(&seed).unwrap();
        assert_eq!(a.key_material(), b.key_material());
        assert_eq!(a.chain_code(), b.chain_code());
    }

    #[test]
    fn test_invalid_parent_key_is_derivation_error() {
        let invalid = ExtendedKey {
            key: [0u8; 32],
            chain_code: [1u8; 32],
            depth: 3,
        };
        let err = invalid.derive_child(ChildIndex::Normal(0)).unwrap_err();
        assert!(matches!(err, Error::Derivation(_)));
    }

    #[test]
    fn test_debug_redacts_key_material() {
        let master = master_key_from_seed(&bip32_vector1_seed()).unwrap();
        let debug = format!("{:?}", master);
        assert!(!debug.contains("e8f32e"));
    }
}
