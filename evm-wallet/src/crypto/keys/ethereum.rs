//! Ethereum public key and address computation

use sha3::{Digest, Keccak256};

use crate::account::Address;
use crate::error::Result;
use super::{PrivateKey, PublicKey};

/// Compute the public key and Ethereum address for raw private key material.
///
/// Fails with [`crate::Error::Key`] unless the material is a secp256k1
/// scalar in `[1, n - 1]`.
pub fn private_key_to_address(key_material: &[u8]) -> Result<(PublicKey, Address)> {
    let private_key = PrivateKey::from_slice(key_material)?;
    let public_key = PublicKey::from_private_key(&private_key)?;
    let address = public_key_to_address(&public_key);
    Ok((public_key, address))
}

/// Get the Ethereum address from a public key
pub fn public_key_to_address(public_key: &PublicKey) -> Address {
    let uncompressed = public_key.to_uncompressed();

    // Skip the 0x04 prefix and hash x || y
    let key_hash = keccak256(&uncompressed[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&key_hash[12..]);
    Address::new(address)
}

/// Calculate the Keccak-256 hash of data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_keccak256_empty() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_known_private_key_address() {
        let key = hex::decode("1ab42cc412b618bdea3a599e3c9bae199ebf030895b039e9db1e30dafb12b727").unwrap();
        let (public_key, address) = private_key_to_address(&key).unwrap();

        assert_eq!(address.to_string(), "0x9858EfFD232B4033E47d90003D41EC34EcaEda94");
        assert_eq!(public_key_to_address(&public_key), address);
    }

    #[test]
    fn test_address_is_deterministic_and_sized() {
        let key = [0x42u8; 32];
        let (_, first) = private_key_to_address(&key).unwrap();
        let (_, second) = private_key_to_address(&key).unwrap();

        assert_eq!(first, second);
        let rendered = first.to_string();
        assert!(rendered.starts_with("0x"));
        assert_eq!(rendered.len() - 2, 40);
        assert!(rendered[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_invalid_scalars_rejected() {
        let order = hex::decode("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141").unwrap();
        assert!(matches!(private_key_to_address(&[0u8; 32]), Err(Error::Key(_))));
        assert!(matches!(private_key_to_address(&order), Err(Error::Key(_))));
        assert!(matches!(private_key_to_address(&[1u8; 16]), Err(Error::Key(_))));
    }
}
