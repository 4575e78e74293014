//! Cryptographic primitives and operations
//!
//! This module provides entropy generation, mnemonic encoding, hierarchical
//! key derivation and Ethereum address computation.

pub mod entropy;
pub mod mnemonic;
pub mod keys;

pub use entropy::*;
pub use mnemonic::*;
pub use keys::*;
