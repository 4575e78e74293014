//! Account management functionality
//!
//! Ethereum addresses and the generated wallet bundle.

mod address;
mod wallet;

pub use address::*;
pub use wallet::*;
