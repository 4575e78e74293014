//! Wallet record persistence

mod persist;

pub use persist::*;
