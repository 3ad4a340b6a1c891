//! # Sibyl Core
//!
//! Host-model primitives shared by the Sibyl oracle engine.
//!
//! This crate provides the pieces of the replicated state-machine host that
//! the oracle engine runs against: fixed-size address and hash types, coin
//! amounts, the key-value [`Store`] seam, the per-block apply [`Context`],
//! gas metering, and emitted [`Event`]s.
//!
//! Everything here is synchronous and deterministic. The host applies
//! messages and block hooks one at a time, so there is no interior locking;
//! shared state is a single mutable store reached through the apply context.

pub mod address;
pub mod coins;
pub mod context;
pub mod event;
pub mod gas;
pub mod store;

pub use address::{Address, Hash, ValAddress};
pub use coins::{Coin, Coins, DecCoin, DecCoins};
pub use context::Context;
pub use event::Event;
pub use gas::GasMeter;
pub use store::{codec, MemoryStore, Store};

/// Size of an account or validator address in bytes.
pub const ADDRESS_SIZE: usize = 20;

/// Size of a block hash in bytes.
pub const HASH_SIZE: usize = 32;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Byte slice of the wrong length for an address or hash.
    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Expected number of bytes.
        expected: usize,
        /// Number of bytes actually supplied.
        got: usize,
    },

    /// Gas consumption exceeded the meter's limit.
    #[error("out of gas: {descriptor} (limit {limit})")]
    OutOfGas {
        /// Label of the operation that exhausted the meter.
        descriptor: String,
        /// The limit that was exceeded.
        limit: u64,
    },

    /// Value could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}
