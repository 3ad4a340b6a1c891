//! # Sibyl Fee Checking
//!
//! Minimum-gas-price enforcement with one deliberate exception: transactions
//! composed exclusively of authorized validator report submissions pay no fee
//! and schedule at maximal priority. Report traffic is the liveness-critical
//! path of the oracle, and a validator must never be priced out of answering
//! a request it was selected for; all other traffic pays market-determined
//! fees.

pub mod checker;
pub mod tx;

pub use checker::{FeeChecker, GlobalFee, MAX_PRIORITY};
pub use tx::FeeTx;

/// Result type for fee checking.
pub type Result<T> = std::result::Result<T, Error>;

/// Fee-checking error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The declared fee does not meet the required floor.
    #[error("insufficient fee: got \"{fee}\", required \"{required}\"")]
    InsufficientFee {
        /// The fee the transaction declared.
        fee: String,
        /// The floor it had to meet.
        required: String,
    },
}
