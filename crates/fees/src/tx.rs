//! Transaction view used by the fee checker.

use sibyl_core::{Address, Coins};
use sibyl_oracle::Msg;

/// The slice of a transaction the fee checker needs.
///
/// The host's transaction format carries signatures, memos, and other
/// envelope data the checker never looks at; this trait narrows it to the
/// messages, the fee declaration, and the signing account.
pub trait FeeTx {
    /// The messages the transaction carries, in order.
    fn msgs(&self) -> &[Msg];

    /// The account that signed the transaction.
    fn signer(&self) -> Address;

    /// The declared gas limit.
    fn gas_limit(&self) -> u64;

    /// The declared fee.
    fn fee(&self) -> Coins;
}
