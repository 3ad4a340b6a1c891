//! # Sibyl-RS: Decentralized Oracle Request Engine
//!
//! The core state machine of the Sibyl oracle chain: any account can submit a
//! request for external data, a deterministically sampled committee of
//! validators answers it, and the engine aggregates the answers into a single
//! result under quorum rules.
//!
//! This library covers the request lifecycle and its invariants: quorum
//! counting, stake-weighted validator sampling, deadline handling, and
//! report-transaction fee exemption. Consensus, networking, persistence
//! backends, and the query transport live in the surrounding host.
//!
//! ## Architecture
//!
//! The implementation is organized into three crates:
//!
//! - [`sibyl_core`] - Host-model primitives: addresses, coins, the key-value
//!   store seam, the block apply context, gas metering, and events
//! - [`sibyl_oracle`] - The oracle engine: requests, reports, resolution,
//!   validator sampling and oracle status, and block hooks
//! - [`sibyl_fees`] - Minimum-gas-price enforcement with fee exemption and
//!   maximal scheduling priority for validator report traffic

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub use sibyl_core as core;
pub use sibyl_fees as fees;
pub use sibyl_oracle as oracle;

/// Common imports for working with the oracle engine.
pub mod prelude {
    pub use crate::core::{
        Address, Coin, Coins, Context, DecCoin, Event, GasMeter, Hash, MemoryStore, Store,
        ValAddress,
    };
    pub use crate::fees::{FeeChecker, FeeTx, GlobalFee};
    pub use crate::oracle::{
        handle_msg, Keeper, Msg, OracleParams, OracleResult, RawReport, RawRequest, Report,
        Request, RequestId, ResolveStatus, ValidatorSet,
    };
}
