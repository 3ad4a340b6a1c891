//! # Sibyl Oracle Engine
//!
//! The oracle data-request lifecycle state machine of the Sibyl chain.
//!
//! Any account submits a [`Msg::RequestData`] naming an oracle script, a
//! quorum (`min_count` out of `ask_count`), and calldata. The engine samples
//! `ask_count` validators from the active set, weighted by stake and seeded
//! from block data so every replica selects the same committee, then runs the
//! script's prepare phase to decide which external data sources to query.
//! Selected validators answer with [`Msg::ReportData`]; the moment the
//! quorum is met the request joins the pending-resolve queue, and at block
//! end the resolve engine aggregates the collected reports through the
//! script's execute phase into a single immutable [`OracleResult`].
//!
//! ## Components
//!
//! - **Keeper**: store operations for requests, reports, results, validator
//!   oracle status, reporter grants, and the data-source/oracle-script
//!   registries
//! - **Selection**: deterministic stake-weighted sampling without replacement
//! - **Script environment**: sandboxed, gas-metered prepare/execute phases
//! - **Block hooks**: rolling-seed advance at block start; pending-queue
//!   drain and expiry scan at block end

pub mod events;
pub mod handler;
pub mod keeper;
pub mod keys;
pub mod params;
pub mod rng;
pub mod script;
pub mod selection;
pub mod types;

pub use handler::{handle_msg, MsgResponse};
pub use keeper::{Keeper, ValidatorSet};
pub use params::OracleParams;
pub use script::{ExecuteEnv, OracleScript, PrepareEnv, ScriptError};
pub use types::{
    DataSourceId, DataSourceMeta, ExternalId, IbcChannel, Msg, OracleResult, OracleScriptId,
    OracleScriptMeta, RawReport, RawRequest, Report, Request, RequestId, ResolveStatus,
    ValidatorStatus,
};

use sibyl_core::ValAddress;

/// Result type for oracle operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Oracle-specific error types.
///
/// Every variant is a validation error reported synchronously to the
/// submitter; none of them leaves partial state behind. Deterministic script
/// failures during resolution are not errors: they terminate in a
/// [`ResolveStatus::Failure`] result.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Quorum parameters out of range.
    #[error("invalid count: min_count {min_count} must be between 1 and ask_count {ask_count}")]
    InvalidCount {
        /// Number of validators asked.
        ask_count: u64,
        /// Quorum threshold requested.
        min_count: u64,
    },

    /// More validators asked than the parameter set allows.
    #[error("invalid ask count: {ask_count} exceeds maximum {max}")]
    InvalidAskCount {
        /// Number of validators asked.
        ask_count: u64,
        /// Configured maximum.
        max: u64,
    },

    /// The active validator set is smaller than the committee requested.
    #[error("insufficient active validators: {available} available, {requested} requested")]
    InsufficientValidators {
        /// Size of the active, oracle-eligible set.
        available: usize,
        /// Committee size requested.
        requested: usize,
    },

    /// No request stored under the given id.
    #[error("unknown request: {0}")]
    UnknownRequest(RequestId),

    /// No data source registered under the given id.
    #[error("unknown data source: {0}")]
    UnknownDataSource(DataSourceId),

    /// No oracle script registered under the given id.
    #[error("unknown oracle script: {0}")]
    UnknownOracleScript(OracleScriptId),

    /// No result stored for the given request.
    #[error("result for request {0} not found")]
    ResultNotFound(RequestId),

    /// The reporting validator is not in the request's selected list, or the
    /// submitter lacks reporter delegation for it.
    #[error("validator {validator} is not authorized to report on request {request_id}")]
    UnauthorizedReporter {
        /// The request reported on.
        request_id: RequestId,
        /// The validator the report was submitted for.
        validator: ValAddress,
    },

    /// The request already has a terminal result.
    #[error("request {0} is already resolved")]
    RequestAlreadyResolved(RequestId),

    /// Report payload malformed: mismatched raw-request ids or oversized data.
    #[error("invalid report: {0}")]
    InvalidReport(String),

    /// The script's prepare phase trapped, ran out of gas, or asked nothing.
    #[error("script execution failed: {0}")]
    ScriptExecutionFailed(String),

    /// Prepare finished without asking for any external data.
    #[error("prepare phase produced no raw requests")]
    EmptyRawRequests,

    /// Reactivation of a validator that is already active.
    #[error("validator {0} is already active")]
    ValidatorAlreadyActive(ValAddress),

    /// Reactivation attempted before the inactivity penalty elapsed.
    #[error("validator {validator} cannot re-activate until {until}")]
    TooSoonToActivate {
        /// The validator attempting to re-activate.
        validator: ValAddress,
        /// Unix time at which reactivation becomes possible.
        until: u64,
    },

    /// Structurally invalid message.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// Host-level failure: gas exhaustion on the apply path or a codec error.
    #[error(transparent)]
    Core(#[from] sibyl_core::Error),
}
