//! Sandboxed oracle-script execution.
//!
//! Scripts run in two deterministic, gas-metered phases behind a narrow
//! capability interface: *prepare* decides which external data sources to
//! query, *execute* aggregates the collected reports. A script can read its
//! environment, emit sub-requests, and consume gas, nothing else, so a
//! misbehaving script cannot affect the host beyond exhausting its own
//! budget.

pub mod env;

pub use env::{ExecuteEnv, PrepareEnv};

use crate::types::DataSourceId;

/// Gas charged when a prepare phase starts.
pub const PREPARE_BASE_GAS: u64 = 1_000;
/// Gas charged when an execute phase starts.
pub const EXECUTE_BASE_GAS: u64 = 1_000;
/// Gas charged per emitted raw request.
pub const RAW_REQUEST_GAS: u64 = 250;
/// Gas charged per collected report read during aggregation.
pub const REPORT_READ_GAS: u64 = 250;

/// Result type for script phases.
pub type ScriptResult<T> = std::result::Result<T, ScriptError>;

/// Deterministic script failures.
///
/// None of these are host faults: a failing prepare rejects the request, a
/// failing execute terminates the request with a `Failure` result.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// The script aborted.
    #[error("script trap: {0}")]
    Trap(String),

    /// The phase's gas budget ran out.
    #[error("script ran out of gas")]
    OutOfGas,

    /// Prepare asked for more raw requests than allowed.
    #[error("too many raw requests: limit is {limit}")]
    TooManyRawRequests {
        /// The configured per-request limit.
        limit: u64,
    },

    /// Prepare emitted oversized per-source calldata.
    #[error("raw-request calldata of {size} bytes exceeds limit {limit}")]
    CalldataTooLarge {
        /// Size of the rejected calldata.
        size: usize,
        /// The configured limit.
        limit: u64,
    },

    /// Prepare referenced a data source that is not registered.
    #[error("unknown data source: {0}")]
    UnknownDataSource(DataSourceId),

    /// Prepare reused an external id.
    #[error("duplicate external id: {0}")]
    DuplicateExternalId(u64),
}

/// A deterministic oracle script.
///
/// Implementations are registered with the keeper alongside their metadata
/// and looked up by script id. Both phases must be pure functions of their
/// environment; chain state is reachable only through what the environment
/// exposes.
pub trait OracleScript: Send + Sync {
    /// Decides which external data sources to query for a request.
    fn prepare(&self, env: &mut PrepareEnv) -> ScriptResult<()>;

    /// Aggregates the collected reports into the final result payload.
    fn execute(&self, env: &mut ExecuteEnv<'_>) -> ScriptResult<Vec<u8>>;
}
