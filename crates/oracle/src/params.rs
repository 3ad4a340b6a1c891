//! Oracle module parameters.

use serde::{Deserialize, Serialize};

/// Governance-adjustable parameters of the oracle engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleParams {
    /// Maximum number of raw requests a prepare phase may emit.
    pub max_raw_request_count: u64,

    /// Maximum number of validators a request may ask.
    pub max_ask_count: u64,

    /// Maximum size of request and raw-request calldata in bytes.
    pub max_calldata_size: u64,

    /// Maximum size of a single raw-report payload in bytes.
    pub max_report_data_size: u64,

    /// Blocks after creation at which an unresolved request expires.
    pub expiration_block_count: u64,

    /// Flat apply-path gas charged per data request.
    pub base_request_gas: u64,

    /// Additional apply-path gas charged per validator asked.
    pub per_validator_request_gas: u64,

    /// Consecutive missed report obligations before a validator is
    /// deactivated.
    pub max_consecutive_misses: u64,

    /// Seconds a deactivated validator must wait before re-activating.
    pub inactive_penalty_secs: u64,
}

impl Default for OracleParams {
    fn default() -> Self {
        Self {
            max_raw_request_count: 12,
            max_ask_count: 16,
            max_calldata_size: 256,
            max_report_data_size: 512,
            expiration_block_count: 100,
            base_request_gas: 50_000,
            per_validator_request_gas: 30_000,
            max_consecutive_misses: 1,
            inactive_penalty_secs: 600,
        }
    }
}
