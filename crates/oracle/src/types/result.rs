//! Terminal request outcomes.

use crate::types::{OracleScriptId, RequestId};
use serde::{Deserialize, Serialize};

/// How a request terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ResolveStatus {
    /// Not yet resolved. Never stored in a result record.
    Open = 0,
    /// Quorum met and the execute phase produced a payload.
    Success = 1,
    /// Quorum met but the execute phase trapped or ran out of gas.
    Failure = 2,
    /// The resolution deadline elapsed before quorum.
    Expired = 3,
}

impl ResolveStatus {
    /// Numeric wire value of the status.
    pub fn code(&self) -> u32 {
        *self as u32
    }
}

/// The terminal outcome of a request, written exactly once and immutable
/// afterwards, keyed by request id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleResult {
    /// The requester's free-form tag, echoed back.
    pub client_id: String,
    /// The oracle script that produced this result.
    pub oracle_script_id: OracleScriptId,
    /// The request calldata, echoed back.
    pub calldata: Vec<u8>,
    /// Validators asked.
    pub ask_count: u64,
    /// Quorum threshold used.
    pub min_count: u64,
    /// The request this result terminates.
    pub request_id: RequestId,
    /// Reports actually counted at resolve time.
    pub ans_count: u64,
    /// Block time of the request, unix seconds.
    pub request_time: u64,
    /// Block height at resolution.
    pub resolve_height: u64,
    /// Block time at resolution, unix seconds.
    pub resolve_time: u64,
    /// Terminal status.
    pub resolve_status: ResolveStatus,
    /// Aggregated payload; empty on failure and expiry.
    pub result: Vec<u8>,
    /// Gas consumed by the execute phase; zero on expiry.
    pub gas_used: u64,
}
