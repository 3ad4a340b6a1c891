//! Request and raw sub-request records.

use crate::types::{DataSourceId, ExternalId, OracleScriptId};
use serde::{Deserialize, Serialize};
use sibyl_core::ValAddress;

/// One per-data-source fetch instruction, created with its request and never
/// mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRequest {
    /// Sub-request id, local to the request.
    pub external_id: ExternalId,
    /// The external data source to query.
    pub data_source_id: DataSourceId,
    /// Per-source calldata chosen by the script's prepare phase.
    pub calldata: Vec<u8>,
}

impl RawRequest {
    /// Creates a new raw request.
    pub fn new(external_id: ExternalId, data_source_id: DataSourceId, calldata: Vec<u8>) -> Self {
        Self {
            external_id,
            data_source_id,
            calldata,
        }
    }
}

/// Reply-channel coordinates for requests that arrived over IBC.
///
/// Stored verbatim on the request; relaying is handled outside this engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IbcChannel {
    /// Port the request arrived on.
    pub port_id: String,
    /// Channel the response should be relayed back through.
    pub channel_id: String,
}

/// A data request: the committee asked, the quorum required, and the raw
/// sub-requests the oracle script's prepare phase selected.
///
/// Immutable once created, except for the reports that accumulate against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// The oracle script that prepares and aggregates this request.
    pub oracle_script_id: OracleScriptId,
    /// Opaque calldata passed to the script.
    pub calldata: Vec<u8>,
    /// The selected committee, exactly `ask_count` distinct validators.
    pub requested_validators: Vec<ValAddress>,
    /// Reports required before the request may resolve.
    pub min_count: u64,
    /// Block height at creation.
    pub request_height: u64,
    /// Block time at creation, unix seconds.
    pub request_time: u64,
    /// Free-form tag supplied by the requester.
    pub client_id: String,
    /// The per-data-source fetch instructions, in prepare order.
    pub raw_requests: Vec<RawRequest>,
    /// Reply channel for IBC-originated requests.
    pub ibc_channel: Option<IbcChannel>,
    /// Gas budget for the script's execute phase.
    pub execute_gas: u64,
}

impl Request {
    /// Creates a new request record.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        oracle_script_id: OracleScriptId,
        calldata: Vec<u8>,
        requested_validators: Vec<ValAddress>,
        min_count: u64,
        request_height: u64,
        request_time: u64,
        client_id: impl Into<String>,
        raw_requests: Vec<RawRequest>,
        ibc_channel: Option<IbcChannel>,
        execute_gas: u64,
    ) -> Self {
        Self {
            oracle_script_id,
            calldata,
            requested_validators,
            min_count,
            request_height,
            request_time,
            client_id: client_id.into(),
            raw_requests,
            ibc_channel,
            execute_gas,
        }
    }

    /// Number of validators asked.
    pub fn ask_count(&self) -> u64 {
        self.requested_validators.len() as u64
    }

    /// Whether `validator` is part of the selected committee.
    pub fn is_requested(&self, validator: &ValAddress) -> bool {
        self.requested_validators.contains(validator)
    }
}
