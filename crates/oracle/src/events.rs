//! Event kinds and constructors.
//!
//! Events are the only channel through which external collaborators (the
//! emitter pipeline, the price cache, relayers) observe the engine.

use crate::types::{RawRequest, Request, RequestId, ResolveStatus};
use sibyl_core::{Event, ValAddress};

/// A request was created.
pub const EVENT_TYPE_REQUEST: &str = "request";
/// One raw sub-request of a created request.
pub const EVENT_TYPE_RAW_REQUEST: &str = "raw_request";
/// A validator reported.
pub const EVENT_TYPE_REPORT: &str = "report";
/// A request reached a terminal status.
pub const EVENT_TYPE_RESOLVE: &str = "resolve";
/// A validator re-activated.
pub const EVENT_TYPE_ACTIVATE: &str = "activate";
/// A validator was deactivated for missing reports.
pub const EVENT_TYPE_DEACTIVATE: &str = "deactivate";

/// Request id attribute.
pub const ATTR_KEY_ID: &str = "id";
/// Requester tag attribute.
pub const ATTR_KEY_CLIENT_ID: &str = "client_id";
/// Oracle script id attribute.
pub const ATTR_KEY_ORACLE_SCRIPT_ID: &str = "oracle_script_id";
/// Hex-encoded calldata attribute.
pub const ATTR_KEY_CALLDATA: &str = "calldata";
/// Ask-count attribute.
pub const ATTR_KEY_ASK_COUNT: &str = "ask_count";
/// Min-count attribute.
pub const ATTR_KEY_MIN_COUNT: &str = "min_count";
/// Data source id attribute.
pub const ATTR_KEY_DATA_SOURCE_ID: &str = "data_source_id";
/// External (sub-request) id attribute.
pub const ATTR_KEY_EXTERNAL_ID: &str = "external_id";
/// Validator address attribute.
pub const ATTR_KEY_VALIDATOR: &str = "validator";
/// Numeric resolve status attribute.
pub const ATTR_KEY_RESOLVE_STATUS: &str = "resolve_status";
/// Hex-encoded result payload attribute.
pub const ATTR_KEY_RESULT: &str = "result";
/// Execute-phase gas attribute.
pub const ATTR_KEY_GAS_USED: &str = "gas_used";
/// Failure reason attribute.
pub const ATTR_KEY_REASON: &str = "reason";

/// Event for a newly created request.
pub fn request(id: RequestId, request: &Request) -> Event {
    Event::new(EVENT_TYPE_REQUEST)
        .attr(ATTR_KEY_ID, id.to_string())
        .attr(ATTR_KEY_CLIENT_ID, request.client_id.clone())
        .attr(
            ATTR_KEY_ORACLE_SCRIPT_ID,
            request.oracle_script_id.to_string(),
        )
        .attr(ATTR_KEY_CALLDATA, hex::encode(&request.calldata))
        .attr(ATTR_KEY_ASK_COUNT, request.ask_count().to_string())
        .attr(ATTR_KEY_MIN_COUNT, request.min_count.to_string())
}

/// Event for one raw sub-request of a newly created request.
pub fn raw_request(raw: &RawRequest) -> Event {
    Event::new(EVENT_TYPE_RAW_REQUEST)
        .attr(ATTR_KEY_DATA_SOURCE_ID, raw.data_source_id.to_string())
        .attr(ATTR_KEY_EXTERNAL_ID, raw.external_id.to_string())
        .attr(ATTR_KEY_CALLDATA, hex::encode(&raw.calldata))
}

/// Event for a stored report.
pub fn report(id: RequestId, validator: &ValAddress) -> Event {
    Event::new(EVENT_TYPE_REPORT)
        .attr(ATTR_KEY_ID, id.to_string())
        .attr(ATTR_KEY_VALIDATOR, validator.to_string())
}

/// Event for a successful resolution.
pub fn resolve_success(id: RequestId, result: &[u8], gas_used: u64) -> Event {
    Event::new(EVENT_TYPE_RESOLVE)
        .attr(ATTR_KEY_ID, id.to_string())
        .attr(
            ATTR_KEY_RESOLVE_STATUS,
            ResolveStatus::Success.code().to_string(),
        )
        .attr(ATTR_KEY_RESULT, hex::encode(result))
        .attr(ATTR_KEY_GAS_USED, gas_used.to_string())
}

/// Event for a resolution that failed inside the script.
pub fn resolve_failure(id: RequestId, reason: &str) -> Event {
    Event::new(EVENT_TYPE_RESOLVE)
        .attr(ATTR_KEY_ID, id.to_string())
        .attr(
            ATTR_KEY_RESOLVE_STATUS,
            ResolveStatus::Failure.code().to_string(),
        )
        .attr(ATTR_KEY_REASON, reason.to_string())
}

/// Event for a request that expired without quorum.
pub fn resolve_expired(id: RequestId) -> Event {
    Event::new(EVENT_TYPE_RESOLVE)
        .attr(ATTR_KEY_ID, id.to_string())
        .attr(
            ATTR_KEY_RESOLVE_STATUS,
            ResolveStatus::Expired.code().to_string(),
        )
}

/// Event for a validator re-activation.
pub fn activate(validator: &ValAddress) -> Event {
    Event::new(EVENT_TYPE_ACTIVATE).attr(ATTR_KEY_VALIDATOR, validator.to_string())
}

/// Event for a validator deactivation.
pub fn deactivate(validator: &ValAddress) -> Event {
    Event::new(EVENT_TYPE_DEACTIVATE).attr(ATTR_KEY_VALIDATOR, validator.to_string())
}
