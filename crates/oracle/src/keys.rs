//! Store key layout.
//!
//! All oracle state lives under single-byte record-family prefixes with
//! big-endian id suffixes, so prefix scans walk records in id order.

use crate::types::{DataSourceId, OracleScriptId, RequestId};
use sibyl_core::ValAddress;

/// Total number of requests ever created.
pub const REQUEST_COUNT_KEY: &[u8] = &[0x00, 0x01];
/// Highest request id already processed by the expiry scan.
pub const LAST_EXPIRED_REQUEST_KEY: &[u8] = &[0x00, 0x02];
/// The pending-resolve queue.
pub const PENDING_RESOLVE_LIST_KEY: &[u8] = &[0x00, 0x03];
/// Rolling seed for validator sampling.
pub const ROLLING_SEED_KEY: &[u8] = &[0x00, 0x04];
/// Total number of data sources registered.
pub const DATA_SOURCE_COUNT_KEY: &[u8] = &[0x00, 0x05];
/// Total number of oracle scripts registered.
pub const ORACLE_SCRIPT_COUNT_KEY: &[u8] = &[0x00, 0x06];
/// Oracle module parameters.
pub const PARAMS_KEY: &[u8] = &[0x00, 0x07];

const REQUEST_PREFIX: u8 = 0x01;
const REPORT_PREFIX: u8 = 0x02;
const RESULT_PREFIX: u8 = 0x03;
const VALIDATOR_STATUS_PREFIX: u8 = 0x04;
const DATA_SOURCE_PREFIX: u8 = 0x05;
const ORACLE_SCRIPT_PREFIX: u8 = 0x06;
const REPORTER_PREFIX: u8 = 0x07;

fn id_key(prefix: u8, id: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(9);
    key.push(prefix);
    key.extend_from_slice(&id.to_be_bytes());
    key
}

/// Key of the request record for `id`.
pub fn request_key(id: RequestId) -> Vec<u8> {
    id_key(REQUEST_PREFIX, id.into())
}

/// Prefix under which all reports for `request_id` are stored.
pub fn report_prefix(request_id: RequestId) -> Vec<u8> {
    id_key(REPORT_PREFIX, request_id.into())
}

/// Key of `validator`'s report on `request_id`.
pub fn report_key(request_id: RequestId, validator: &ValAddress) -> Vec<u8> {
    let mut key = report_prefix(request_id);
    key.extend_from_slice(validator.as_bytes());
    key
}

/// Key of the result record for `id`.
pub fn result_key(id: RequestId) -> Vec<u8> {
    id_key(RESULT_PREFIX, id.into())
}

/// Key of `validator`'s oracle status record.
pub fn validator_status_key(validator: &ValAddress) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + validator.as_bytes().len());
    key.push(VALIDATOR_STATUS_PREFIX);
    key.extend_from_slice(validator.as_bytes());
    key
}

/// Key of the data-source record for `id`.
pub fn data_source_key(id: DataSourceId) -> Vec<u8> {
    id_key(DATA_SOURCE_PREFIX, id.into())
}

/// Key of the oracle-script record for `id`.
pub fn oracle_script_key(id: OracleScriptId) -> Vec<u8> {
    id_key(ORACLE_SCRIPT_PREFIX, id.into())
}

/// Prefix under which all of `validator`'s reporter grants are stored.
pub fn reporter_prefix(validator: &ValAddress) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + validator.as_bytes().len());
    key.push(REPORTER_PREFIX);
    key.extend_from_slice(validator.as_bytes());
    key
}

/// Key of the reporter grant from `validator` to `reporter`.
pub fn reporter_key(validator: &ValAddress, reporter: &sibyl_core::Address) -> Vec<u8> {
    let mut key = reporter_prefix(validator);
    key.extend_from_slice(reporter.as_bytes());
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_keys_sort_by_id() {
        let k1 = request_key(RequestId(1));
        let k2 = request_key(RequestId(2));
        let k256 = request_key(RequestId(256));
        assert!(k1 < k2);
        assert!(k2 < k256);
        assert_eq!(k1.len(), 9);
    }

    #[test]
    fn test_report_key_under_report_prefix() {
        let val = ValAddress::from([9u8; 20]);
        let key = report_key(RequestId(7), &val);
        assert!(key.starts_with(&report_prefix(RequestId(7))));
        assert_eq!(key.len(), 9 + 20);
    }

    #[test]
    fn test_record_families_disjoint() {
        let val = ValAddress::from([1u8; 20]);
        let keys = vec![
            request_key(RequestId(1)),
            report_prefix(RequestId(1)),
            result_key(RequestId(1)),
            validator_status_key(&val),
            data_source_key(DataSourceId(1)),
            oracle_script_key(OracleScriptId(1)),
            reporter_prefix(&val),
        ];
        for (i, a) in keys.iter().enumerate() {
            for (j, b) in keys.iter().enumerate() {
                if i != j {
                    assert!(!a.starts_with(b.as_slice()), "{:?} under {:?}", a, b);
                }
            }
        }
    }
}
