//! Validator report records.

use crate::types::ExternalId;
use serde::{Deserialize, Serialize};
use sibyl_core::ValAddress;

/// One validator's answer for a single raw sub-request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawReport {
    /// The sub-request this answers.
    pub external_id: ExternalId,
    /// Exit code of the validator-side fetch; zero means success.
    pub exit_code: u32,
    /// Raw answer payload.
    pub data: Vec<u8>,
}

impl RawReport {
    /// Creates a new raw report.
    pub fn new(external_id: ExternalId, exit_code: u32, data: Vec<u8>) -> Self {
        Self {
            external_id,
            exit_code,
            data,
        }
    }

    /// Whether this answer succeeded and carries data.
    pub fn is_answered(&self) -> bool {
        self.exit_code == 0 && !self.data.is_empty()
    }
}

/// One validator's full submission for a request.
///
/// A validator counts toward quorum the first time it reports; resubmission
/// overwrites the stored raw reports without counting again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// The reporting validator.
    pub validator: ValAddress,
    /// Raw reports, one per raw sub-request of the request.
    pub raw_reports: Vec<RawReport>,
}

impl Report {
    /// Creates a new report.
    pub fn new(validator: ValAddress, raw_reports: Vec<RawReport>) -> Self {
        Self {
            validator,
            raw_reports,
        }
    }

    /// This validator's raw report for the given sub-request, if any.
    pub fn raw_report(&self, external_id: ExternalId) -> Option<&RawReport> {
        self.raw_reports
            .iter()
            .find(|r| r.external_id == external_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_answered() {
        assert!(RawReport::new(ExternalId(1), 0, b"42".to_vec()).is_answered());
        assert!(!RawReport::new(ExternalId(1), 1, b"42".to_vec()).is_answered());
        assert!(!RawReport::new(ExternalId(1), 0, Vec::new()).is_answered());
    }

    #[test]
    fn test_raw_report_lookup() {
        let report = Report::new(
            ValAddress::from([1u8; 20]),
            vec![
                RawReport::new(ExternalId(1), 0, b"a".to_vec()),
                RawReport::new(ExternalId(2), 0, b"b".to_vec()),
            ],
        );
        assert_eq!(report.raw_report(ExternalId(2)).unwrap().data, b"b");
        assert!(report.raw_report(ExternalId(3)).is_none());
    }
}
