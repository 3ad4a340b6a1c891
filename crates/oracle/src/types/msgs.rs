//! Inbound state-transition messages.

use crate::types::{OracleScriptId, RawReport, RequestId};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sibyl_core::{Address, Coins, ValAddress};

/// The closed set of messages the oracle engine applies.
///
/// Every message kind is fixed and exhaustively handled by
/// [`handle_msg`](crate::handler::handle_msg); the fee checker inspects the
/// same enum to recognize report-only transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Msg {
    /// Submit a new data request.
    RequestData {
        /// Script that prepares and aggregates the request.
        oracle_script_id: OracleScriptId,
        /// Opaque calldata passed to the script.
        calldata: Vec<u8>,
        /// Number of validators to ask.
        ask_count: u64,
        /// Reports required before resolution.
        min_count: u64,
        /// Free-form requester tag.
        client_id: String,
        /// Ceiling on data-source fees the requester is willing to pay.
        fee_limit: Coins,
        /// Gas budget for the prepare phase.
        prepare_gas: u64,
        /// Gas budget for the execute phase.
        execute_gas: u64,
        /// The requesting account.
        sender: Address,
    },

    /// Submit a validator's raw reports for a request.
    ReportData {
        /// The request being answered.
        request_id: RequestId,
        /// One raw report per raw sub-request of the request.
        raw_reports: Vec<RawReport>,
        /// The validator the reports are submitted for.
        validator: ValAddress,
    },

    /// Re-activate a deactivated validator. Must be signed by the
    /// validator's operator.
    Activate {
        /// The validator to re-activate.
        validator: ValAddress,
    },

    /// Delegated-execution envelope: `grantee` executes the inner messages
    /// on behalf of their granters.
    Exec {
        /// The account executing on behalf of others.
        grantee: Address,
        /// The wrapped messages.
        msgs: Vec<Msg>,
    },
}

impl Msg {
    /// Stateless structural validation, run before any state is touched.
    pub fn validate_basic(&self) -> Result<()> {
        match self {
            Msg::RequestData {
                ask_count,
                min_count,
                prepare_gas,
                execute_gas,
                ..
            } => {
                if *min_count == 0 || min_count > ask_count {
                    return Err(Error::InvalidCount {
                        ask_count: *ask_count,
                        min_count: *min_count,
                    });
                }
                if *prepare_gas == 0 || *execute_gas == 0 {
                    return Err(Error::InvalidMessage(
                        "prepare and execute gas budgets must be positive".into(),
                    ));
                }
                Ok(())
            }
            Msg::ReportData { raw_reports, .. } => {
                if raw_reports.is_empty() {
                    return Err(Error::InvalidMessage(
                        "report must carry at least one raw report".into(),
                    ));
                }
                Ok(())
            }
            Msg::Activate { .. } => Ok(()),
            Msg::Exec { msgs, .. } => {
                if msgs.is_empty() {
                    return Err(Error::InvalidMessage(
                        "exec envelope must wrap at least one message".into(),
                    ));
                }
                for msg in msgs {
                    msg.validate_basic()?;
                }
                Ok(())
            }
        }
    }

    /// Whether this is a direct report submission.
    pub fn is_report(&self) -> bool {
        matches!(self, Msg::ReportData { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExternalId;

    fn request_msg(ask_count: u64, min_count: u64) -> Msg {
        Msg::RequestData {
            oracle_script_id: OracleScriptId(1),
            calldata: b"calldata".to_vec(),
            ask_count,
            min_count,
            client_id: "test".into(),
            fee_limit: Coins::empty(),
            prepare_gas: 10_000,
            execute_gas: 10_000,
            sender: Address::from([1u8; 20]),
        }
    }

    #[test]
    fn test_request_counts_validated() {
        assert!(request_msg(3, 2).validate_basic().is_ok());
        assert!(matches!(
            request_msg(3, 0).validate_basic(),
            Err(Error::InvalidCount { .. })
        ));
        assert!(matches!(
            request_msg(2, 3).validate_basic(),
            Err(Error::InvalidCount { .. })
        ));
    }

    #[test]
    fn test_empty_report_rejected() {
        let msg = Msg::ReportData {
            request_id: RequestId(1),
            raw_reports: Vec::new(),
            validator: ValAddress::from([1u8; 20]),
        };
        assert!(msg.validate_basic().is_err());
    }

    #[test]
    fn test_exec_validates_inner_msgs() {
        let empty = Msg::Exec {
            grantee: Address::from([1u8; 20]),
            msgs: Vec::new(),
        };
        assert!(empty.validate_basic().is_err());

        let nested_bad = Msg::Exec {
            grantee: Address::from([1u8; 20]),
            msgs: vec![request_msg(1, 2)],
        };
        assert!(nested_bad.validate_basic().is_err());

        let good = Msg::Exec {
            grantee: Address::from([1u8; 20]),
            msgs: vec![Msg::ReportData {
                request_id: RequestId(1),
                raw_reports: vec![RawReport::new(ExternalId(1), 0, b"x".to_vec())],
                validator: ValAddress::from([2u8; 20]),
            }],
        };
        assert!(good.validate_basic().is_ok());
    }
}
