//! Message dispatch.

use crate::keeper::Keeper;
use crate::types::{Msg, RequestId};
use crate::{Error, Result};
use sibyl_core::Context;

/// Successful outcome of applying a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MsgResponse {
    /// A request was created.
    RequestData {
        /// The id assigned to the new request.
        request_id: RequestId,
    },
    /// A report was stored.
    ReportData,
    /// A validator was re-activated.
    Activate,
    /// An envelope was executed; one response per inner message.
    Exec {
        /// Responses of the wrapped messages, in order.
        responses: Vec<MsgResponse>,
    },
}

/// Validates and applies one message against the store.
///
/// Messages are applied in block order by the host; a returned error rejects
/// the message without touching state. For [`Msg::Exec`] every wrapped report
/// is validated, including the grantee's reporter delegation, before any of
/// them is applied, so a rejected envelope leaves no partial writes.
pub fn handle_msg(keeper: &Keeper, ctx: &mut Context, msg: &Msg) -> Result<MsgResponse> {
    msg.validate_basic()?;
    match msg {
        Msg::RequestData {
            oracle_script_id,
            calldata,
            ask_count,
            min_count,
            client_id,
            fee_limit,
            prepare_gas,
            execute_gas,
            sender,
        } => {
            let request_id = keeper.prepare_request(
                ctx,
                *oracle_script_id,
                calldata,
                *ask_count,
                *min_count,
                client_id,
                fee_limit,
                *prepare_gas,
                *execute_gas,
                None,
                *sender,
            )?;
            Ok(MsgResponse::RequestData { request_id })
        }
        Msg::ReportData {
            request_id,
            raw_reports,
            validator,
        } => {
            keeper.submit_report(ctx, *request_id, *validator, raw_reports.clone())?;
            Ok(MsgResponse::ReportData)
        }
        Msg::Activate { validator } => {
            keeper.activate(ctx, *validator)?;
            Ok(MsgResponse::Activate)
        }
        Msg::Exec { grantee, msgs } => {
            for inner in msgs {
                match inner {
                    Msg::ReportData {
                        request_id,
                        raw_reports,
                        validator,
                    } => {
                        if !keeper.is_reporter(ctx, validator, grantee) {
                            return Err(Error::UnauthorizedReporter {
                                request_id: *request_id,
                                validator: *validator,
                            });
                        }
                        keeper.validate_report(ctx, *request_id, validator, raw_reports)?;
                    }
                    _ => {
                        return Err(Error::InvalidMessage(
                            "only report messages may be executed on behalf of a validator".into(),
                        ))
                    }
                }
            }
            let mut responses = Vec::with_capacity(msgs.len());
            for inner in msgs {
                if let Msg::ReportData {
                    request_id,
                    raw_reports,
                    validator,
                } = inner
                {
                    keeper.submit_report(ctx, *request_id, *validator, raw_reports.clone())?;
                    responses.push(MsgResponse::ReportData);
                }
            }
            Ok(MsgResponse::Exec { responses })
        }
    }
}
