//! Report collection and quorum detection.

use crate::keeper::Keeper;
use crate::keys;
use crate::types::{RawReport, Report, RequestId};
use crate::{events, Error, Result};
use sibyl_core::{codec, Context, ValAddress};
use std::collections::BTreeSet;
use tracing::debug;

impl Keeper {
    /// Whether `validator` has reported on `request_id`.
    pub fn has_report(&self, ctx: &Context, request_id: RequestId, validator: &ValAddress) -> bool {
        ctx.has(&keys::report_key(request_id, validator))
    }

    /// Number of validators that have reported on `request_id`.
    pub fn report_count(&self, ctx: &Context, request_id: RequestId) -> u64 {
        ctx.prefix(&keys::report_prefix(request_id)).len() as u64
    }

    /// All reports on `request_id`, in validator-address order.
    pub fn get_reports(&self, ctx: &Context, request_id: RequestId) -> Result<Vec<Report>> {
        ctx.prefix(&keys::report_prefix(request_id))
            .into_iter()
            .map(|(_, bytes)| codec::decode(&bytes).map_err(Into::into))
            .collect()
    }

    /// Validates a report without applying it.
    ///
    /// Checks that the request exists, that `validator` is in its selected
    /// committee, and that the request has not already resolved. This is the
    /// same predicate the fee checker uses to recognize exempt report
    /// traffic.
    pub fn check_valid_report(
        &self,
        ctx: &Context,
        request_id: RequestId,
        validator: &ValAddress,
    ) -> Result<()> {
        let request = self.get_request(ctx, request_id)?;
        if !request.is_requested(validator) {
            return Err(Error::UnauthorizedReporter {
                request_id,
                validator: *validator,
            });
        }
        if self.has_result(ctx, request_id) {
            return Err(Error::RequestAlreadyResolved(request_id));
        }
        Ok(())
    }

    /// Validates the raw-report payload of a submission against the request.
    pub(crate) fn validate_report(
        &self,
        ctx: &Context,
        request_id: RequestId,
        validator: &ValAddress,
        raw_reports: &[RawReport],
    ) -> Result<()> {
        self.check_valid_report(ctx, request_id, validator)?;
        let request = self.get_request(ctx, request_id)?;

        let expected: BTreeSet<u64> = request
            .raw_requests
            .iter()
            .map(|r| r.external_id.into())
            .collect();
        let got: BTreeSet<u64> = raw_reports.iter().map(|r| r.external_id.into()).collect();
        if got.len() != raw_reports.len() {
            return Err(Error::InvalidReport("duplicate external id".into()));
        }
        if expected != got {
            return Err(Error::InvalidReport(
                "raw reports do not match the requested data sources".into(),
            ));
        }

        let max_size = self.params(ctx).max_report_data_size;
        for raw in raw_reports {
            if raw.data.len() as u64 > max_size {
                return Err(Error::InvalidReport(format!(
                    "raw report of {} bytes exceeds limit {}",
                    raw.data.len(),
                    max_size
                )));
            }
        }
        Ok(())
    }

    /// Stores `validator`'s raw reports for `request_id`.
    ///
    /// The first report from a validator counts toward the quorum; a
    /// resubmission overwrites the stored raw reports without counting
    /// again. The moment the counted reports reach the request's quorum, the
    /// request id is appended to the pending-resolve queue, exactly once;
    /// further reports never re-enqueue it.
    pub fn submit_report(
        &self,
        ctx: &mut Context,
        request_id: RequestId,
        validator: ValAddress,
        raw_reports: Vec<RawReport>,
    ) -> Result<()> {
        self.validate_report(ctx, request_id, &validator, &raw_reports)?;
        let request = self.get_request(ctx, request_id)?;

        let first_report = !self.has_report(ctx, request_id, &validator);
        let report = Report::new(validator, raw_reports);
        ctx.set(
            &keys::report_key(request_id, &validator),
            &codec::encode(&report)?,
        );

        let mut status = self.validator_status(ctx, &validator);
        if status.consecutive_misses != 0 {
            status.consecutive_misses = 0;
            self.set_validator_status(ctx, &validator, &status)?;
        }

        if first_report && self.report_count(ctx, request_id) == request.min_count {
            self.add_pending_request(ctx, request_id)?;
            debug!(request_id = %request_id, min_count = request.min_count, "quorum reached");
        }

        ctx.emit(events::report(request_id, &validator));
        debug!(request_id = %request_id, validator = %validator, first_report, "stored report");
        Ok(())
    }
}
