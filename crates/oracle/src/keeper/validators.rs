//! Validator oracle status and reporter grants.

use crate::keeper::Keeper;
use crate::keys;
use crate::types::{RequestId, ValidatorStatus};
use crate::{events, Error, Result};
use sibyl_core::{codec, Address, Context, ValAddress};
use tracing::info;

impl Keeper {
    /// The oracle status of `validator`; inactive when never recorded.
    pub fn validator_status(&self, ctx: &Context, validator: &ValAddress) -> ValidatorStatus {
        ctx.get(&keys::validator_status_key(validator))
            .and_then(|bytes| codec::decode(&bytes).ok())
            .unwrap_or_default()
    }

    /// Replaces the oracle status of `validator`.
    pub fn set_validator_status(
        &self,
        ctx: &mut Context,
        validator: &ValAddress,
        status: &ValidatorStatus,
    ) -> Result<()> {
        ctx.set(
            &keys::validator_status_key(validator),
            &codec::encode(status)?,
        );
        Ok(())
    }

    /// Re-activates `validator` for oracle duty.
    ///
    /// Fails when the validator is already active, or when the inactivity
    /// penalty window since its deactivation has not yet elapsed.
    pub fn activate(&self, ctx: &mut Context, validator: ValAddress) -> Result<()> {
        let status = self.validator_status(ctx, &validator);
        if status.is_active {
            return Err(Error::ValidatorAlreadyActive(validator));
        }
        let penalty_end = status
            .since
            .saturating_add(self.params(ctx).inactive_penalty_secs);
        if status.since != 0 && ctx.block_time() < penalty_end {
            return Err(Error::TooSoonToActivate {
                validator,
                until: penalty_end,
            });
        }
        self.set_validator_status(ctx, &validator, &ValidatorStatus::active(ctx.block_time()))?;
        ctx.emit(events::activate(&validator));
        info!(validator = %validator, "validator activated for oracle duty");
        Ok(())
    }

    /// Records a missed report obligation for `validator` on a request
    /// created at `request_time`.
    ///
    /// Only obligations incurred while the validator was active count:
    /// selection is frozen at request creation, so a validator deactivated
    /// after a request was assigned still owes that report, while requests
    /// predating its latest activation do not. Reaching the configured
    /// consecutive-miss threshold deactivates the validator.
    pub fn miss_report(
        &self,
        ctx: &mut Context,
        validator: &ValAddress,
        request_time: u64,
    ) -> Result<()> {
        let mut status = self.validator_status(ctx, validator);
        if !status.is_active || status.since >= request_time {
            return Ok(());
        }
        status.consecutive_misses += 1;
        if status.consecutive_misses >= self.params(ctx).max_consecutive_misses {
            status = ValidatorStatus::inactive(ctx.block_time());
            ctx.emit(events::deactivate(validator));
            info!(validator = %validator, "validator deactivated for missing reports");
        }
        self.set_validator_status(ctx, validator, &status)
    }

    /// Whether `reporter` may submit reports on behalf of `validator`.
    ///
    /// A validator's own operator account is always authorized; other
    /// accounts need an explicit grant.
    pub fn is_reporter(&self, ctx: &Context, validator: &ValAddress, reporter: &Address) -> bool {
        *reporter == validator.account() || ctx.has(&keys::reporter_key(validator, reporter))
    }

    /// Grants `reporter` the right to report on behalf of `validator`.
    pub fn grant_reporter(
        &self,
        ctx: &mut Context,
        validator: &ValAddress,
        reporter: &Address,
    ) -> Result<()> {
        ctx.set(&keys::reporter_key(validator, reporter), &[1]);
        Ok(())
    }

    /// Revokes `reporter`'s grant for `validator`.
    pub fn revoke_reporter(&self, ctx: &mut Context, validator: &ValAddress, reporter: &Address) {
        ctx.delete(&keys::reporter_key(validator, reporter));
    }

    /// All accounts with a reporter grant from `validator`, in address order.
    pub fn reporters_of(&self, ctx: &Context, validator: &ValAddress) -> Vec<Address> {
        let prefix = keys::reporter_prefix(validator);
        ctx.prefix(&prefix)
            .into_iter()
            .filter_map(|(key, _)| Address::from_bytes(&key[prefix.len()..]).ok())
            .collect()
    }

    /// Request ids among the unexpired window still awaiting a report from
    /// `validator`.
    ///
    /// This feeds the query surface validators poll to learn their open
    /// obligations.
    pub fn pending_request_ids(&self, ctx: &Context, validator: &ValAddress) -> Vec<RequestId> {
        let first = self.last_expired_request(ctx) + 1;
        let last = self.request_count(ctx);
        let mut pending = Vec::new();
        for id in first..=last {
            let id = RequestId(id);
            let request = match self.get_request(ctx, id) {
                Ok(request) => request,
                Err(_) => continue,
            };
            if request.is_requested(validator)
                && !self.has_report(ctx, id, validator)
                && !self.has_result(ctx, id)
            {
                pending.push(id);
            }
        }
        pending
    }
}
