//! Resolution: turning collected reports into terminal results.

use crate::keeper::Keeper;
use crate::keys;
use crate::script::{ExecuteEnv, EXECUTE_BASE_GAS};
use crate::types::{OracleResult, RequestId, ResolveStatus};
use crate::{events, Error, Result};
use sibyl_core::{codec, Context};
use tracing::{debug, warn};

impl Keeper {
    /// Whether a terminal result exists for `id`.
    pub fn has_result(&self, ctx: &Context, id: RequestId) -> bool {
        ctx.has(&keys::result_key(id))
    }

    /// The terminal result of `id`.
    pub fn get_result(&self, ctx: &Context, id: RequestId) -> Result<OracleResult> {
        let bytes = ctx
            .get(&keys::result_key(id))
            .ok_or(Error::ResultNotFound(id))?;
        Ok(codec::decode(&bytes)?)
    }

    fn save_result(
        &self,
        ctx: &mut Context,
        id: RequestId,
        status: ResolveStatus,
        payload: Vec<u8>,
        gas_used: u64,
    ) -> Result<()> {
        let request = self.get_request(ctx, id)?;
        let result = OracleResult {
            client_id: request.client_id.clone(),
            oracle_script_id: request.oracle_script_id,
            calldata: request.calldata.clone(),
            ask_count: request.ask_count(),
            min_count: request.min_count,
            request_id: id,
            ans_count: self.report_count(ctx, id),
            request_time: request.request_time,
            resolve_height: ctx.block_height(),
            resolve_time: ctx.block_time(),
            resolve_status: status,
            result: payload,
            gas_used,
        };
        ctx.set(&keys::result_key(id), &codec::encode(&result)?);
        Ok(())
    }

    /// Terminates `id` with a successful aggregation.
    pub fn resolve_success(
        &self,
        ctx: &mut Context,
        id: RequestId,
        payload: Vec<u8>,
        gas_used: u64,
    ) -> Result<()> {
        self.save_result(ctx, id, ResolveStatus::Success, payload.clone(), gas_used)?;
        ctx.emit(events::resolve_success(id, &payload, gas_used));
        debug!(request_id = %id, gas_used, "request resolved");
        Ok(())
    }

    /// Terminates `id` after a deterministic script failure.
    pub fn resolve_failure(&self, ctx: &mut Context, id: RequestId, reason: &str) -> Result<()> {
        self.save_result(ctx, id, ResolveStatus::Failure, Vec::new(), 0)?;
        ctx.emit(events::resolve_failure(id, reason));
        warn!(request_id = %id, reason, "request resolved with script failure");
        Ok(())
    }

    /// Terminates `id` whose deadline elapsed before quorum.
    pub fn resolve_expired(&self, ctx: &mut Context, id: RequestId) -> Result<()> {
        self.save_result(ctx, id, ResolveStatus::Expired, Vec::new(), 0)?;
        ctx.emit(events::resolve_expired(id));
        debug!(request_id = %id, "request expired");
        Ok(())
    }

    /// Aggregates the collected reports of `id` through the script's execute
    /// phase.
    ///
    /// A script trap or gas exhaustion terminates the request with a
    /// `Failure` result rather than an error: once quorum is reached,
    /// resolution always makes forward progress. Re-resolving a request that
    /// already has a result is a no-op.
    pub fn resolve_request(&self, ctx: &mut Context, id: RequestId) -> Result<()> {
        if self.has_result(ctx, id) {
            return Ok(());
        }
        let request = self.get_request(ctx, id)?;
        let reports = self.get_reports(ctx, id)?;

        let script = match self.script(request.oracle_script_id) {
            Some(script) => script,
            None => return self.resolve_failure(ctx, id, "oracle script executor missing"),
        };

        let mut env = ExecuteEnv::new(
            &request.calldata,
            request.ask_count(),
            request.min_count,
            ctx.block_time(),
            &reports,
            request.execute_gas,
        );
        if env.consume_gas(EXECUTE_BASE_GAS).is_err() {
            return self.resolve_failure(ctx, id, "script ran out of gas");
        }
        match script.execute(&mut env) {
            Ok(payload) => {
                let gas_used = env.gas_used();
                self.resolve_success(ctx, id, payload, gas_used)
            }
            Err(e) => self.resolve_failure(ctx, id, &e.to_string()),
        }
    }
}
