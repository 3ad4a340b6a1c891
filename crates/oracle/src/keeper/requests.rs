//! Request creation and lookup.

use crate::keeper::Keeper;
use crate::keys;
use crate::script::{PrepareEnv, PREPARE_BASE_GAS};
use crate::types::{IbcChannel, OracleScriptId, Request, RequestId};
use crate::{events, Error, Result};
use sibyl_core::{codec, Address, Coins, Context};
use tracing::debug;

impl Keeper {
    /// Total number of requests ever created.
    pub fn request_count(&self, ctx: &Context) -> u64 {
        self.get_u64(ctx, keys::REQUEST_COUNT_KEY)
    }

    /// Whether a request exists under `id`.
    pub fn has_request(&self, ctx: &Context, id: RequestId) -> bool {
        ctx.has(&keys::request_key(id))
    }

    /// The request stored under `id`.
    pub fn get_request(&self, ctx: &Context, id: RequestId) -> Result<Request> {
        let bytes = ctx
            .get(&keys::request_key(id))
            .ok_or(Error::UnknownRequest(id))?;
        Ok(codec::decode(&bytes)?)
    }

    /// Stores `request` under the next request id and bumps the counter.
    pub fn add_request(&self, ctx: &mut Context, request: Request) -> Result<RequestId> {
        let id = RequestId(self.request_count(ctx) + 1);
        ctx.set(&keys::request_key(id), &codec::encode(&request)?);
        self.set_u64(ctx, keys::REQUEST_COUNT_KEY, id.into())?;
        Ok(id)
    }

    /// Creates a request end to end: validates the quorum parameters, samples
    /// the committee, runs the script's prepare phase, and persists the
    /// request atomically with its raw sub-requests.
    #[allow(clippy::too_many_arguments)]
    pub fn prepare_request(
        &self,
        ctx: &mut Context,
        oracle_script_id: OracleScriptId,
        calldata: &[u8],
        ask_count: u64,
        min_count: u64,
        client_id: &str,
        _fee_limit: &Coins,
        prepare_gas: u64,
        execute_gas: u64,
        ibc_channel: Option<IbcChannel>,
        _sender: Address,
    ) -> Result<RequestId> {
        let params = self.params(ctx);
        if min_count == 0 || min_count > ask_count {
            return Err(Error::InvalidCount {
                ask_count,
                min_count,
            });
        }
        if ask_count > params.max_ask_count {
            return Err(Error::InvalidAskCount {
                ask_count,
                max: params.max_ask_count,
            });
        }
        if calldata.len() as u64 > params.max_calldata_size {
            return Err(Error::InvalidMessage(format!(
                "calldata of {} bytes exceeds limit {}",
                calldata.len(),
                params.max_calldata_size
            )));
        }
        self.get_oracle_script(ctx, oracle_script_id)?;
        let script = self
            .script(oracle_script_id)
            .ok_or(Error::UnknownOracleScript(oracle_script_id))?;

        ctx.gas_meter()
            .consume(params.base_request_gas, "base_request")?;
        ctx.gas_meter().consume(
            ask_count.saturating_mul(params.per_validator_request_gas),
            "per_validator_request",
        )?;

        let request_seq = self.request_count(ctx) + 1;
        let requested_validators = self.sample_validators(ctx, ask_count, request_seq)?;

        let mut env = PrepareEnv::new(
            calldata.to_vec(),
            ask_count,
            min_count,
            params.max_raw_request_count,
            params.max_calldata_size,
            self.data_source_count(ctx),
            prepare_gas,
        );
        env.consume_gas(PREPARE_BASE_GAS)
            .map_err(|e| Error::ScriptExecutionFailed(e.to_string()))?;
        script
            .prepare(&mut env)
            .map_err(|e| Error::ScriptExecutionFailed(e.to_string()))?;
        let raw_requests = env.into_raw_requests();
        if raw_requests.is_empty() {
            return Err(Error::EmptyRawRequests);
        }

        let request = Request::new(
            oracle_script_id,
            calldata.to_vec(),
            requested_validators,
            min_count,
            ctx.block_height(),
            ctx.block_time(),
            client_id,
            raw_requests,
            ibc_channel,
            execute_gas,
        );
        let id = self.add_request(ctx, request.clone())?;

        ctx.emit(events::request(id, &request));
        for raw in &request.raw_requests {
            ctx.emit(events::raw_request(raw));
        }
        debug!(
            request_id = %id,
            oracle_script_id = %oracle_script_id,
            ask_count,
            min_count,
            raw_requests = request.raw_requests.len(),
            "created data request"
        );
        Ok(id)
    }
}
