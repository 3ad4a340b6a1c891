//! The oracle keeper: all store operations of the engine.
//!
//! The keeper owns no chain state itself; everything lives in the store
//! reached through the apply [`Context`]. It does own the executable half of
//! the script registry and the handle to the staking view it samples
//! committees from.

mod block;
mod registry;
mod reports;
mod requests;
mod results;
mod validators;

use crate::keys;
use crate::params::OracleParams;
use crate::rng::Rng;
use crate::script::OracleScript;
use crate::selection;
use crate::types::{OracleScriptId, RequestId};
use crate::Result;
use sibyl_core::{codec, Context, ValAddress};
use std::collections::HashMap;

/// Read-only view of the host's bonded validator set.
///
/// Implementations must be deterministic across replicas for the same block;
/// the keeper canonicalizes ordering itself, so any stable enumeration works.
pub trait ValidatorSet {
    /// The bonded validators and their staked power.
    fn bonded_validators(&self) -> Vec<(ValAddress, u64)>;
}

/// Store operations for the oracle engine.
pub struct Keeper {
    staking: Box<dyn ValidatorSet>,
    scripts: HashMap<OracleScriptId, Box<dyn OracleScript>>,
}

impl Keeper {
    /// Creates a keeper over the given staking view.
    pub fn new(staking: Box<dyn ValidatorSet>) -> Self {
        Self {
            staking,
            scripts: HashMap::new(),
        }
    }

    /// Current oracle parameters, defaults when unset.
    pub fn params(&self, ctx: &Context) -> OracleParams {
        ctx.get(keys::PARAMS_KEY)
            .and_then(|bytes| codec::decode(&bytes).ok())
            .unwrap_or_default()
    }

    /// Replaces the oracle parameters.
    pub fn set_params(&self, ctx: &mut Context, params: &OracleParams) -> Result<()> {
        ctx.set(keys::PARAMS_KEY, &codec::encode(params)?);
        Ok(())
    }

    /// The request ids whose quorum is met but which are not yet resolved,
    /// in insertion order.
    pub fn pending_resolve_list(&self, ctx: &Context) -> Vec<RequestId> {
        ctx.get(keys::PENDING_RESOLVE_LIST_KEY)
            .and_then(|bytes| codec::decode(&bytes).ok())
            .unwrap_or_default()
    }

    /// Replaces the pending-resolve queue.
    pub fn set_pending_resolve_list(&self, ctx: &mut Context, ids: &[RequestId]) -> Result<()> {
        ctx.set(keys::PENDING_RESOLVE_LIST_KEY, &codec::encode(&ids)?);
        Ok(())
    }

    /// Appends a request to the pending-resolve queue.
    ///
    /// A request enters the queue at most once; re-adding an id already
    /// queued is a no-op.
    pub(crate) fn add_pending_request(&self, ctx: &mut Context, id: RequestId) -> Result<()> {
        let mut pending = self.pending_resolve_list(ctx);
        if pending.contains(&id) {
            return Ok(());
        }
        pending.push(id);
        self.set_pending_resolve_list(ctx, &pending)
    }

    /// The current rolling seed for committee sampling.
    pub fn rolling_seed(&self, ctx: &Context) -> Vec<u8> {
        ctx.get(keys::ROLLING_SEED_KEY).unwrap_or_else(|| vec![0u8; 32])
    }

    pub(crate) fn set_rolling_seed(&self, ctx: &mut Context, seed: &[u8]) {
        ctx.set(keys::ROLLING_SEED_KEY, seed);
    }

    /// Samples a committee of `ask_count` active validators for the request
    /// with sequence number `request_seq`.
    ///
    /// The draw stream is seeded from the rolling seed, the sequence number,
    /// and the chain id, so every replica applying the same block selects the
    /// same committee.
    pub fn sample_validators(
        &self,
        ctx: &Context,
        ask_count: u64,
        request_seq: u64,
    ) -> Result<Vec<ValAddress>> {
        let mut pool: Vec<(ValAddress, u64)> = self
            .staking
            .bonded_validators()
            .into_iter()
            .filter(|(validator, _)| self.validator_status(ctx, validator).is_active)
            .collect();
        pool.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let seed = self.rolling_seed(ctx);
        let mut rng = Rng::new(&[
            &seed,
            &request_seq.to_be_bytes(),
            ctx.chain_id().as_bytes(),
        ]);
        selection::sample_weighted(&mut rng, &pool, ask_count as usize)
    }

    pub(crate) fn script(&self, id: OracleScriptId) -> Option<&dyn OracleScript> {
        self.scripts.get(&id).map(|s| s.as_ref())
    }

    pub(crate) fn insert_script(&mut self, id: OracleScriptId, script: Box<dyn OracleScript>) {
        self.scripts.insert(id, script);
    }

    pub(crate) fn get_u64(&self, ctx: &Context, key: &[u8]) -> u64 {
        ctx.get(key)
            .and_then(|bytes| codec::decode(&bytes).ok())
            .unwrap_or(0)
    }

    pub(crate) fn set_u64(&self, ctx: &mut Context, key: &[u8], value: u64) -> Result<()> {
        ctx.set(key, &codec::encode(&value)?);
        Ok(())
    }
}
