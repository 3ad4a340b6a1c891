//! Block-boundary hooks.

use crate::keeper::Keeper;
use crate::keys;
use crate::types::RequestId;
use crate::Result;
use sha2::{Digest, Sha256};
use sibyl_core::{Context, Hash};
use tracing::debug;

impl Keeper {
    /// Highest request id already handled by the expiry scan.
    pub fn last_expired_request(&self, ctx: &Context) -> u64 {
        self.get_u64(ctx, keys::LAST_EXPIRED_REQUEST_KEY)
    }

    fn set_last_expired_request(&self, ctx: &mut Context, id: u64) -> Result<()> {
        self.set_u64(ctx, keys::LAST_EXPIRED_REQUEST_KEY, id)
    }

    /// Advances the rolling seed with the new block's hash.
    ///
    /// Runs once at the start of every block, before any message of that
    /// block is applied, so committee sampling inside the block draws from
    /// seed material fixed by consensus.
    pub fn begin_block(&self, ctx: &mut Context, block_hash: &Hash) {
        let mut hasher = Sha256::new();
        hasher.update(self.rolling_seed(ctx));
        hasher.update(block_hash.as_bytes());
        let seed: [u8; 32] = hasher.finalize().into();
        self.set_rolling_seed(ctx, &seed);
    }

    /// Runs the block-end pass: drains the pending-resolve queue in
    /// insertion order, then expires overdue requests.
    ///
    /// All report submissions of the block have been applied by the time
    /// this runs, so a request whose quorum was met in this very block
    /// resolves here.
    pub fn end_block(&self, ctx: &mut Context) -> Result<()> {
        let pending = self.pending_resolve_list(ctx);
        if !pending.is_empty() {
            debug!(count = pending.len(), "resolving pending requests");
        }
        for id in &pending {
            self.resolve_request(ctx, *id)?;
        }
        self.set_pending_resolve_list(ctx, &[])?;
        self.process_expired_requests(ctx)
    }

    /// Walks requests in creation order past their resolution deadline.
    ///
    /// Requests without a result expire; every selected validator that never
    /// reported is charged a miss, whatever the request's final status.
    /// Because request ids are monotone in height, the scan stops at the
    /// first request still inside its deadline and never revisits processed
    /// ids.
    fn process_expired_requests(&self, ctx: &mut Context) -> Result<()> {
        let expiration = self.params(ctx).expiration_block_count;
        let last = self.request_count(ctx);
        let mut current = self.last_expired_request(ctx) + 1;
        while current <= last {
            let id = RequestId(current);
            let request = self.get_request(ctx, id)?;
            if ctx.block_height() <= request.request_height + expiration {
                break;
            }
            if !self.has_result(ctx, id) {
                self.resolve_expired(ctx, id)?;
            }
            for validator in &request.requested_validators {
                if !self.has_report(ctx, id, validator) {
                    self.miss_report(ctx, validator, request.request_time)?;
                }
            }
            self.set_last_expired_request(ctx, current)?;
            current += 1;
        }
        Ok(())
    }
}
