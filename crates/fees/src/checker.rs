//! The fee checker.

use crate::tx::FeeTx;
use crate::{Error, Result};
use rust_decimal::Decimal;
use sibyl_core::{Address, Coins, Context, DecCoin, DecCoins};
use sibyl_oracle::{Keeper, Msg, RequestId};
use std::collections::BTreeMap;
use tracing::debug;

/// The scheduling priority granted to exempt report transactions.
pub const MAX_PRIORITY: i64 = i64::MAX;

/// Chain-wide minimum-fee floor.
///
/// Applies on top of each node's local minimum gas prices: the required fee
/// per denomination is the larger of the two. When no floor is configured it
/// defaults to a zero requirement in the bond denomination, which leaves
/// nodes free to set their own prices.
#[derive(Debug, Clone)]
pub struct GlobalFee {
    /// Chain-wide minimum gas prices.
    pub minimum_gas_prices: DecCoins,
    /// The staking bond denomination.
    pub bond_denom: String,
}

impl GlobalFee {
    /// The effective floor prices.
    pub fn floor(&self) -> DecCoins {
        if self.minimum_gas_prices.is_empty() {
            vec![DecCoin::new(self.bond_denom.clone(), Decimal::ZERO)]
        } else {
            self.minimum_gas_prices.clone()
        }
    }
}

impl Default for GlobalFee {
    fn default() -> Self {
        Self {
            minimum_gas_prices: Vec::new(),
            bond_denom: "usib".into(),
        }
    }
}

/// Decides what a transaction owes in fees and where it schedules.
///
/// Report-only transactions from authorized reporters are fully fee-exempt
/// and get [`MAX_PRIORITY`]; everything else is checked against the combined
/// minimum-gas-price floor and prioritized by how far above it the declared
/// fee sits.
pub struct FeeChecker<'k> {
    oracle: &'k Keeper,
    global: GlobalFee,
}

impl<'k> FeeChecker<'k> {
    /// Creates a fee checker over the oracle keeper.
    pub fn new(oracle: &'k Keeper, global: GlobalFee) -> Self {
        Self { oracle, global }
    }

    /// Whether every message in `tx` is an authorized report submission.
    ///
    /// A message qualifies when it is a direct report whose target validator
    /// has the transaction signer as an authorized reporter, or a
    /// delegated-execution envelope whose every inner message is such a
    /// report for the envelope's grantee. Any other message kind anywhere,
    /// even mixed with valid reports, disqualifies the whole transaction.
    pub fn check_report_tx(&self, ctx: &Context, tx: &dyn FeeTx) -> bool {
        let msgs = tx.msgs();
        if msgs.is_empty() {
            return false;
        }
        for msg in msgs {
            match msg {
                Msg::ReportData {
                    request_id,
                    validator,
                    ..
                } => {
                    if !self.is_authorized_report(ctx, *request_id, validator, &tx.signer()) {
                        return false;
                    }
                }
                Msg::Exec { grantee, msgs } => {
                    if msgs.is_empty() {
                        return false;
                    }
                    for inner in msgs {
                        match inner {
                            Msg::ReportData {
                                request_id,
                                validator,
                                ..
                            } => {
                                if !self.is_authorized_report(ctx, *request_id, validator, grantee)
                                {
                                    return false;
                                }
                            }
                            _ => return false,
                        }
                    }
                }
                _ => return false,
            }
        }
        true
    }

    fn is_authorized_report(
        &self,
        ctx: &Context,
        request_id: RequestId,
        validator: &sibyl_core::ValAddress,
        reporter: &Address,
    ) -> bool {
        self.oracle.is_reporter(ctx, validator, reporter)
            && self
                .oracle
                .check_valid_report(ctx, request_id, validator)
                .is_ok()
    }

    /// Checks the declared fee and derives the scheduling priority.
    ///
    /// Exempt report transactions cost nothing and schedule at
    /// [`MAX_PRIORITY`]. All others must cover the per-denomination
    /// requirement (the larger of the node's minimum gas price and the
    /// chain-wide floor, times the gas limit) and are prioritized by the
    /// smallest declared-to-required ratio across the required
    /// denominations.
    pub fn check_tx_fee_with_min_gas_prices(
        &self,
        ctx: &Context,
        tx: &dyn FeeTx,
    ) -> Result<(Coins, i64)> {
        if self.check_report_tx(ctx, tx) {
            debug!("fee-exempt report transaction");
            return Ok((Coins::empty(), MAX_PRIORITY));
        }

        let fee = tx.fee();
        let required = self.required_fees(ctx, tx.gas_limit());
        ensure_fee_covers(&fee, &required)?;
        let priority = tx_priority(&fee, &required);
        Ok((fee, priority))
    }

    /// Required fee per denomination for the given gas limit.
    fn required_fees(&self, ctx: &Context, gas: u64) -> Coins {
        let mut prices: BTreeMap<String, Decimal> = BTreeMap::new();
        for price in ctx.min_gas_prices().iter().chain(self.global.floor().iter()) {
            let entry = prices.entry(price.denom.clone()).or_insert(Decimal::ZERO);
            if price.amount > *entry {
                *entry = price.amount;
            }
        }
        prices
            .into_iter()
            .map(|(denom, amount)| DecCoin::new(denom, amount).fee_for_gas(gas))
            .collect()
    }
}

fn ensure_fee_covers(fee: &Coins, required: &Coins) -> Result<()> {
    if required.is_empty() {
        return Ok(());
    }
    let mut covered = false;
    for req in required.iter() {
        let declared = fee.amount_of(&req.denom);
        if declared == 0 {
            continue;
        }
        if declared < req.amount {
            return Err(Error::InsufficientFee {
                fee: fee.to_string(),
                required: required.to_string(),
            });
        }
        covered = true;
    }
    if !covered {
        return Err(Error::InsufficientFee {
            fee: fee.to_string(),
            required: required.to_string(),
        });
    }
    Ok(())
}

/// Priority of a fee-paying transaction: the smallest ratio of declared to
/// required fee across the required denominations.
fn tx_priority(fee: &Coins, required: &Coins) -> i64 {
    let mut priority: Option<i64> = None;
    for req in required.iter() {
        let ratio = fee.amount_of(&req.denom) / req.amount;
        let band = i64::try_from(ratio).unwrap_or(i64::MAX);
        priority = Some(priority.map_or(band, |current| current.min(band)));
    }
    priority.unwrap_or(0)
}
