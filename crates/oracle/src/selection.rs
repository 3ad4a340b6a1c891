//! Stake-weighted validator sampling without replacement.

use crate::rng::Rng;
use crate::{Error, Result};
use sibyl_core::ValAddress;

/// Samples `count` distinct validators from `pool`, weighted by power.
///
/// Each round draws a cumulative-stake position from the seeded stream,
/// picks the validator whose interval contains it, removes that validator
/// from the pool, and repeats. Zero-power validators are only reachable once
/// all remaining power is zero, at which point draws fall back to uniform
/// indexes.
///
/// The pool must already be in canonical order (descending power, ties by
/// address ascending); given the same stream and pool, every replica picks
/// the same committee.
pub fn sample_weighted(
    rng: &mut Rng,
    pool: &[(ValAddress, u64)],
    count: usize,
) -> Result<Vec<ValAddress>> {
    if pool.len() < count {
        return Err(Error::InsufficientValidators {
            available: pool.len(),
            requested: count,
        });
    }

    let mut remaining: Vec<(ValAddress, u64)> = pool.to_vec();
    let mut total: u128 = remaining.iter().map(|(_, power)| *power as u128).sum();
    let mut chosen = Vec::with_capacity(count);

    for _ in 0..count {
        let idx = if total == 0 {
            (rng.next_u64() as usize) % remaining.len()
        } else {
            let draw = (((rng.next_u64() as u128) << 64) | rng.next_u64() as u128) % total;
            let mut cumulative = 0u128;
            let mut found = remaining.len() - 1;
            for (i, (_, power)) in remaining.iter().enumerate() {
                cumulative += *power as u128;
                if draw < cumulative {
                    found = i;
                    break;
                }
            }
            found
        };
        let (validator, power) = remaining.remove(idx);
        total -= power as u128;
        chosen.push(validator);
    }

    Ok(chosen)
}
