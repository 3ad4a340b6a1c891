//! Coin amounts and decimal gas prices.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single integer coin amount in one denomination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    /// Denomination, e.g. `usib`.
    pub denom: String,
    /// Integer amount in the smallest unit.
    pub amount: u128,
}

impl Coin {
    /// Creates a new coin.
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// A set of coins, at most one entry per denomination, sorted by denomination.
///
/// Zero-amount entries are dropped on construction so an empty set and a set
/// of zeroes compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Coins(Vec<Coin>);

impl Coins {
    /// Creates a coin set, merging duplicates and dropping zero amounts.
    pub fn new(coins: Vec<Coin>) -> Self {
        let mut merged: Vec<Coin> = Vec::with_capacity(coins.len());
        for coin in coins {
            if coin.amount == 0 {
                continue;
            }
            match merged.iter_mut().find(|c| c.denom == coin.denom) {
                Some(existing) => existing.amount += coin.amount,
                None => merged.push(coin),
            }
        }
        merged.sort_by(|a, b| a.denom.cmp(&b.denom));
        Self(merged)
    }

    /// The empty coin set.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Whether the set contains no coins.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Amount of the given denomination, zero if absent.
    pub fn amount_of(&self, denom: &str) -> u128 {
        self.0
            .iter()
            .find(|c| c.denom == denom)
            .map(|c| c.amount)
            .unwrap_or(0)
    }

    /// Iterates the coins in denomination order.
    pub fn iter(&self) -> std::slice::Iter<'_, Coin> {
        self.0.iter()
    }

    /// Number of denominations in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

impl From<Vec<Coin>> for Coins {
    fn from(coins: Vec<Coin>) -> Self {
        Self::new(coins)
    }
}

impl FromIterator<Coin> for Coins {
    fn from_iter<I: IntoIterator<Item = Coin>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A decimal coin amount, used for gas prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecCoin {
    /// Denomination.
    pub denom: String,
    /// Decimal amount per unit of gas.
    pub amount: Decimal,
}

impl DecCoin {
    /// Creates a new decimal coin.
    pub fn new(denom: impl Into<String>, amount: Decimal) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    /// The integer fee this price requires for the given gas limit, rounded up.
    pub fn fee_for_gas(&self, gas: u64) -> Coin {
        let fee = (self.amount * Decimal::from(gas)).ceil();
        Coin::new(
            self.denom.clone(),
            fee.to_u128().unwrap_or(u128::MAX),
        )
    }
}

impl fmt::Display for DecCoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// A list of decimal coins, one per denomination.
pub type DecCoins = Vec<DecCoin>;
