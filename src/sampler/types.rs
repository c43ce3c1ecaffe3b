//! Fee samples, averages and reports

use crate::types::Chain;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Estimated USD cost of one USDT transfer, cheapest and dearest case
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeeRange {
    pub low: f64,
    pub high: f64,
}

impl FeeRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }
}

/// One sample across all chains. A chain whose inputs could not be
/// fetched is absent rather than zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeRecord {
    pub tracked_at: DateTime<Utc>,
    pub fees: BTreeMap<Chain, FeeRange>,
}

impl FeeRecord {
    pub fn new(tracked_at: DateTime<Utc>) -> Self {
        Self {
            tracked_at,
            fees: BTreeMap::new(),
        }
    }

    /// Add the fee of `chain`
    #[must_use]
    pub fn with_fee(mut self, chain: Chain, fee: FeeRange) -> Self {
        self.fees.insert(chain, fee);
        self
    }

    pub fn fee(&self, chain: Chain) -> Option<FeeRange> {
        self.fees.get(&chain).copied()
    }

    /// Chains missing from this sample
    pub fn missing(&self) -> Vec<Chain> {
        Chain::ALL
            .into_iter()
            .filter(|c| !self.fees.contains_key(c))
            .collect()
    }
}

/// Average fees over a time window
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeeAverages {
    /// Samples that fell in the window
    pub samples: u64,
    /// Chains with at least one sample in the window
    pub fees: BTreeMap<Chain, FeeRange>,
}

impl FeeAverages {
    pub fn fee(&self, chain: Chain) -> Option<FeeRange> {
        self.fees.get(&chain).copied()
    }
}

/// Daily and weekly averages ending at `generated_at`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeReport {
    pub generated_at: DateTime<Utc>,
    pub daily: FeeAverages,
    pub weekly: FeeAverages,
}
