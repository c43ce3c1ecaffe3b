//! Fee sampler and aggregator
//!
//! Turns token quotes and gas prices into an estimated USD cost of one USDT
//! transfer per chain, stores each sample and reports daily and weekly
//! averages.
//!
//! # Overview
//!
//! - `FeeModel` - gas units per chain and the fee formulas
//! - `FeeSampler` - sample, track, summarize and report
//! - `format_report` - the Slack text of a `FeeReport`

mod fee_sampler;
mod formula;
mod report;
mod types;

pub use fee_sampler::FeeSampler;
pub use formula::{FeeModel, GasUnits};
pub use report::{format_report, DAILY_HEADER, WEEKLY_HEADER};
pub use types::{FeeAverages, FeeRange, FeeRecord, FeeReport};

#[cfg(test)]
mod tests;
