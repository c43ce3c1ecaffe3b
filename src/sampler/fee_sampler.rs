//! Fee sampler

use super::formula::FeeModel;
use super::report::format_report;
use super::types::{FeeRange, FeeRecord, FeeReport};
use crate::error::{Error, Result};
use crate::notify::Notifier;
use crate::quotes::QuoteClient;
use crate::storage::FeeStore;
use crate::types::Chain;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Samples fees into the store and reports their averages
#[derive(Debug, Clone)]
pub struct FeeSampler {
    quotes: QuoteClient,
    store: Arc<FeeStore>,
    notifier: Arc<dyn Notifier>,
    model: FeeModel,
}

impl FeeSampler {
    pub fn new(quotes: QuoteClient, store: Arc<FeeStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            quotes,
            store,
            notifier,
            model: FeeModel::default(),
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: FeeModel) -> Self {
        self.model = model;
        self
    }

    pub fn model(&self) -> &FeeModel {
        &self.model
    }

    pub fn store(&self) -> &Arc<FeeStore> {
        &self.store
    }

    /// Fetch current inputs and estimate the fee on every chain.
    ///
    /// Inputs are fetched one at a time. A chain whose inputs fail is left
    /// out of the record.
    pub async fn sample(&self) -> FeeRecord {
        let mut record = FeeRecord::new(Utc::now());
        for chain in Chain::ALL {
            match self.sample_chain(chain).await {
                Ok(fee) => {
                    debug!(chain = %chain, low = fee.low, high = fee.high, "sampled fee");
                    record.fees.insert(chain, fee);
                }
                Err(e) => warn!(chain = %chain, error = %e, "dropping chain from sample"),
            }
        }
        record
    }

    /// Estimated fee of one chain
    pub async fn sample_chain(&self, chain: Chain) -> Result<FeeRange> {
        match chain {
            Chain::Tron => {
                let trx = self.quotes.token_price(chain.native_symbol()).await?;
                let (energy_fee, factor) = self.quotes.energy_price_and_factor().await?;
                Ok(self.model.tron_fee(trx, energy_fee, factor))
            }
            Chain::Solana => {
                let sol = self.quotes.sol_price().await?;
                Ok(self.model.solana_fee(sol))
            }
            evm => {
                let native = self.quotes.native_price(evm).await?;
                let gas = match (evm, self.model.bsc_gas_price_gwei) {
                    (Chain::Bsc, Some(fixed)) => fixed,
                    (Chain::Avalanche, _) => self.quotes.avalanche_gas_price().await?,
                    _ => self.quotes.gas_price(evm).await?,
                };
                self.model
                    .evm_fee(evm, native, gas)
                    .ok_or_else(|| Error::unsupported_chain(evm.to_string()))
            }
        }
    }

    /// Take a sample and store it
    pub async fn track(&self) -> Result<FeeRecord> {
        let record = self.sample().await;
        self.store.insert(&record)?;

        let missing = record.missing();
        if missing.is_empty() {
            info!(chains = record.fees.len(), "tracked fee sample");
        } else {
            let missing: Vec<&str> = missing.iter().map(|c| c.label()).collect();
            info!(
                chains = record.fees.len(),
                missing = %missing.join(","),
                "tracked partial fee sample"
            );
        }
        Ok(record)
    }

    /// Daily and weekly averages ending at `now`
    pub fn summarize(&self, now: DateTime<Utc>) -> Result<FeeReport> {
        let daily = self.store.averages(now - Duration::days(1), now)?;
        let weekly = self.store.averages(now - Duration::days(7), now)?;
        Ok(FeeReport {
            generated_at: now,
            daily,
            weekly,
        })
    }

    /// Summarize up to now and deliver the report. Returns the text sent.
    pub async fn report(&self) -> Result<String> {
        self.report_at(Utc::now()).await
    }

    pub async fn report_at(&self, now: DateTime<Utc>) -> Result<String> {
        let summary = self.summarize(now)?;
        let text = format_report(&summary);
        self.notifier.send(&text).await?;
        info!(
            notifier = self.notifier.name(),
            daily_samples = summary.daily.samples,
            weekly_samples = summary.weekly.samples,
            "fee report sent"
        );
        Ok(text)
    }
}
