// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Chain Fee Monitor
//!
//! Tracks what a USDT transfer costs on TRON, Ethereum, BSC, Polygon,
//! Avalanche and Solana, stores one sample a minute and posts daily and
//! weekly averages to Slack.
//!
//! ## Features
//!
//! - **Retry Controller**: every outbound call gets a bounded attempt
//!   budget, an optional body validator and a per-call request id
//! - **Event Feed Drain**: follows `meta.links.next` across pages
//! - **Quote/Gas Fetchers**: token quotes, gas oracles, Avalanche gas
//!   speeds and TRON chain parameters
//! - **Fee Sampler**: fee formulas per chain, DuckDB-backed averages
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chain_fee_monitor::http::HttpClient;
//! use chain_fee_monitor::quotes::{ApiKeys, QuoteClient, QuoteSources};
//!
//! #[tokio::main]
//! async fn main() -> chain_fee_monitor::Result<()> {
//!     let quotes = QuoteClient::new(
//!         HttpClient::new()?,
//!         QuoteSources::default(),
//!         ApiKeys::default(),
//!         "https://api.trongrid.io",
//!     )?;
//!     let (energy_fee, factor) = quotes.energy_price_and_factor().await?;
//!     println!("energy fee {energy_fee} sun, factor {factor}");
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                 Scheduler (track 60s / report daily)         │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │
//! ┌──────────────┬───────────────┴──┬──────────────┬────────────┐
//! │   Sampler    │     Quotes       │   Storage    │   Notify   │
//! ├──────────────┼──────────────────┼──────────────┼────────────┤
//! │ Fee formulas │ Token prices     │ DuckDB rows  │ Slack      │
//! │ Averages     │ Gas oracles      │ AVG windows  │ Log        │
//! │ Report text  │ Chain parameters │              │            │
//! └──────────────┴────────┬─────────┴──────────────┴────────────┘
//!                         │
//! ┌───────────────────────┴──────────────────────────────────────┐
//! │ HTTP: execute once → retry controller → validator → backoff  │
//! │ Pagination: meta.links.next    RPC: JSON-RPC / trigger       │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the fee monitor
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP client with retry and rate limiting
pub mod http;

/// Event feed pagination
pub mod pagination;

/// JSON-RPC, contract triggers and explorer lookups
pub mod rpc;

/// Token quotes and gas prices
pub mod quotes;

/// Fee formulas, sampling and reports
pub mod sampler;

/// DuckDB sample store
pub mod storage;

/// Report delivery
pub mod notify;

/// Track/report loop
pub mod scheduler;

/// Application configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::AppConfig;
pub use sampler::{FeeRecord, FeeReport, FeeSampler};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
