//! Quote and gas fetchers
//!
//! Thin adapters over the retry controller. Each fetcher issues one GET,
//! reads one scalar out of a source-specific JSON document and returns it
//! as a `Result`, so a failed fetch is never confused with a real zero.

mod fetchers;
mod types;

pub use fetchers::{unknown_as_zero, QuoteClient, CHAIN_PARAMETERS_PATH};
pub use types::{
    json_path, select_speed_fee, value_as_f64, ApiKeys, AvalancheGasResponse, ChainParameter,
    ChainParameters, GasSpeed, ParameterLookup, QuoteSources,
};
