//! Fetchers for token quotes, gas prices and chain parameters

use super::types::{
    number_at, select_speed_fee, ApiKeys, AvalancheGasResponse, ChainParameters, ParameterLookup,
    QuoteSources,
};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::types::{with_trailing_slash, Chain};
use serde_json::Value;
use tracing::warn;
use url::Url;

/// Path of the chain parameter endpoint on the full node
pub const CHAIN_PARAMETERS_PATH: &str = "wallet/getchainparameters";

/// Collapse a failed fetch into `0`, the value callers used to treat as
/// "unknown". Prefer matching on the `Result`.
pub fn unknown_as_zero(value: Result<f64>) -> f64 {
    value.unwrap_or(0.0)
}

/// Reads prices from the public quote, gas and node endpoints
#[derive(Debug, Clone)]
pub struct QuoteClient {
    client: HttpClient,
    sources: QuoteSources,
    api_keys: ApiKeys,
    full_node: Url,
    lookup: ParameterLookup,
}

impl QuoteClient {
    pub fn new(
        client: HttpClient,
        sources: QuoteSources,
        api_keys: ApiKeys,
        full_node: &str,
    ) -> Result<Self> {
        Ok(Self {
            client,
            sources,
            api_keys,
            full_node: Url::parse(&with_trailing_slash(full_node))?,
            lookup: ParameterLookup::default(),
        })
    }

    /// Change how chain parameters are located
    #[must_use]
    pub fn with_parameter_lookup(mut self, lookup: ParameterLookup) -> Self {
        self.lookup = lookup;
        self
    }

    /// USD price of `symbol` from the quote endpoint
    pub async fn token_price(&self, symbol: &str) -> Result<f64> {
        let mut url = Url::parse(&self.sources.quote_url)?;
        url.query_pairs_mut()
            .append_pair("convert", "USD")
            .append_pair("symbol", symbol);

        let body: Value = self.client.get_json(url.as_str()).await?;
        number_at(&body, &format!("data.{symbol}.quote.USD.price"))
    }

    /// USD price of SOL from CoinGecko
    pub async fn sol_price(&self) -> Result<f64> {
        let mut url = Url::parse(&self.sources.coingecko_url)?;
        url.query_pairs_mut()
            .append_pair("ids", "solana")
            .append_pair("vs_currencies", "usd");

        let body: Value = self.client.get_json(url.as_str()).await?;
        number_at(&body, "solana.usd")
    }

    /// USD price of the fee token of `chain`
    pub async fn native_price(&self, chain: Chain) -> Result<f64> {
        match chain {
            Chain::Solana => self.sol_price().await,
            other => self.token_price(other.native_symbol()).await,
        }
    }

    /// Proposed gas price in gwei from the chain's gas oracle.
    ///
    /// Only Ethereum, BSC and Polygon have an oracle.
    pub async fn gas_price(&self, chain: Chain) -> Result<f64> {
        let (base, key) = match chain {
            Chain::Ethereum => (&self.sources.etherscan_url, &self.api_keys.etherscan),
            Chain::Bsc => (&self.sources.bscscan_url, &self.api_keys.bscscan),
            Chain::Polygon => (&self.sources.polygonscan_url, &self.api_keys.polygonscan),
            other => return Err(Error::unsupported_chain(format!("{other} has no gas oracle"))),
        };

        let mut url = Url::parse(base)?;
        url.query_pairs_mut()
            .append_pair("module", "gastracker")
            .append_pair("action", "gasoracle")
            .append_pair("apikey", key);

        let body = self
            .client
            .get_checked(url.as_str(), &check_oracle_status)
            .await?;
        let body: Value = serde_json::from_slice(&body)?;
        number_at(&body, "result.ProposeGasPrice")
    }

    /// Max fee per gas of the first Avalanche speed accepted more than half
    /// the time
    pub async fn avalanche_gas_price(&self) -> Result<f64> {
        let mut url = Url::parse(&self.sources.owlracle_url)?;
        url.query_pairs_mut()
            .append_pair("apikey", &self.api_keys.owlracle);

        let body = self.client.get(url.as_str()).await?;
        let response: AvalancheGasResponse = serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, "malformed avalanche gas speeds");
            Error::from(e)
        })?;

        select_speed_fee(&response.speeds)
            .ok_or_else(|| Error::missing_field("speeds[acceptance in (0.5, 1.0)].maxFeePerGas"))
    }

    /// Energy price (sun) and dynamic energy factor of the TRON network
    pub async fn energy_price_and_factor(&self) -> Result<(f64, f64)> {
        let url = self.full_node.join(CHAIN_PARAMETERS_PATH)?;
        let params: ChainParameters = self.client.get_json(url.as_str()).await?;
        self.lookup.resolve(&params)
    }
}

/// The *scan oracles answer rate limits with `200` and `"status": "0"`
fn check_oracle_status(body: &[u8]) -> Result<()> {
    let value: Value = serde_json::from_slice(body)?;
    match value.get("status").and_then(Value::as_str) {
        Some("0") => Err(Error::decode(format!(
            "gas oracle rejected the request: {}",
            value.get("result").unwrap_or(&Value::Null)
        ))),
        _ => Ok(()),
    }
}
