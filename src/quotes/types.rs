//! Source endpoints and response shapes

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Sources
// ============================================================================

/// Base URLs of the public quote and gas sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteSources {
    /// Token quotes, `?convert=USD&symbol=SYM`
    pub quote_url: String,
    /// CoinGecko simple price
    pub coingecko_url: String,
    pub etherscan_url: String,
    pub bscscan_url: String,
    pub polygonscan_url: String,
    /// Avalanche gas speeds
    pub owlracle_url: String,
}

impl Default for QuoteSources {
    fn default() -> Self {
        Self {
            quote_url: "https://c.tronlink.org/v1/cryptocurrency/getprice".to_string(),
            coingecko_url: "https://api.coingecko.com/api/v3/simple/price".to_string(),
            etherscan_url: "https://api.etherscan.io/api".to_string(),
            bscscan_url: "https://api.bscscan.com/api".to_string(),
            polygonscan_url: "https://api.polygonscan.com/api".to_string(),
            owlracle_url: "https://api.owlracle.info/v4/avax/gas".to_string(),
        }
    }
}

/// API keys of the gas sources
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiKeys {
    pub etherscan: String,
    pub bscscan: String,
    pub polygonscan: String,
    pub owlracle: String,
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |key: &str| if key.is_empty() { "<unset>" } else { "<redacted>" };
        f.debug_struct("ApiKeys")
            .field("etherscan", &mask(&self.etherscan))
            .field("bscscan", &mask(&self.bscscan))
            .field("polygonscan", &mask(&self.polygonscan))
            .field("owlracle", &mask(&self.owlracle))
            .finish()
    }
}

// ============================================================================
// JSON helpers
// ============================================================================

/// Walk a dotted path (`data.TRX.quote.USD.price`) through nested objects
pub fn json_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);

    let mut current = value;
    for part in path.split('.') {
        match current {
            Value::Object(map) => current = map.get(part)?,
            _ => return None,
        }
    }
    Some(current)
}

/// Read a number that may arrive as a JSON number or a numeric string
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Number found at `path` in `value`
pub(crate) fn number_at(value: &Value, path: &str) -> Result<f64> {
    json_path(value, path)
        .and_then(value_as_f64)
        .ok_or_else(|| Error::missing_field(path))
}

// ============================================================================
// Avalanche gas speeds
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct AvalancheGasResponse {
    #[serde(default)]
    pub speeds: Vec<GasSpeed>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasSpeed {
    pub acceptance: f64,
    pub max_fee_per_gas: f64,
    #[serde(default)]
    pub max_priority_fee_per_gas: f64,
    #[serde(default)]
    pub base_fee: f64,
    #[serde(default)]
    pub estimated_fee: f64,
}

/// Fee of the first speed whose acceptance lies strictly between 0.5 and 1.0
pub fn select_speed_fee(speeds: &[GasSpeed]) -> Option<f64> {
    speeds
        .iter()
        .find(|speed| speed.acceptance > 0.5 && speed.acceptance < 1.0)
        .map(|speed| speed.max_fee_per_gas)
}

// ============================================================================
// Chain parameters
// ============================================================================

/// Reply of `wallet/getchainparameters`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChainParameters {
    #[serde(rename = "chainParameter", default)]
    pub chain_parameter: Vec<ChainParameter>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChainParameter {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
}

impl ChainParameters {
    /// Value of the parameter named `name`
    pub fn by_name(&self, name: &str) -> Option<f64> {
        self.chain_parameter
            .iter()
            .find(|p| p.key.as_deref() == Some(name))
            .and_then(|p| p.value)
    }

    /// Value at a fixed position in the list
    pub fn at(&self, index: usize) -> Option<f64> {
        self.chain_parameter.get(index).and_then(|p| p.value)
    }
}

/// How the energy fee and dynamic energy factor are found in the
/// chain parameter list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ParameterLookup {
    /// Look the parameters up by key
    ByName {
        energy_fee: String,
        energy_factor: String,
    },
    /// Read fixed positions; breaks whenever the node reorders the list
    ByIndex {
        energy_fee: usize,
        energy_factor: usize,
    },
}

impl Default for ParameterLookup {
    fn default() -> Self {
        Self::ByName {
            energy_fee: "getEnergyFee".to_string(),
            energy_factor: "getDynamicEnergyMaxFactor".to_string(),
        }
    }
}

impl ParameterLookup {
    /// The positions used by older deployments
    pub fn legacy_positions() -> Self {
        Self::ByIndex {
            energy_fee: 11,
            energy_factor: 62,
        }
    }

    /// Energy price and dynamic energy factor from `params`
    pub fn resolve(&self, params: &ChainParameters) -> Result<(f64, f64)> {
        match self {
            Self::ByName {
                energy_fee,
                energy_factor,
            } => {
                let price = params
                    .by_name(energy_fee)
                    .ok_or_else(|| Error::missing_field(format!("chainParameter[{energy_fee}]")))?;
                let factor = params.by_name(energy_factor).ok_or_else(|| {
                    Error::missing_field(format!("chainParameter[{energy_factor}]"))
                })?;
                Ok((price, factor))
            }
            Self::ByIndex {
                energy_fee,
                energy_factor,
            } => {
                let price = params
                    .at(*energy_fee)
                    .ok_or_else(|| Error::missing_field(format!("chainParameter[{energy_fee}]")))?;
                let factor = params.at(*energy_factor).ok_or_else(|| {
                    Error::missing_field(format!("chainParameter[{energy_factor}]"))
                })?;
                Ok((price, factor))
            }
        }
    }
}
