//! Transfer fee formulas

use super::types::FeeRange;
use crate::types::Chain;
use serde::{Deserialize, Serialize};

/// Gas (or energy) spent by a USDT transfer, to an active and to a fresh
/// recipient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasUnits {
    pub low: f64,
    pub high: f64,
}

impl GasUnits {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    fn scale(self, factor: f64) -> FeeRange {
        FeeRange::new(factor * self.low, factor * self.high)
    }
}

/// Parameters of the fee estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeModel {
    pub tron_energy: GasUnits,
    pub ethereum_gas: GasUnits,
    pub bsc_gas: GasUnits,
    pub polygon_gas: GasUnits,
    pub avalanche_gas: GasUnits,
    /// Lamport-denominated fee units for Solana, divided by 1e6
    pub solana_units: GasUnits,
    /// Fixed BSC gas price in gwei. `None` asks the BscScan oracle.
    pub bsc_gas_price_gwei: Option<f64>,
}

impl Default for FeeModel {
    fn default() -> Self {
        Self {
            tron_energy: GasUnits::new(14_650.0, 29_650.0),
            ethereum_gas: GasUnits::new(41_309.0, 63_209.0),
            bsc_gas: GasUnits::new(34_515.0, 51_627.0),
            polygon_gas: GasUnits::new(35_394.0, 57_306.0),
            avalanche_gas: GasUnits::new(44_038.0, 61_138.0),
            solana_units: GasUnits::new(15.0, 105.0),
            bsc_gas_price_gwei: Some(1.0),
        }
    }
}

impl FeeModel {
    /// Gas units of an EVM chain
    pub fn evm_units(&self, chain: Chain) -> Option<GasUnits> {
        match chain {
            Chain::Ethereum => Some(self.ethereum_gas),
            Chain::Bsc => Some(self.bsc_gas),
            Chain::Polygon => Some(self.polygon_gas),
            Chain::Avalanche => Some(self.avalanche_gas),
            Chain::Tron | Chain::Solana => None,
        }
    }

    /// TRON fee from the TRX price, the energy price in sun and the dynamic
    /// energy factor (basis points)
    pub fn tron_fee(&self, trx_usd: f64, energy_fee_sun: f64, factor: f64) -> FeeRange {
        let per_energy = trx_usd * energy_fee_sun * (1.0 + factor / 1e4) / 1e6;
        self.tron_energy.scale(per_energy)
    }

    /// EVM fee from the native token price and the gas price in gwei.
    /// `None` for chains that are not EVM.
    pub fn evm_fee(&self, chain: Chain, native_usd: f64, gas_gwei: f64) -> Option<FeeRange> {
        self.evm_units(chain)
            .map(|units| units.scale(native_usd * gas_gwei / 1e9))
    }

    pub fn solana_fee(&self, sol_usd: f64) -> FeeRange {
        self.solana_units.scale(sol_usd / 1e6)
    }
}
