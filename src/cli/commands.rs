//! CLI commands and argument parsing

use crate::types::Chain;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Multi-chain USDT transfer fee monitor
#[derive(Parser, Debug)]
#[command(name = "chain-fee-monitor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Track every minute and report daily until interrupted
    Run,

    /// Take one fee sample and store it
    Track,

    /// Send the daily/weekly average report now
    Report,

    /// Drain the event feed of a block (or the latest block)
    Events {
        /// Block number; the latest block when omitted
        #[arg(long)]
        block: Option<u64>,

        /// Page cap for this drain
        #[arg(long)]
        max_pages: Option<u32>,
    },

    /// Current block number via JSON-RPC
    BlockNumber,

    /// USD price of a token
    Price {
        /// Token symbol (TRX, ETH, BNB, POL, AVAX, SOL)
        symbol: String,
    },

    /// Current gas price of an EVM chain, in gwei
    Gas {
        /// ethereum, bsc, polygon or avalanche
        #[arg(value_parser = parse_chain)]
        chain: Chain,
    },

    /// Call a constant contract function on the full node
    Trigger {
        /// Contract address
        contract: String,

        /// Function selector, e.g. `balanceOf(address)`
        selector: String,

        /// ABI-encoded parameter (hex)
        #[arg(default_value = "")]
        param: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}

fn parse_chain(value: &str) -> Result<Chain, String> {
    value.parse().map_err(|e: crate::Error| e.to_string())
}
