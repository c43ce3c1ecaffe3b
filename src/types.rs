//! Common types used throughout the fee monitor
//!
//! Chains, HTTP verbs, retry backoff kinds and log levels, plus a couple
//! of string helpers used by the config layer and the node clients.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

pub type JsonValue = serde_json::Value;

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::GET => f.write_str("GET"),
            Method::POST => f.write_str("POST"),
        }
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff between retry attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Same delay after every failed attempt
    #[default]
    Constant,
    /// Delay grows by `initial` after each failed attempt
    Linear,
    /// Delay doubles after each failed attempt
    Exponential,
}

// ============================================================================
// Log Level
// ============================================================================

/// Log level used as the fallback filter directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

// ============================================================================
// Chain
// ============================================================================

/// Networks whose USDT transfer fee is tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Tron,
    Ethereum,
    Bsc,
    Polygon,
    Avalanche,
    Solana,
}

impl Chain {
    /// Every tracked chain, in report order
    pub const ALL: [Chain; 6] = [
        Chain::Tron,
        Chain::Ethereum,
        Chain::Bsc,
        Chain::Polygon,
        Chain::Avalanche,
        Chain::Solana,
    ];

    /// Column prefix used by the sample store
    pub fn column_prefix(self) -> &'static str {
        match self {
            Chain::Tron => "tron",
            Chain::Ethereum => "eth",
            Chain::Bsc => "bsc",
            Chain::Polygon => "polygon",
            Chain::Avalanche => "avalanche",
            Chain::Solana => "solana",
        }
    }

    /// Label used in reports
    pub fn label(self) -> &'static str {
        match self {
            Chain::Tron => "TRON",
            Chain::Ethereum => "ETH",
            Chain::Bsc => "BSC",
            Chain::Polygon => "Polygon",
            Chain::Avalanche => "Avalanche",
            Chain::Solana => "Solana",
        }
    }

    /// Symbol of the native token used to pay fees
    pub fn native_symbol(self) -> &'static str {
        match self {
            Chain::Tron => "TRX",
            Chain::Ethereum => "ETH",
            Chain::Bsc => "BNB",
            Chain::Polygon => "POL",
            Chain::Avalanche => "AVAX",
            Chain::Solana => "SOL",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Chain {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tron" | "trx" => Ok(Chain::Tron),
            "ethereum" | "eth" => Ok(Chain::Ethereum),
            "bsc" | "bnb" => Ok(Chain::Bsc),
            "polygon" | "pol" | "matic" => Ok(Chain::Polygon),
            "avalanche" | "avax" => Ok(Chain::Avalanche),
            "solana" | "sol" => Ok(Chain::Solana),
            other => Err(crate::Error::unsupported_chain(other)),
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Treat empty strings (unset env vars, blank YAML values) as absent
pub trait OptionStringExt {
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

/// Ensure a base URL ends with `/` so relative paths append to it
pub fn with_trailing_slash(base: &str) -> String {
    if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    }
}
