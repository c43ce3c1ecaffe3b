//! Application configuration
//!
//! The whole configuration is one YAML document. Every field has a
//! default, so an empty file (or no file at all) is a working setup
//! against the public TRON endpoints. Secrets can be supplied through the
//! environment instead of the file.

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::quotes::{ApiKeys, ParameterLookup, QuoteSources};
use crate::rpc::ZERO_ADDRESS;
use crate::sampler::FeeModel;
use crate::types::{BackoffType, LogLevel, OptionStringExt};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variables that override secrets from the file
pub const ENV_SLACK_WEBHOOK_URL: &str = "SLACK_WEBHOOK_URL";
pub const ENV_ETHERSCAN_API_KEY: &str = "ETHERSCAN_API_KEY";
pub const ENV_BSCSCAN_API_KEY: &str = "BSCSCAN_API_KEY";
pub const ENV_POLYGONSCAN_API_KEY: &str = "POLYGONSCAN_API_KEY";
pub const ENV_OWLRACLE_API_KEY: &str = "OWLRACLE_API_KEY";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete application configuration loaded from YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Event server base URL (event feed and JSON-RPC)
    pub event_server: String,

    /// Full node base URL (wallet API)
    pub full_node: String,

    /// Explorer endpoint answering `?hash=` transaction lookups
    pub transaction_info_url: String,

    /// Fallback log filter when `RUST_LOG` is unset
    pub log_level: LogLevel,

    /// DuckDB file holding fee samples
    pub database_path: PathBuf,

    pub http: HttpSettings,
    pub pagination: PaginationSettings,
    pub endpoints: QuoteSources,
    pub api_keys: ApiKeys,
    pub tron: TronSettings,
    pub fees: FeeModel,
    pub schedule: ScheduleSettings,
    pub slack: SlackSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            event_server: "https://api.trongrid.io".to_string(),
            full_node: "https://api.trongrid.io".to_string(),
            transaction_info_url: "https://apilist.tronscanapi.com/api/transaction-info"
                .to_string(),
            log_level: LogLevel::default(),
            database_path: PathBuf::from("monitor.duckdb"),
            http: HttpSettings::default(),
            pagination: PaginationSettings::default(),
            endpoints: QuoteSources::default(),
            api_keys: ApiKeys::default(),
            tron: TronSettings::default(),
            fees: FeeModel::default(),
            schedule: ScheduleSettings::default(),
            slack: SlackSettings::default(),
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Retry controller settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Timeout of one attempt in milliseconds
    pub timeout_ms: u64,
    /// Attempts per logical request
    pub max_attempts: u32,
    pub backoff: BackoffSettings,
    /// Optional outbound token bucket
    pub rate_limit: Option<RateLimiterConfig>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 3_000,
            max_attempts: 3,
            backoff: BackoffSettings::default(),
            rate_limit: None,
        }
    }
}

/// Delay between attempts. Zero `initial_ms` retries immediately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffSettings {
    #[serde(rename = "type")]
    pub backoff_type: BackoffType,
    pub initial_ms: u64,
    pub max_ms: u64,
}

impl Default for BackoffSettings {
    fn default() -> Self {
        Self {
            backoff_type: BackoffType::Constant,
            initial_ms: 0,
            max_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationSettings {
    /// Page cap of one drain. `None` follows the feed until it ends.
    pub max_pages: Option<u32>,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            max_pages: Some(1_000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TronSettings {
    /// Sender used for constant-contract calls
    pub owner_address: String,
    /// Where the energy parameters sit in the chain parameter list
    pub parameter_lookup: ParameterLookup,
}

impl Default for TronSettings {
    fn default() -> Self {
        Self {
            owner_address: ZERO_ADDRESS.to_string(),
            parameter_lookup: ParameterLookup::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSettings {
    /// Seconds between fee samples
    pub track_interval_secs: u64,
    /// Daily report time, UTC
    pub report_at: NaiveTime,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            track_interval_secs: 60,
            report_at: NaiveTime::from_hms_opt(2, 0, 30).unwrap_or_default(),
        }
    }
}

impl ScheduleSettings {
    pub fn track_interval(&self) -> Duration {
        Duration::from_secs(self.track_interval_secs)
    }
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackSettings {
    /// Incoming webhook. Reports go to the log when unset.
    pub webhook_url: Option<String>,
}

impl std::fmt::Debug for SlackSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackSettings")
            .field("webhook_url", &self.webhook_url.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

// ============================================================================
// Loading
// ============================================================================

impl AppConfig {
    /// Load from a YAML file, then apply environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config '{}': {e}", path.display()))
        })?;
        let mut config = Self::from_yaml_str(&contents)?;
        config.apply_env();
        Ok(config)
    }

    /// Parse YAML without touching the environment. An empty document
    /// yields the defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Override secrets from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Override secrets from `lookup`; empty values are ignored
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).none_if_empty();

        if let Some(url) = get(ENV_SLACK_WEBHOOK_URL) {
            self.slack.webhook_url = Some(url);
        }
        if let Some(key) = get(ENV_ETHERSCAN_API_KEY) {
            self.api_keys.etherscan = key;
        }
        if let Some(key) = get(ENV_BSCSCAN_API_KEY) {
            self.api_keys.bscscan = key;
        }
        if let Some(key) = get(ENV_POLYGONSCAN_API_KEY) {
            self.api_keys.polygonscan = key;
        }
        if let Some(key) = get(ENV_OWLRACLE_API_KEY) {
            self.api_keys.owlracle = key;
        }
    }

    /// Check values that would only fail later at request time
    pub fn validate(&self) -> Result<()> {
        let urls = [
            ("event_server", self.event_server.as_str()),
            ("full_node", self.full_node.as_str()),
            ("transaction_info_url", self.transaction_info_url.as_str()),
            ("endpoints.quote_url", self.endpoints.quote_url.as_str()),
            ("endpoints.coingecko_url", self.endpoints.coingecko_url.as_str()),
            ("endpoints.etherscan_url", self.endpoints.etherscan_url.as_str()),
            ("endpoints.bscscan_url", self.endpoints.bscscan_url.as_str()),
            ("endpoints.polygonscan_url", self.endpoints.polygonscan_url.as_str()),
            ("endpoints.owlracle_url", self.endpoints.owlracle_url.as_str()),
        ];
        for (field, value) in urls {
            validate_url(field, value)?;
        }
        if let Some(webhook) = &self.slack.webhook_url {
            validate_url("slack.webhook_url", webhook)?;
        }

        if self.http.max_attempts == 0 {
            return Err(Error::invalid_value(
                "http.max_attempts",
                "must be at least 1",
            ));
        }
        if self.http.timeout_ms == 0 {
            return Err(Error::invalid_value("http.timeout_ms", "must be positive"));
        }
        if let Some(limit) = &self.http.rate_limit {
            if limit.requests_per_second == 0 || limit.burst_size == 0 {
                return Err(Error::invalid_value(
                    "http.rate_limit",
                    "requests_per_second and burst_size must be positive",
                ));
            }
        }
        if self.pagination.max_pages == Some(0) {
            return Err(Error::invalid_value(
                "pagination.max_pages",
                "must be at least 1 (omit it for no cap)",
            ));
        }
        if self.schedule.track_interval_secs == 0 {
            return Err(Error::invalid_value(
                "schedule.track_interval_secs",
                "must be positive",
            ));
        }
        Ok(())
    }

    /// Retry controller configuration
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_millis(self.http.timeout_ms))
            .max_attempts(self.http.max_attempts)
            .backoff(
                self.http.backoff.backoff_type,
                Duration::from_millis(self.http.backoff.initial_ms),
                Duration::from_millis(self.http.backoff.max_ms),
            );
        if let Some(limit) = &self.http.rate_limit {
            builder = builder.rate_limit(limit.clone());
        }
        builder.build()
    }
}

fn validate_url(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid_value(field, "must not be empty"));
    }
    url::Url::parse(value).map_err(|e| Error::invalid_value(field, e.to_string()))?;
    Ok(())
}
