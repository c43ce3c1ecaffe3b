//! Tests for fee formulas, sampling and reports

use super::*;
use crate::error::Result;
use crate::http::{HttpClient, HttpClientConfig};
use crate::notify::Notifier;
use crate::quotes::{ApiKeys, QuoteClient, QuoteSources};
use crate::storage::FeeStore;
use crate::types::Chain;
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EPS: f64 = 1e-9;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}

#[derive(Debug, Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, message: &str) -> Result<()> {
        self.sent.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

fn quote_client(server: &MockServer) -> QuoteClient {
    let uri = server.uri();
    let sources = QuoteSources {
        quote_url: format!("{uri}/v1/cryptocurrency/getprice"),
        coingecko_url: format!("{uri}/api/v3/simple/price"),
        etherscan_url: format!("{uri}/etherscan/api"),
        bscscan_url: format!("{uri}/bscscan/api"),
        polygonscan_url: format!("{uri}/polygonscan/api"),
        owlracle_url: format!("{uri}/v4/avax/gas"),
    };
    let client = HttpClient::with_config(HttpClientConfig::default()).unwrap();
    QuoteClient::new(client, sources, ApiKeys::default(), &format!("{uri}/node")).unwrap()
}

fn sampler(server: &MockServer) -> (FeeSampler, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let store = Arc::new(FeeStore::in_memory().unwrap());
    let sampler = FeeSampler::new(quote_client(server), store, notifier.clone());
    (sampler, notifier)
}

async fn mount_price(server: &MockServer, symbol: &str, price: &str) {
    Mock::given(method("GET"))
        .and(path("/v1/cryptocurrency/getprice"))
        .and(query_param("symbol", symbol))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {symbol: {"quote": {"USD": {"price": price}}}}
        })))
        .mount(server)
        .await;
}

async fn mount_oracle(server: &MockServer, oracle: &str, gwei: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/{oracle}/api")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "1",
            "result": {"ProposeGasPrice": gwei}
        })))
        .mount(server)
        .await;
}

/// Every source answers; ETH's oracle only when `eth_oracle` is set
async fn mount_sources(server: &MockServer, eth_oracle: bool) {
    mount_price(server, "TRX", "0.2").await;
    mount_price(server, "ETH", "2000").await;
    mount_price(server, "BNB", "500").await;
    mount_price(server, "POL", "0.5").await;
    mount_price(server, "AVAX", "30").await;

    if eth_oracle {
        mount_oracle(server, "etherscan", "10").await;
    } else {
        Mock::given(path("/etherscan/api"))
            .respond_with(ResponseTemplate::new(500))
            .mount(server)
            .await;
    }
    mount_oracle(server, "polygonscan", "100").await;

    Mock::given(path("/v4/avax/gas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "speeds": [
                {"acceptance": 0.35, "maxFeePerGas": 20.0},
                {"acceptance": 0.6, "maxFeePerGas": 25.0},
                {"acceptance": 0.9, "maxFeePerGas": 28.0}
            ]
        })))
        .mount(server)
        .await;
    Mock::given(path("/api/v3/simple/price"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"solana": {"usd": 150}})))
        .mount(server)
        .await;
    Mock::given(path("/node/wallet/getchainparameters"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "chainParameter": [
                {"key": "getEnergyFee", "value": 210},
                {"key": "getDynamicEnergyMaxFactor", "value": 10000}
            ]
        })))
        .mount(server)
        .await;
}

// ============================================================================
// Formulas
// ============================================================================

#[test]
fn test_tron_fee() {
    let fee = FeeModel::default().tron_fee(0.2, 210.0, 10_000.0);
    assert_close(fee.low, 0.2 * 210.0 * 2.0 * 14_650.0 / 1e6);
    assert_close(fee.high, 0.2 * 210.0 * 2.0 * 29_650.0 / 1e6);
}

#[test]
fn test_evm_fees() {
    let model = FeeModel::default();

    let eth = model.evm_fee(Chain::Ethereum, 2000.0, 10.0).unwrap();
    assert_close(eth.low, 2000.0 * 10.0 * 41_309.0 / 1e9);
    assert_close(eth.high, 2000.0 * 10.0 * 63_209.0 / 1e9);

    let bsc = model.evm_fee(Chain::Bsc, 500.0, 1.0).unwrap();
    assert_close(bsc.low, 500.0 * 34_515.0 / 1e9);
    assert_close(bsc.high, 500.0 * 51_627.0 / 1e9);

    let polygon = model.evm_fee(Chain::Polygon, 0.5, 100.0).unwrap();
    assert_close(polygon.low, 0.5 * 100.0 * 35_394.0 / 1e9);
    assert_close(polygon.high, 0.5 * 100.0 * 57_306.0 / 1e9);

    let avalanche = model.evm_fee(Chain::Avalanche, 30.0, 25.0).unwrap();
    assert_close(avalanche.low, 30.0 * 25.0 * 44_038.0 / 1e9);
    assert_close(avalanche.high, 30.0 * 25.0 * 61_138.0 / 1e9);
}

#[test]
fn test_evm_fee_rejects_non_evm() {
    let model = FeeModel::default();
    assert_eq!(model.evm_fee(Chain::Tron, 1.0, 1.0), None);
    assert_eq!(model.evm_fee(Chain::Solana, 1.0, 1.0), None);
}

#[test]
fn test_solana_fee() {
    let fee = FeeModel::default().solana_fee(150.0);
    assert_close(fee.low, 150.0 * 15.0 / 1e6);
    assert_close(fee.high, 150.0 * 105.0 / 1e6);
}

#[test]
fn test_fee_model_yaml_defaults() {
    let model: FeeModel = serde_yaml::from_str("bsc_gas_price_gwei: 3.0\n").unwrap();
    assert_eq!(model.bsc_gas_price_gwei, Some(3.0));
    assert_eq!(model.ethereum_gas, GasUnits::new(41_309.0, 63_209.0));
}

// ============================================================================
// Report text
// ============================================================================

#[test]
fn test_format_report() {
    let mut daily = FeeAverages {
        samples: 1440,
        ..FeeAverages::default()
    };
    daily.fees.insert(Chain::Tron, FeeRange::new(1.2306, 2.4906));
    daily.fees.insert(Chain::Ethereum, FeeRange::new(0.82618, 1.26418));
    daily.fees.insert(Chain::Bsc, FeeRange::new(0.017, 0.026));
    daily.fees.insert(Chain::Polygon, FeeRange::new(0.0018, 0.0029));
    daily.fees.insert(Chain::Avalanche, FeeRange::new(0.033, 0.046));
    daily.fees.insert(Chain::Solana, FeeRange::new(0.00225, 0.01575));

    let mut weekly = daily.clone();
    weekly.fees.remove(&Chain::Avalanche);

    let report = FeeReport {
        generated_at: Utc::now(),
        daily,
        weekly,
    };

    assert_eq!(
        format_report(&report),
        "USDT daily average fee:\n\
         > TRON: `1.23$` - `2.49$`\n\
         > ETH: `0.83$` - `1.26$`\n\
         > BSC: `0.02$` - `0.03$`\n\
         > Polygon: `0.00$` - `0.00$`\n\
         > Avalanche: `0.03$` - `0.05$`\n\
         > Solana: `0.00$` - `0.02$`\n\
         USDT weekly average fee:\n\
         > TRON: `1.23$` - `2.49$`\n\
         > ETH: `0.83$` - `1.26$`\n\
         > BSC: `0.02$` - `0.03$`\n\
         > Polygon: `0.00$` - `0.00$`\n\
         > Avalanche: `n/a`\n\
         > Solana: `0.00$` - `0.02$`\n"
    );
}

// ============================================================================
// Sampling
// ============================================================================

#[tokio::test]
async fn test_sample_all_chains() {
    let server = MockServer::start().await;
    mount_sources(&server, true).await;
    let (sampler, _) = sampler(&server);

    let record = sampler.sample().await;
    assert!(record.missing().is_empty());

    let tron = record.fee(Chain::Tron).unwrap();
    assert_close(tron.low, 0.2 * 210.0 * 2.0 * 14_650.0 / 1e6);

    let bsc = record.fee(Chain::Bsc).unwrap();
    assert_close(bsc.low, 500.0 * 1.0 * 34_515.0 / 1e9);

    let avalanche = record.fee(Chain::Avalanche).unwrap();
    assert_close(avalanche.high, 30.0 * 25.0 * 61_138.0 / 1e9);

    let solana = record.fee(Chain::Solana).unwrap();
    assert_close(solana.high, 150.0 * 105.0 / 1e6);

    // BSC uses the fixed gas price, so its oracle is never asked
    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path() != "/bscscan/api"));
}

#[tokio::test]
async fn test_failed_input_drops_only_that_chain() {
    let server = MockServer::start().await;
    mount_sources(&server, false).await;
    let (sampler, _) = sampler(&server);

    let record = sampler.sample().await;
    assert_eq!(record.missing(), vec![Chain::Ethereum]);
    assert_eq!(record.fees.len(), 5);
}

#[tokio::test]
async fn test_bsc_oracle_when_no_fixed_price() {
    let server = MockServer::start().await;
    mount_price(&server, "BNB", "500").await;
    mount_oracle(&server, "bscscan", "3").await;
    let (sampler, _) = sampler(&server);
    let sampler = sampler.with_model(FeeModel {
        bsc_gas_price_gwei: None,
        ..FeeModel::default()
    });

    let fee = sampler.sample_chain(Chain::Bsc).await.unwrap();
    assert_close(fee.low, 500.0 * 3.0 * 34_515.0 / 1e9);
}

#[tokio::test]
async fn test_track_stores_sample() {
    let server = MockServer::start().await;
    mount_sources(&server, true).await;
    let (sampler, _) = sampler(&server);

    let record = sampler.track().await.unwrap();
    assert_eq!(record.fees.len(), 6);
    assert_eq!(sampler.store().count().unwrap(), 1);
}

// ============================================================================
// Summaries
// ============================================================================

#[tokio::test]
async fn test_summarize_windows() {
    let server = MockServer::start().await;
    let (sampler, _) = sampler(&server);
    let now = Utc.with_ymd_and_hms(2024, 3, 8, 2, 0, 30).unwrap();

    let store = sampler.store();
    store
        .insert(&FeeRecord::new(now - Duration::hours(2)).with_fee(Chain::Tron, FeeRange::new(1.0, 2.0)))
        .unwrap();
    store
        .insert(&FeeRecord::new(now - Duration::days(3)).with_fee(Chain::Tron, FeeRange::new(3.0, 4.0)))
        .unwrap();
    store
        .insert(&FeeRecord::new(now - Duration::days(9)).with_fee(Chain::Tron, FeeRange::new(50.0, 50.0)))
        .unwrap();

    let summary = sampler.summarize(now).unwrap();
    assert_eq!(summary.daily.samples, 1);
    assert_eq!(summary.daily.fee(Chain::Tron), Some(FeeRange::new(1.0, 2.0)));
    assert_eq!(summary.weekly.samples, 2);
    assert_eq!(summary.weekly.fee(Chain::Tron), Some(FeeRange::new(2.0, 3.0)));
    assert_eq!(summary.weekly.fee(Chain::Ethereum), None);
}

#[tokio::test]
async fn test_report_goes_to_notifier() {
    let server = MockServer::start().await;
    let (sampler, notifier) = sampler(&server);
    let now = Utc.with_ymd_and_hms(2024, 3, 8, 2, 0, 30).unwrap();

    sampler
        .store()
        .insert(&FeeRecord::new(now - Duration::minutes(1)).with_fee(Chain::Solana, FeeRange::new(0.004, 0.016)))
        .unwrap();

    let text = sampler.report_at(now).await.unwrap();
    let sent = notifier.sent.lock().unwrap().clone();
    assert_eq!(sent, vec![text.clone()]);
    assert!(text.starts_with(DAILY_HEADER));
    assert!(text.contains("> Solana: `0.00$` - `0.02$`"));
    assert!(text.contains("> TRON: `n/a`"));
    assert!(text.contains(WEEKLY_HEADER));
}
