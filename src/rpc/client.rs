//! Client for node and explorer calls

use super::types::{JsonRpcMessage, TriggerRequest, TriggerResponse, ZERO_ADDRESS};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::types::with_trailing_slash;
use serde_json::Value;
use std::borrow::Cow;
use tracing::debug;
use url::Url;

/// Path of the JSON-RPC endpoint on the event server
pub const JSONRPC_PATH: &str = "jsonrpc";

/// Path of the constant-contract endpoint on the full node
pub const TRIGGER_PATH: &str = "wallet/triggerconstantcontract";

/// Calls against the event server, the full node and the explorer
#[derive(Debug, Clone)]
pub struct ChainClient {
    client: HttpClient,
    event_server: Url,
    full_node: Url,
    transaction_info_url: String,
    owner_address: String,
}

impl ChainClient {
    pub fn new(
        client: HttpClient,
        event_server: &str,
        full_node: &str,
        transaction_info_url: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            client,
            event_server: Url::parse(&with_trailing_slash(event_server))?,
            full_node: Url::parse(&with_trailing_slash(full_node))?,
            transaction_info_url: transaction_info_url.into(),
            owner_address: ZERO_ADDRESS.to_string(),
        })
    }

    /// Use another sender address for constant-contract calls
    #[must_use]
    pub fn with_owner_address(mut self, owner_address: impl Into<String>) -> Self {
        self.owner_address = owner_address.into();
        self
    }

    /// Call `method` and return the hex-decoded `result`
    pub async fn call_json_rpc(&self, method: &str, params: &[u8]) -> Result<Vec<u8>> {
        let url = self.event_server.join(JSONRPC_PATH)?;
        let body = self
            .client
            .post_json(url.as_str(), &JsonRpcMessage::request(method, params))
            .await?;

        let reply: JsonRpcMessage = serde_json::from_slice(&body)?;
        let result = reply.result.ok_or(Error::NoReturn)?;
        decode_hex_result(&result)
    }

    /// Current block height via `eth_blockNumber`
    pub async fn block_number(&self) -> Result<u64> {
        let bytes = self.call_json_rpc("eth_blockNumber", &[]).await?;
        if bytes.len() > 8 {
            return Err(Error::decode(format!(
                "block number does not fit in 64 bits ({} bytes)",
                bytes.len()
            )));
        }
        Ok(bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
    }

    /// Run a read-only contract call and return the first constant result
    pub async fn trigger(&self, contract: &str, selector: &str, parameter: &str) -> Result<String> {
        let url = self.full_node.join(TRIGGER_PATH)?;
        let request = TriggerRequest {
            owner_address: &self.owner_address,
            contract_address: contract,
            function_selector: selector,
            parameter,
            visible: true,
        };

        let body = self.client.post_json(url.as_str(), &request).await?;
        // An undecodable reply carries no success flag either
        let reply: TriggerResponse = serde_json::from_slice(&body).unwrap_or_default();

        if !reply.result.result {
            debug!(contract, selector, message = ?reply.result.message, "trigger rejected");
            return Err(Error::QueryFailed);
        }

        reply.constant_result.into_iter().next().ok_or(Error::NoReturn)
    }

    /// Sender address of the transaction `tx_hash`
    pub async fn transaction_owner(&self, tx_hash: &str) -> Result<String> {
        let mut url = Url::parse(&self.transaction_info_url)?;
        url.query_pairs_mut().append_pair("hash", tx_hash);

        let info: Value = self.client.get_json(url.as_str()).await?;
        info.get("ownerAddress")
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| Error::missing_field("ownerAddress"))
    }
}

/// Decode a hex JSON-RPC result.
///
/// The `0x` prefix is optional and an odd number of digits is read as if
/// a leading `0` nibble were present, so `0x123` equals `0x0123`.
pub fn decode_hex_result(result: &str) -> Result<Vec<u8>> {
    let digits = result
        .strip_prefix("0x")
        .or_else(|| result.strip_prefix("0X"))
        .unwrap_or(result);

    let digits = if digits.len() % 2 == 1 {
        Cow::Owned(format!("0{digits}"))
    } else {
        Cow::Borrowed(digits)
    };

    hex::decode(digits.as_ref())
        .map_err(|e| Error::decode(format!("invalid hex result {result:?}: {e}")))
}
