//! Wire types for node calls

use serde::{Deserialize, Serialize};

/// Sender used for read-only constant-contract calls (the TRON zero address)
pub const ZERO_ADDRESS: &str = "T9yD14Nj9j7xAB4dbGeiX9h8unkKHxuWwb";

/// JSON-RPC request id used for every call
pub const JSONRPC_ID: u32 = 233;

/// JSON-RPC 2.0 envelope, used for both request and response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsonRpcMessage {
    #[serde(rename = "jsonrpc")]
    pub version: String,
    pub id: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl JsonRpcMessage {
    /// Request for `method` with `params` hex-encoded (upper case)
    pub fn request(method: impl Into<String>, params: &[u8]) -> Self {
        Self {
            version: "2.0".to_string(),
            id: JSONRPC_ID,
            method: method.into(),
            params: Some(hex::encode_upper(params)),
            result: None,
        }
    }
}

/// Body of a `wallet/triggerconstantcontract` call
#[derive(Debug, Clone, Serialize)]
pub struct TriggerRequest<'a> {
    pub owner_address: &'a str,
    pub contract_address: &'a str,
    pub function_selector: &'a str,
    pub parameter: &'a str,
    pub visible: bool,
}

/// Reply of a `wallet/triggerconstantcontract` call
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TriggerResponse {
    #[serde(default)]
    pub result: TriggerResult,
    #[serde(default)]
    pub constant_result: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TriggerResult {
    #[serde(default)]
    pub result: bool,
    #[serde(default)]
    pub message: Option<String>,
}
