//! Node calls
//!
//! JSON-RPC against the event server, constant-contract triggers against
//! the full node, and transaction lookups on the block explorer. All of
//! them go through the retry controller in [`crate::http`].

mod client;
mod types;

pub use client::{decode_hex_result, ChainClient, JSONRPC_PATH, TRIGGER_PATH};
pub use types::{JsonRpcMessage, TriggerRequest, TriggerResponse, TriggerResult, ZERO_ADDRESS};

#[cfg(test)]
mod tests;
