//! Tests for node calls

use super::*;
use crate::error::Error;
use crate::http::{HttpClient, HttpClientConfig};
use serde_json::json;
use test_case::test_case;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn chain_client(server: &MockServer) -> ChainClient {
    let client = HttpClient::with_config(HttpClientConfig::default()).unwrap();
    ChainClient::new(
        client,
        &server.uri(),
        &format!("{}/node", server.uri()),
        format!("{}/api/transaction-info", server.uri()),
    )
    .unwrap()
}

// ============================================================================
// Hex results
// ============================================================================

#[test_case("0x0123", &[0x01, 0x23]; "even with prefix")]
#[test_case("0x123", &[0x01, 0x23]; "odd is left padded")]
#[test_case("123", &[0x01, 0x23]; "odd without prefix")]
#[test_case("0x", &[]; "empty")]
#[test_case("0xABcd", &[0xab, 0xcd]; "mixed case")]
fn test_decode_hex_result(input: &str, expected: &[u8]) {
    assert_eq!(decode_hex_result(input).unwrap(), expected);
}

#[test]
fn test_odd_and_padded_forms_decode_identically() {
    assert_eq!(
        decode_hex_result("0x123").unwrap(),
        decode_hex_result("0x0123").unwrap()
    );
}

#[test]
fn test_decode_hex_result_rejects_garbage() {
    assert!(matches!(
        decode_hex_result("0xzz"),
        Err(Error::Decode { .. })
    ));
}

#[test]
fn test_jsonrpc_request_envelope() {
    let message = JsonRpcMessage::request("eth_call", &[0xde, 0xad]);
    let value = serde_json::to_value(&message).unwrap();
    assert_eq!(
        value,
        json!({"jsonrpc": "2.0", "id": 233, "method": "eth_call", "params": "DEAD"})
    );
}

// ============================================================================
// JSON-RPC
// ============================================================================

#[tokio::test]
async fn test_block_number() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_json(json!({
            "jsonrpc": "2.0",
            "id": 233,
            "method": "eth_blockNumber",
            "params": ""
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 233,
            "result": "0x30d5a3f"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let number = chain_client(&server).block_number().await.unwrap();
    assert_eq!(number, 0x030d_5a3f);
}

#[tokio::test]
async fn test_json_rpc_without_result_is_no_return() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 233,
            "error": {"code": -32601, "message": "method not found"}
        })))
        .mount(&server)
        .await;

    let err = chain_client(&server)
        .call_json_rpc("eth_nope", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoReturn));
}

#[tokio::test]
async fn test_json_rpc_surfaces_http_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&server)
        .await;

    let err = chain_client(&server).block_number().await.unwrap_err();
    assert!(err.is_http_failed());
}

// ============================================================================
// Trigger
// ============================================================================

#[tokio::test]
async fn test_trigger_returns_first_constant_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/node/wallet/triggerconstantcontract"))
        .and(body_json(json!({
            "owner_address": ZERO_ADDRESS,
            "contract_address": "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t",
            "function_selector": "balanceOf(address)",
            "parameter": "00ab",
            "visible": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"result": true},
            "constant_result": ["00000000000000000000000000000000000000000000000000000000000003e8"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = chain_client(&server)
        .trigger(
            "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t",
            "balanceOf(address)",
            "00ab",
        )
        .await
        .unwrap();

    assert!(result.ends_with("3e8"));
}

#[tokio::test]
async fn test_trigger_failure_flag_is_query_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"result": false, "message": "REVERT opcode executed"}
        })))
        .mount(&server)
        .await;

    let err = chain_client(&server)
        .trigger("T", "f()", "")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::QueryFailed));
}

#[tokio::test]
async fn test_trigger_undecodable_reply_is_query_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = chain_client(&server)
        .trigger("T", "f()", "")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::QueryFailed));
}

#[tokio::test]
async fn test_trigger_without_result_is_no_return() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"result": true},
            "constant_result": []
        })))
        .mount(&server)
        .await;

    let err = chain_client(&server)
        .trigger("T", "f()", "")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoReturn));
}

#[tokio::test]
async fn test_custom_owner_address() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({
            "owner_address": "TOwner",
            "contract_address": "TContract",
            "function_selector": "f()",
            "parameter": "",
            "visible": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"result": true},
            "constant_result": ["01"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = chain_client(&server).with_owner_address("TOwner");
    assert_eq!(client.trigger("TContract", "f()", "").await.unwrap(), "01");
}

// ============================================================================
// Explorer
// ============================================================================

#[tokio::test]
async fn test_transaction_owner() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/transaction-info"))
        .and(query_param("hash", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ownerAddress": "TXYZ",
            "contractRet": "SUCCESS"
        })))
        .mount(&server)
        .await;

    let owner = chain_client(&server)
        .transaction_owner("abc123")
        .await
        .unwrap();
    assert_eq!(owner, "TXYZ");
}

#[tokio::test]
async fn test_transaction_owner_missing_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = chain_client(&server)
        .transaction_owner("abc123")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MissingField { .. }));
}
