use super::*;
use crate::error::Error;
use crate::http::{HttpClient, HttpClientConfig};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn slack(server: &MockServer) -> SlackNotifier {
    let client = HttpClient::with_config(HttpClientConfig::default()).unwrap();
    SlackNotifier::new(client, format!("{}/services/T000/B000/XXX", server.uri())).unwrap()
}

#[tokio::test]
async fn test_slack_posts_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/services/T000/B000/XXX"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"text": "USDT daily average fee:\n"})))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    slack(&server).send("USDT daily average fee:\n").await.unwrap();
}

#[tokio::test]
async fn test_slack_retries_until_acknowledged() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("rate_limited"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    slack(&server).send("hello").await.unwrap();
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_slack_failure_is_notify_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no_service"))
        .expect(3)
        .mount(&server)
        .await;

    let err = slack(&server).send("hello").await.unwrap_err();
    assert!(matches!(err, Error::Notify { .. }));
    assert!(err.to_string().contains("404"));
}

#[test]
fn test_slack_rejects_bad_webhook() {
    let client = HttpClient::new().unwrap();
    assert!(matches!(
        SlackNotifier::new(client.clone(), "  "),
        Err(Error::InvalidConfigValue { .. })
    ));
    assert!(matches!(
        SlackNotifier::new(client, "not a url"),
        Err(Error::InvalidUrl(_))
    ));
}

#[test]
fn test_slack_debug_hides_webhook() {
    let client = HttpClient::new().unwrap();
    let notifier = SlackNotifier::new(client, "https://hooks.slack.com/services/secret").unwrap();
    assert!(!format!("{notifier:?}").contains("secret"));
    assert_eq!(notifier.name(), "slack");
}

#[tokio::test]
async fn test_log_notifier() {
    let notifier = LogNotifier;
    assert_eq!(notifier.name(), "log");
    notifier.send("report").await.unwrap();
}
