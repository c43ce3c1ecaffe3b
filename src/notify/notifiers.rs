//! Notifier implementations

use crate::error::{Error, Result};
use crate::http::HttpClient;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

/// Body Slack returns when a webhook message was accepted
pub const SLACK_ACK: &str = "ok";

/// Destination for formatted reports
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Short channel name for logs
    fn name(&self) -> &str;

    /// Deliver `message`
    async fn send(&self, message: &str) -> Result<()>;
}

// ============================================================================
// Slack
// ============================================================================

#[derive(Serialize)]
struct SlackMessage<'a> {
    text: &'a str,
}

/// Posts messages to a Slack incoming webhook
#[derive(Clone)]
pub struct SlackNotifier {
    client: HttpClient,
    webhook_url: String,
}

impl SlackNotifier {
    pub fn new(client: HttpClient, webhook_url: impl Into<String>) -> Result<Self> {
        let webhook_url = webhook_url.into();
        if webhook_url.trim().is_empty() {
            return Err(Error::invalid_value("slack.webhook_url", "must not be empty"));
        }
        url::Url::parse(&webhook_url)?;
        Ok(Self {
            client,
            webhook_url,
        })
    }
}

impl std::fmt::Debug for SlackNotifier {
    // The webhook URL is a credential
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackNotifier").finish_non_exhaustive()
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    fn name(&self) -> &str {
        "slack"
    }

    async fn send(&self, message: &str) -> Result<()> {
        self.client
            .post_json_checked(
                &self.webhook_url,
                &SlackMessage { text: message },
                &check_slack_ack,
            )
            .await
            .map_err(|e| match e {
                Error::HttpFailed { .. } => Error::notify(format!("slack webhook: {e}")),
                other => other,
            })?;
        debug!(chars = message.len(), "report posted to slack");
        Ok(())
    }
}

fn check_slack_ack(body: &[u8]) -> Result<()> {
    let body = String::from_utf8_lossy(body);
    if body.trim() == SLACK_ACK {
        Ok(())
    } else {
        Err(Error::notify(format!("unexpected webhook reply: {body}")))
    }
}

// ============================================================================
// Log
// ============================================================================

/// Writes reports to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, message: &str) -> Result<()> {
        info!(target: "report", "\n{message}");
        Ok(())
    }
}
