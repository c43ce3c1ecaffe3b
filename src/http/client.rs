//! HTTP client with bounded retry
//!
//! [`HttpClient::execute`] performs exactly one network call and classifies
//! the result. [`HttpClient::send`] wraps it in the retry loop:
//! - a fixed attempt budget (3 by default)
//! - an optional validator that can reject a `200` body
//! - optional backoff between attempts (none by default)
//! - a random per-call request id carried by every log line

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use super::request::{AttemptFailure, AttemptOutcome, Request};
use crate::error::{Error, Result};
use crate::types::BackoffType;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, trace};

/// Caller-supplied check run on every `200` body; an error forces a retry
pub type Validator = dyn Fn(&[u8]) -> Result<()> + Send + Sync;

/// Retry controller settings shared by every request of a client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Total timeout of a single attempt
    pub timeout: Duration,
    /// Attempts made for one logical request
    pub max_attempts: u32,
    /// Initial delay for backoff (zero disables the delay)
    pub initial_backoff: Duration,
    /// Upper bound of any single delay
    pub max_backoff: Duration,
    pub backoff_type: BackoffType,
    /// Optional outbound token bucket
    pub rate_limit: Option<RateLimiterConfig>,
    /// Headers added to every attempt
    pub default_headers: HashMap<String, String>,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(3),
            max_attempts: 3,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::from_secs(5),
            backoff_type: BackoffType::Constant,
            rate_limit: None,
            default_headers: HashMap::new(),
            user_agent: format!("chain-fee-monitor/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Fluent setter chain for [`HttpClientConfig`]
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the per-attempt timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the attempt budget
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.max_attempts = attempts;
        self
    }

    /// Delay policy between attempts; a zero `initial` disables it
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Gate every attempt behind a token bucket
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Header sent with every attempt
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// HTTP client with retry and optional rate limiting.
///
/// Cloning is cheap and every clone shares the same connection pool and
/// rate limiter.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Client with a 3 attempt budget and no backoff
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Perform exactly one network call.
    ///
    /// Only status 200 yields [`AttemptOutcome::Success`]; the body is read
    /// in full before returning.
    pub async fn execute(&self, request: &Request, request_id: u32) -> AttemptOutcome {
        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        trace!(request_id, method = %request.method(), url = request.url(), "dispatching");

        let mut req = self
            .client
            .request(request.method().into(), request.url())
            .timeout(self.config.timeout);

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if let Some(content_type) = request.content_type() {
            req = req.header(CONTENT_TYPE, content_type);
        }

        if let Some(body) = request.body() {
            req = req.body(body.clone());
        }

        let response = match req.send().await {
            Ok(response) => response,
            Err(e) => return AttemptOutcome::Failed(AttemptFailure::transport(&e)),
        };

        let status = response.status();
        if status != StatusCode::OK {
            return AttemptOutcome::Failed(AttemptFailure::BadStatus {
                status: status.as_u16(),
            });
        }

        match response.bytes().await {
            Ok(body) => AttemptOutcome::Success(body),
            Err(e) => AttemptOutcome::Failed(AttemptFailure::transport(&e)),
        }
    }

    /// Send a request through the retry loop.
    ///
    /// Returns the first body that arrives with status 200 and passes the
    /// validator, or [`Error::HttpFailed`] once the attempt budget is spent.
    pub async fn send(&self, request: &Request, validator: Option<&Validator>) -> Result<Bytes> {
        let request_id: u32 = rand::random();
        let max_attempts = self.config.max_attempts.max(1);

        info!(
            request_id,
            method = %request.method(),
            url = request.url(),
            data = %request.body_text(),
            "http request"
        );

        let mut last_failure = None;

        for attempt in 1..=max_attempts {
            let started = Instant::now();
            let outcome = self.execute(request, request_id).await;
            let cost_ms = started.elapsed().as_millis() as u64;

            let failure = match outcome {
                AttemptOutcome::Success(body) => match validator.map(|check| check(&body[..])) {
                    None | Some(Ok(())) => {
                        debug!(request_id, cost_ms, attempt, "http request succeeded");
                        return Ok(body);
                    }
                    Some(Err(e)) => AttemptFailure::Validation {
                        message: e.to_string(),
                    },
                },
                AttemptOutcome::Failed(failure) => failure,
            };

            debug!(
                request_id,
                cost_ms,
                attempt,
                reason = %failure,
                "http request retry"
            );
            last_failure = Some(failure);

            if attempt < max_attempts {
                let delay = self.calculate_backoff(attempt - 1);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
        }

        error!(
            request_id,
            attempts = max_attempts,
            "http request failed: retry exceeded {max_attempts} times"
        );

        Err(Error::HttpFailed {
            request_id,
            attempts: max_attempts,
            last: last_failure.unwrap_or(AttemptFailure::Transport {
                message: "no attempt was made".to_string(),
            }),
        })
    }

    /// GET without validation
    pub async fn get(&self, url: &str) -> Result<Bytes> {
        self.send(&Request::get(url), None).await
    }

    /// GET whose `200` body must also pass `validator`
    pub async fn get_checked(&self, url: &str, validator: &Validator) -> Result<Bytes> {
        self.send(&Request::get(url), Some(validator)).await
    }

    /// GET and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.get(url).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// POST a JSON payload without validation
    pub async fn post_json<T: Serialize + ?Sized>(&self, url: &str, payload: &T) -> Result<Bytes> {
        self.send(&Request::post_json(url, payload)?, None).await
    }

    /// POST a JSON payload whose `200` body must also pass `validator`
    pub async fn post_json_checked<T: Serialize + ?Sized>(
        &self,
        url: &str,
        payload: &T,
        validator: &Validator,
    ) -> Result<Bytes> {
        self.send(&Request::post_json(url, payload)?, Some(validator))
            .await
    }

    /// Calculate backoff delay after the given zero-based failed attempt
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let delay = match self.config.backoff_type {
            BackoffType::Constant => self.config.initial_backoff,
            BackoffType::Linear => self.config.initial_backoff * (attempt + 1),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt);
                self.config.initial_backoff.saturating_mul(factor)
            }
        };

        std::cmp::min(delay, self.config.max_backoff)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}
