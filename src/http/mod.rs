//! HTTP request engine
//!
//! Provides the request executor and the retry controller built on it.
//!
//! # Features
//!
//! - **Single-shot executor**: one call under a fixed timeout, only `200` is success
//! - **Bounded retries**: a fixed attempt budget shared by every call
//! - **Response validation**: callers may still reject a `200` body to force a retry
//! - **Rate Limiting**: optional token bucket using governor

mod client;
mod rate_limit;
mod request;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, Validator};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use request::{AttemptFailure, AttemptOutcome, Request};
