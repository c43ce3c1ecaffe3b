//! Request and per-attempt outcome types

use crate::error::Result;
use crate::types::Method;
use bytes::Bytes;
use serde::Serialize;
use std::fmt;

/// Content type used for JSON bodies
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// A single logical HTTP request.
///
/// Built once per call by a fetcher or the paginator and never mutated;
/// every retry attempt sends the same request.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: String,
    body: Option<Bytes>,
    content_type: Option<String>,
}

impl Request {
    /// GET request without a body
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            body: None,
            content_type: None,
        }
    }

    /// POST request carrying `payload` serialized as JSON
    pub fn post_json<T: Serialize + ?Sized>(url: impl Into<String>, payload: &T) -> Result<Self> {
        let body = serde_json::to_vec(payload)?;
        Ok(Self {
            method: Method::POST,
            url: url.into(),
            body: Some(Bytes::from(body)),
            content_type: Some(JSON_CONTENT_TYPE.to_string()),
        })
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Body rendered for logs (`nil` when there is none)
    pub fn body_text(&self) -> String {
        match &self.body {
            Some(body) => String::from_utf8_lossy(body).into_owned(),
            None => "nil".to_string(),
        }
    }
}

/// Why a single attempt did not produce a usable body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    /// Connection, DNS, TLS, timeout or body-read failure
    Transport { message: String },
    /// Any status other than 200
    BadStatus { status: u16 },
    /// The caller's validator rejected a 200 body
    Validation { message: String },
}

impl AttemptFailure {
    pub(crate) fn transport(err: &reqwest::Error) -> Self {
        Self::Transport {
            message: err.to_string(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    pub fn is_bad_status(&self) -> bool {
        matches!(self, Self::BadStatus { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { message } => write!(f, "{message}"),
            Self::BadStatus { status } => write!(f, "invalid status code {status}"),
            Self::Validation { message } => write!(f, "{message}"),
        }
    }
}

/// Result of one executor call
#[derive(Debug, Clone)]
pub enum AttemptOutcome {
    /// Status 200 with the full body
    Success(Bytes),
    /// Anything else
    Failed(AttemptFailure),
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}
