// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for delivering actions to the shipment service.
//!
//! Provides a trait-based transport layer that enables:
//! - Real HTTP delivery for production ([`HttpTransport`])
//! - Mock transports for unit testing
//!
//! Any error or non-2xx response counts as a failed attempt; the drain loop
//! decides whether to retry.

use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// HTTP method of a delivery request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Post,
    Put,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fully resolved remote call.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    /// Path relative to the service base URL, e.g. `/api/shipments`.
    pub path: String,
    pub body: Value,
    /// Whether the session credentials must accompany the request.
    pub credentials: bool,
}

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request never produced a response (connect, timeout, TLS...).
    #[error("request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status.
    #[error("rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Delivers one request to the remote service.
///
/// This trait abstracts over the actual transport mechanism, allowing
/// for easy testing with mock implementations.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: &Request,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>>;
}

/// Longest response body kept in a rejection message.
const MAX_ERROR_BODY: usize = 512;

/// JSON-over-HTTP transport built on reqwest.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    session_cookie: Option<String>,
}

impl HttpTransport {
    /// Create a transport for the service at `base_url`.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        session_cookie: Option<String>,
    ) -> TransportResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("outbox/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(HttpTransport {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session_cookie,
        })
    }

    /// Absolute URL for a request path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        request: &Request,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>> {
        let url = self.url_for(&request.path);
        let method = match request.method {
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
        };
        let mut builder = self.client.request(method, url).json(&request.body);
        if request.credentials {
            if let Some(cookie) = &self.session_cookie {
                builder = builder.header(reqwest::header::COOKIE, cookie);
            }
        }

        Box::pin(async move {
            let response = builder
                .send()
                .await
                .map_err(|e| TransportError::Request(e.to_string()))?;

            let status = response.status();
            if status.is_success() {
                return Ok(());
            }

            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|&i| body.is_char_boundary(i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            Err(TransportError::Rejected {
                status: status.as_u16(),
                body,
            })
        })
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
