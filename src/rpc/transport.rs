// Copyright 2025 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::time::{Duration, Instant};

use async_trait::async_trait;
use http::Extensions;
use log::{debug, trace, warn};
use reqwest::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Request, Response, StatusCode};
use reqwest_middleware::{ClientWithMiddleware, Middleware, Next};
use thiserror::Error;
use tokio::sync::RwLock;

use super::error::RpcError;
use crate::config::ClientConfig;

/// Status and body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    /// Canonical reason phrase of `status`, when there is one.
    pub reason: Option<String>,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: String) -> Self {
        let reason = StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .map(str::to_string);
        Self { status, reason, body }
    }

    /// Statuses 200..=399 are transport-successful; anything else is routed to
    /// the failure branch of the normalizer.
    pub fn is_success(&self) -> bool {
        (200..400).contains(&self.status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkFailure {
    Timeout,
    Connect,
    Other,
}

/// A failure below HTTP: no status and no body are available.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub failure: NetworkFailure,
    pub message: String,
}

impl TransportError {
    pub fn new(failure: NetworkFailure, message: impl Into<String>) -> Self {
        Self {
            failure,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let failure = if err.is_timeout() {
            NetworkFailure::Timeout
        } else if err.is_connect() {
            NetworkFailure::Connect
        } else {
            NetworkFailure::Other
        };
        Self::new(failure, err.to_string())
    }
}

impl From<reqwest_middleware::Error> for TransportError {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(e) => e.into(),
            reqwest_middleware::Error::Middleware(e) => Self::new(NetworkFailure::Other, e.to_string()),
        }
    }
}

/// Sends one serialized JSON-RPC body and returns the raw response.
///
/// Implementations must not retry and must not interpret the body; both are
/// the caller's concern.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, body: &str) -> Result<TransportResponse, TransportError>;
}

/// JSON-RPC transport over HTTP POST with basic authentication.
pub struct HttpTransport {
    endpoint: url::Url,
    username: String,
    password: String,
    headers: HeaderMap,
    client: ClientWithMiddleware,
    last_latency: RwLock<Option<(Duration, Instant)>>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, RpcError> {
        let inner_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        let client = reqwest_middleware::ClientBuilder::new(inner_client)
            .with(ExchangeLogger)
            .build();

        Ok(Self {
            endpoint: config.url.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            headers: extra_headers(config)?,
            client,
            last_latency: RwLock::new(None),
        })
    }

    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }

    /// Round-trip time of the most recent exchange, if any has completed.
    pub async fn last_latency(&self) -> Option<Duration> {
        self.last_latency.read().await.map(|(d, _)| d)
    }

    async fn update_latency(&self, duration: Duration) {
        *self.last_latency.write().await = Some((duration, Instant::now()));
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, body: &str) -> Result<TransportResponse, TransportError> {
        let start = Instant::now();

        let resp = self
            .client
            .post(self.endpoint.clone())
            .headers(self.headers.clone())
            .header(CONTENT_TYPE, "application/json")
            .basic_auth(&self.username, Some(&self.password))
            .body(body.to_string())
            .send()
            .await?;

        self.update_latency(start.elapsed()).await;

        let status = resp.status().as_u16();
        let text = resp.text().await?;
        Ok(TransportResponse::new(status, text))
    }
}

/// Builds the configured extra headers. Content type, content length and
/// credentials are always derived per request and cannot be overridden.
fn extra_headers(config: &ClientConfig) -> Result<HeaderMap, RpcError> {
    let mut headers = HeaderMap::new();
    for (name, value) in &config.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| RpcError::Config(format!("invalid header name '{name}': {e}")))?;
        if [CONTENT_TYPE, CONTENT_LENGTH, AUTHORIZATION].contains(&name) {
            warn!(header = name.as_str(); "Ignoring configured header that the transport sets itself");
            continue;
        }
        let value =
            HeaderValue::from_str(value).map_err(|e| RpcError::Config(format!("invalid value for header '{name}': {e}")))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// Logs every exchange that passes through the HTTP client.
struct ExchangeLogger;

#[async_trait]
impl Middleware for ExchangeLogger {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let url = req.url().to_string();
        let length = req
            .body()
            .and_then(|b| b.as_bytes())
            .map(<[u8]>::len)
            .unwrap_or_default();
        trace!(url = &*url, length = length; "HTTP: Sending request");

        let start = Instant::now();
        let result = next.run(req, extensions).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(resp) => debug!(
                url = &*url,
                status = resp.status().as_u16(),
                elapsed_ms = elapsed_ms;
                "HTTP: Response received"
            ),
            Err(e) => debug!(url = &*url, error:% = e, elapsed_ms = elapsed_ms; "HTTP: Request failed"),
        }
        result
    }
}
