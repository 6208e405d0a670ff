//! Transport seam between the API client and the wire.
//!
//! The client never talks to reqwest directly; it hands a prepared
//! `TransportRequest` to an `HttpTransport` implementation. Tests inject
//! scripted transports, production uses `ReqwestTransport`.

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use thiserror::Error;
use url::Url;

/// A prepared outbound request.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    /// Path relative to the configured base address, e.g. `/users/3`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Bearer credential to attach, if any.
    pub bearer: Option<String>,
}

/// A raw response before normalization.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    /// Decoded JSON body; `Null` when the response carried none.
    pub body: Value,
}

/// Transport-level failure: no HTTP response was received.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One HTTP exchange against the backend.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Executes the request. `Err` means no response arrived at all;
    /// non-2xx statuses are returned as `Ok` responses.
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// Production transport backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Create a transport issuing requests against the given base address.
    pub fn new(base_url: Url) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url,
        }
    }

    fn endpoint_url(&self, path: &str) -> Result<Url, TransportError> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined)
            .map_err(|err| TransportError::new(format!("invalid request URL {}: {}", joined, err)))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let url = self.endpoint_url(&request.path)?;

        let mut builder = self.http_client.request(request.method, url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(bearer) = &request.bearer {
            builder = builder.bearer_auth(bearer);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| TransportError::new(err.to_string()))?;

        let status = response.status();
        // Empty bodies (e.g. 204 on delete) decode as Null.
        let body = response.json::<Value>().await.unwrap_or(Value::Null);

        Ok(TransportResponse { status, body })
    }
}
