//! Error types for the console API client.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Canonical error payload every failed request resolves to.
///
/// Regardless of what the transport or server actually returned (network
/// failure, timeout, structured error body), calling code only ever sees
/// this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<BTreeMap<String, Vec<String>>>,
}

impl NormalizedError {
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_code: None,
            validation_errors: None,
        }
    }

    /// The first field-level validation message, in field-name order.
    pub fn first_validation_message(&self) -> Option<&str> {
        self.validation_errors
            .as_ref()?
            .values()
            .flatten()
            .next()
            .map(String::as_str)
    }
}

impl fmt::Display for NormalizedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(code) = &self.error_code {
            write!(f, " ({})", code)?;
        }
        Ok(())
    }
}

/// Error type for all API client operations.
///
/// Variants are `Clone` so a single refresh failure can be fanned out to
/// every request queued behind it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Credential is invalid and could not be refreshed. Terminal; the
    /// session layer reacts by redirecting to login, never by notifying.
    #[error("authentication failed: {0}")]
    Auth(NormalizedError),

    /// The server rejected the payload with structured field errors
    /// (HTTP 400 with an error code and a field map).
    #[error("validation failed: {0}")]
    Validation(NormalizedError),

    /// Any other non-success response from the server.
    #[error("server error: {0}")]
    Server(NormalizedError),

    /// No HTTP response was received at all.
    #[error("network error: {0}")]
    Network(NormalizedError),
}

impl ApiError {
    /// The normalized payload carried by every variant.
    pub fn details(&self) -> &NormalizedError {
        match self {
            Self::Auth(details)
            | Self::Validation(details)
            | Self::Server(details)
            | Self::Network(details) => details,
        }
    }

    /// True for failures that force a logout rather than a notification.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}

/// Result type alias using ApiError.
pub type ApiResult<T> = Result<T, ApiError>;
