//! Authenticated HTTP client for the console REST API.
//!
//! This crate provides:
//! - `ApiClient`: the request pipeline that attaches bearer credentials,
//!   intercepts 401 responses, and recovers via a single-flight refresh
//! - `HttpTransport`: the seam between the client and the wire, with a
//!   reqwest-backed production implementation
//! - `ApiError` / `NormalizedError`: the canonical error surface every
//!   failed request resolves to
//! - `EventChannel`: the broadcast channel that decouples transport-level
//!   logout detection from session state

mod client;
mod error;
mod events;
mod transport;

pub use client::{ApiClient, IDENTITY_PATH, LOGIN_PATH, LOGOUT_PATH, REFRESH_PATH};
pub use error::{ApiError, ApiResult, NormalizedError};
pub use events::{ClientEvent, EventChannel};
pub use transport::{
    HttpTransport, ReqwestTransport, TransportError, TransportRequest, TransportResponse,
};
