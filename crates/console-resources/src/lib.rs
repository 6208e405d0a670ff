//! Typed resource services over the console API client.
//!
//! Each service wraps the shared `ApiClient` with entity-typed CRUD
//! operations and runs listing/lookup responses through the normalizers,
//! so callers always receive well-shaped containers.

mod lookups;
mod users;
mod voters;

pub use lookups::LookupService;
pub use users::UsersService;
pub use voters::VotersService;

use console_transport::{ApiError, ApiResult, NormalizedError};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Decode a response body that is expected to be well-formed, surfacing a
/// normalized error when it is not.
fn decode<T: DeserializeOwned>(value: Value, what: &str) -> ApiResult<T> {
    serde_json::from_value(value).map_err(|err| {
        warn!(what, error = %err, "response body was malformed");
        ApiError::Server(NormalizedError::from_message(format!(
            "Malformed {} response",
            what
        )))
    })
}
