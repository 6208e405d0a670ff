//! Session state for the console client.
//!
//! `SessionStore` is the single source of truth for "who is the current
//! user". It drives login, logout, and startup identity checks through
//! the API client, and subscribes to the client's event channel so a
//! refresh failure detected deep inside the transport clears the session
//! without any direct call between the two layers.

mod store;

pub use store::{SessionSnapshot, SessionStore};
