//! Response envelopes used by the console backend.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Paginated listing envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> Page<T> {
    /// An empty first page with the backend's default page size.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            page: 1,
            page_size: 10,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Structured error body returned by the backend on failed requests.
///
/// All fields are optional on the wire; missing fields deserialize to
/// their defaults so a partially-shaped body never fails to decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub validation_errors: Option<BTreeMap<String, Vec<String>>>,
}
