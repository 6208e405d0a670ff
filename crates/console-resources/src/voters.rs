//! CRUD service for voter records.

use crate::decode;
use console_transport::{ApiClient, ApiError, ApiResult, NormalizedError};
use console_types::{normalize, Page, Voter, VoterDraft, VoterFilters};
use std::sync::Arc;

const VOTERS_PATH: &str = "/voters";

/// Voter registry endpoints.
#[derive(Clone)]
pub struct VotersService {
    client: Arc<ApiClient>,
}

impl VotersService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Paginated voter listing, normalized like every listing endpoint.
    pub async fn list(&self, filters: &VoterFilters) -> ApiResult<Page<Voter>> {
        let body = self.client.get(VOTERS_PATH, &filters.to_query()).await?;
        Ok(normalize::paginated(&body))
    }

    pub async fn create(&self, draft: &VoterDraft) -> ApiResult<Voter> {
        let payload = to_body(draft)?;
        let body = self.client.post(VOTERS_PATH, Some(payload)).await?;
        decode(body, "voter")
    }

    pub async fn update(&self, id: i64, draft: &VoterDraft) -> ApiResult<Voter> {
        let payload = to_body(draft)?;
        let body = self
            .client
            .put(&format!("{}/{}", VOTERS_PATH, id), Some(payload))
            .await?;
        decode(body, "voter")
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.client
            .delete(&format!("{}/{}", VOTERS_PATH, id))
            .await?;
        Ok(())
    }
}

fn to_body(draft: &VoterDraft) -> ApiResult<serde_json::Value> {
    serde_json::to_value(draft)
        .map_err(|_| ApiError::Server(NormalizedError::from_message("Unencodable voter draft")))
}
