//! Read-only geography lookups that feed cascading selection.

use console_transport::{ApiClient, ApiResult};
use console_types::{normalize, District, Region, VoteCenter};
use std::sync::Arc;

/// Region / district / vote-center lookup endpoints.
///
/// Each call tolerates both the bare-array and enveloped response shapes
/// and degrades to an empty list on anything else, so a flaky lookup
/// never takes down a whole form.
#[derive(Clone)]
pub struct LookupService {
    client: Arc<ApiClient>,
}

impl LookupService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn regions(&self) -> ApiResult<Vec<Region>> {
        let body = self.client.get("/regions", &[]).await?;
        Ok(normalize::lookup(&body))
    }

    pub async fn districts(&self, region_id: i64) -> ApiResult<Vec<District>> {
        let query = [("regionId".to_string(), region_id.to_string())];
        let body = self.client.get("/districts", &query).await?;
        Ok(normalize::lookup(&body))
    }

    pub async fn vote_centers(&self, district_id: i64) -> ApiResult<Vec<VoteCenter>> {
        let query = [("districtId".to_string(), district_id.to_string())];
        // Capitalization matches the server route, which is not kebab-case
        // like the rest of the API.
        let body = self.client.get("/VoteCenters", &query).await?;
        Ok(normalize::lookup(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::RecordingServer;
    use serde_json::json;

    #[tokio::test]
    async fn regions_accepts_bare_array() {
        let server = Arc::new(RecordingServer::ok(json!([
            { "id": 1, "name": "North" },
            { "id": 2, "name": "South" },
        ])));
        let service = LookupService::new(server.client());

        let regions = service.regions().await.unwrap();

        assert_eq!(regions.len(), 2);
        assert_eq!(regions[1].name, "South");
        assert_eq!(server.last_request().path, "/regions");
    }

    #[tokio::test]
    async fn districts_filter_by_region_and_accept_envelope() {
        let server = Arc::new(RecordingServer::ok(json!({
            "items": [{ "id": 14, "name": "Harbor", "regionId": 2 }],
        })));
        let service = LookupService::new(server.client());

        let districts = service.districts(2).await.unwrap();

        assert_eq!(districts.len(), 1);
        assert_eq!(districts[0].region_id, 2);

        let request = server.last_request();
        assert_eq!(request.path, "/districts");
        assert_eq!(
            request.query,
            vec![("regionId".to_string(), "2".to_string())]
        );
    }

    #[tokio::test]
    async fn vote_centers_use_the_capitalized_route() {
        let server = Arc::new(RecordingServer::ok(json!([
            { "id": 7, "name": "School A", "districtId": 14 },
        ])));
        let service = LookupService::new(server.client());

        let centers = service.vote_centers(14).await.unwrap();

        assert_eq!(centers.len(), 1);
        let request = server.last_request();
        assert_eq!(request.path, "/VoteCenters");
        assert_eq!(
            request.query,
            vec![("districtId".to_string(), "14".to_string())]
        );
    }

    #[tokio::test]
    async fn unrecognized_shape_degrades_to_empty() {
        let server = Arc::new(RecordingServer::ok(json!({ "error": "oops" })));
        let service = LookupService::new(server.client());

        let regions = service.regions().await.unwrap();

        assert!(regions.is_empty());
    }
}
