//! CRUD service for operator accounts.

use crate::decode;
use console_transport::{ApiClient, ApiError, ApiResult, NormalizedError};
use console_types::{normalize, Page, User, UserDraft, UserFilters};
use std::sync::Arc;

const USERS_PATH: &str = "/users";

/// User management endpoints.
#[derive(Clone)]
pub struct UsersService {
    client: Arc<ApiClient>,
}

impl UsersService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Paginated user listing. The response is normalized, so even a
    /// degenerate payload yields an empty first page rather than an error.
    pub async fn list(&self, filters: &UserFilters) -> ApiResult<Page<User>> {
        let body = self.client.get(USERS_PATH, &filters.to_query()).await?;
        Ok(normalize::paginated(&body))
    }

    /// Fetch one user as an editable draft, falling back to safe defaults
    /// for any missing field.
    pub async fn get(&self, id: i64) -> ApiResult<UserDraft> {
        let body = self
            .client
            .get(&format!("{}/{}", USERS_PATH, id), &[])
            .await?;
        Ok(normalize::item(&body, UserDraft::default()))
    }

    pub async fn create(&self, draft: &UserDraft) -> ApiResult<User> {
        let payload = to_body(draft)?;
        let body = self.client.post(USERS_PATH, Some(payload)).await?;
        decode(body, "user")
    }

    pub async fn update(&self, id: i64, draft: &UserDraft) -> ApiResult<User> {
        let payload = to_body(draft)?;
        let body = self
            .client
            .put(&format!("{}/{}", USERS_PATH, id), Some(payload))
            .await?;
        decode(body, "user")
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.client
            .delete(&format!("{}/{}", USERS_PATH, id))
            .await?;
        Ok(())
    }
}

fn to_body(draft: &UserDraft) -> ApiResult<serde_json::Value> {
    serde_json::to_value(draft)
        .map_err(|_| ApiError::Server(NormalizedError::from_message("Unencodable user draft")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::RecordingServer;
    use console_types::Role;
    use serde_json::json;

    #[tokio::test]
    async fn list_sends_filters_and_normalizes_response() {
        let server = Arc::new(RecordingServer::ok(json!({
            "items": null,
            "totalCount": "5",
        })));
        let service = UsersService::new(server.client());

        let filters = UserFilters {
            page: 2,
            page_size: 20,
            search: Some("ami".to_string()),
            role: Some(Role::Admin),
        };
        let page = service.list(&filters).await.unwrap();

        // Degenerate payload still yields the empty first page.
        assert_eq!(page, Page::empty());

        let request = server.last_request();
        assert_eq!(request.path, "/users");
        assert!(request
            .query
            .contains(&("pageSize".to_string(), "20".to_string())));
        assert!(request
            .query
            .contains(&("role".to_string(), "admin".to_string())));
    }

    #[tokio::test]
    async fn get_merges_over_safe_defaults() {
        let server = Arc::new(RecordingServer::ok(json!({ "username": "clerk01" })));
        let service = UsersService::new(server.client());

        let draft = service.get(3).await.unwrap();

        assert_eq!(server.last_request().path, "/users/3");
        assert_eq!(draft.username, "clerk01");
        assert_eq!(draft.role, Role::User);
    }

    #[tokio::test]
    async fn create_posts_draft_and_decodes_created_user() {
        let server = Arc::new(RecordingServer::ok(json!({
            "id": 9,
            "username": "clerk02",
            "role": "user",
            "isActive": true,
        })));
        let service = UsersService::new(server.client());

        let draft = UserDraft {
            username: "clerk02".to_string(),
            password: Some("secret1".to_string()),
            role: Role::User,
        };
        let created = service.create(&draft).await.unwrap();

        assert_eq!(created.id, 9);
        let request = server.last_request();
        assert_eq!(request.method, reqwest::Method::POST);
        assert_eq!(
            request.body.unwrap().get("username").unwrap(),
            &json!("clerk02")
        );
    }

    #[tokio::test]
    async fn delete_targets_entity_path() {
        let server = Arc::new(RecordingServer::ok(serde_json::Value::Null));
        let service = UsersService::new(server.client());

        service.delete(7).await.unwrap();

        let request = server.last_request();
        assert_eq!(request.method, reqwest::Method::DELETE);
        assert_eq!(request.path, "/users/7");
    }

    #[tokio::test]
    async fn malformed_create_response_is_a_normalized_error() {
        let server = Arc::new(RecordingServer::ok(json!({ "unexpected": true })));
        let service = UsersService::new(server.client());

        let draft = UserDraft::default();
        let err = service.create(&draft).await.unwrap_err();

        assert_eq!(err.details().message, "Malformed user response");
    }
}
