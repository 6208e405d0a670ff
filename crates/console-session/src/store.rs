//! Session store backed by the authenticated API client.

use console_transport::{
    ApiClient, ApiError, ApiResult, ClientEvent, NormalizedError, IDENTITY_PATH, LOGIN_PATH,
    LOGOUT_PATH,
};
use console_types::User;
use serde::Deserialize;
use serde_json::json;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

/// Point-in-time view of the session, cheap to clone.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    /// True until the startup identity check has settled.
    pub loading: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginGrant {
    access_token: String,
    user: User,
}

/// Single source of truth for the current user.
///
/// The store holds no credential itself; the bearer token lives on the
/// `ApiClient` and the invariant is that `user` is present exactly when a
/// bearer is installed, to the client's best knowledge.
pub struct SessionStore {
    client: Arc<ApiClient>,
    state: RwLock<SessionSnapshot>,
}

impl SessionStore {
    /// Create the store and subscribe it to the client's event channel
    /// for its lifetime. A `LoggedOut` event (emitted when a refresh
    /// fails) clears the user without any call from the transport layer.
    pub fn start(client: Arc<ApiClient>) -> Arc<Self> {
        let store = Arc::new(Self {
            client: client.clone(),
            state: RwLock::new(SessionSnapshot {
                user: None,
                loading: true,
            }),
        });

        let mut events = client.events().subscribe();
        let weak = Arc::downgrade(&store);
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(ClientEvent::LoggedOut) => {
                        let Some(store) = weak.upgrade() else { break };
                        debug!("logout event received, clearing session");
                        store.clear_user();
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "session store lagged behind client events");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        store
    }

    /// Startup identity check.
    ///
    /// On success the user is populated; on failure both the user and the
    /// stored credential are cleared. The loading flag settles either way.
    pub async fn initialize(&self) {
        match self.client.get(IDENTITY_PATH, &[]).await {
            Ok(body) => match serde_json::from_value::<User>(body) {
                Ok(user) => {
                    info!(user_id = user.id, "session restored from identity check");
                    self.set_user(user);
                }
                Err(err) => {
                    warn!(error = %err, "identity response was malformed");
                    self.clear_user();
                    self.client.clear_bearer().await;
                }
            },
            Err(err) => {
                debug!(error = %err, "identity check failed, starting logged out");
                self.clear_user();
                self.client.clear_bearer().await;
            }
        }

        self.state.write().expect("session state poisoned").loading = false;
    }

    /// Exchange credentials for a bearer token and identity.
    ///
    /// Failures propagate untouched; the caller decides how to surface
    /// them (the transport has already skipped notification for 401s).
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<()> {
        let body = json!({ "username": username, "password": password });
        let response = self.client.post(LOGIN_PATH, Some(body)).await?;

        let grant: LoginGrant = serde_json::from_value(response).map_err(|err| {
            warn!(error = %err, "login response was malformed");
            ApiError::Server(NormalizedError::from_message("Malformed login response"))
        })?;

        self.client.set_bearer(grant.access_token).await;
        info!(user_id = grant.user.id, "login succeeded");
        self.set_user(grant.user);
        Ok(())
    }

    /// Invalidate the server-side session, best effort, then clear local
    /// state regardless of the endpoint outcome.
    pub async fn logout(&self) {
        if let Err(err) = self.client.post(LOGOUT_PATH, None).await {
            debug!(error = %err, "logout endpoint failed, clearing local session anyway");
        }
        self.clear_user();
        self.client.clear_bearer().await;
        info!("logged out");
    }

    /// Current session state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.read().expect("session state poisoned").clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.snapshot().user
    }

    pub fn is_loading(&self) -> bool {
        self.snapshot().loading
    }

    fn set_user(&self, user: User) {
        let mut state = self.state.write().expect("session state poisoned");
        state.user = Some(user);
        state.loading = false;
    }

    fn clear_user(&self) {
        self.state.write().expect("session state poisoned").user = None;
    }
}
