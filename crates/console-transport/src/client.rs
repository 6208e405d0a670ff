//! Authenticated API client with single-flight credential refresh.
//!
//! Every request attaches the current bearer credential. A 401 response
//! triggers one refresh-and-retry cycle; requests that observe a 401 while
//! a refresh is already in flight queue behind it instead of starting
//! their own. The queue is drained exactly once when the refresh settles,
//! uniformly resolved or uniformly rejected, in join order.

use crate::error::{ApiError, ApiResult, NormalizedError};
use crate::events::{ClientEvent, EventChannel};
use crate::transport::{HttpTransport, TransportError, TransportRequest, TransportResponse};
use console_types::ErrorBody;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tokio::sync::{oneshot, RwLock};
use tracing::{debug, info, warn};

pub const LOGIN_PATH: &str = "/auth/login";
pub const REFRESH_PATH: &str = "/auth/refresh";
pub const LOGOUT_PATH: &str = "/auth/logout";
pub const IDENTITY_PATH: &str = "/auth/me";

const FALLBACK_ERROR_MESSAGE: &str = "Unknown error";

type RefreshWaiter = oneshot::Sender<ApiResult<String>>;

/// The single-flight latch. `InFlight` holds the continuations of every
/// request suspended behind the ongoing refresh, in join order.
enum RefreshGate {
    Idle,
    InFlight { waiters: Vec<RefreshWaiter> },
}

/// Authenticated client for the console REST API.
///
/// Owns the process-wide credential and refresh state explicitly, so tests
/// can run isolated instances side by side.
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    bearer: RwLock<Option<String>>,
    refresh: Mutex<RefreshGate>,
    events: EventChannel,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            bearer: RwLock::new(None),
            refresh: Mutex::new(RefreshGate::Idle),
            events: EventChannel::new(),
        }
    }

    /// The event channel fed by this client (logout, notifications).
    pub fn events(&self) -> &EventChannel {
        &self.events
    }

    /// Install the default bearer credential for all future requests.
    pub async fn set_bearer(&self, token: impl Into<String>) {
        *self.bearer.write().await = Some(token.into());
    }

    /// Drop the default bearer credential.
    pub async fn clear_bearer(&self) {
        *self.bearer.write().await = None;
    }

    /// The currently installed bearer credential, if any.
    pub async fn bearer(&self) -> Option<String> {
        self.bearer.read().await.clone()
    }

    pub async fn get(&self, path: &str, query: &[(String, String)]) -> ApiResult<Value> {
        self.request(Method::GET, path, query, None).await
    }

    pub async fn post(&self, path: &str, body: Option<Value>) -> ApiResult<Value> {
        self.request(Method::POST, path, &[], body).await
    }

    pub async fn put(&self, path: &str, body: Option<Value>) -> ApiResult<Value> {
        self.request(Method::PUT, path, &[], body).await
    }

    pub async fn delete(&self, path: &str) -> ApiResult<Value> {
        self.request(Method::DELETE, path, &[], None).await
    }

    /// Issue a request with the current credential attached, recovering
    /// from credential expiry at most once.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> ApiResult<Value> {
        let bearer = self.bearer().await;
        let response = match self
            .send(method.clone(), path, query, body.clone(), bearer)
            .await
        {
            Ok(response) => response,
            Err(err) => return Err(self.normalize_failure(err)),
        };

        if response.status.is_success() {
            return Ok(response.body);
        }

        if response.status == StatusCode::UNAUTHORIZED {
            // 401 on the refresh or login endpoint must never start a
            // nested refresh.
            if is_auth_path(path) {
                debug!(path, "401 on auth endpoint, failing without refresh");
                return Err(ApiError::Auth(error_details(
                    &response,
                    "Authentication failed",
                )));
            }
            return self.refresh_and_retry(method, path, query, body).await;
        }

        Err(self.normalize_response(&response))
    }

    /// Refresh the credential (joining an in-flight refresh if there is
    /// one) and retry the original request exactly once.
    async fn refresh_and_retry(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> ApiResult<Value> {
        let token = self.refresh_credential().await?;

        let response = match self.send(method, path, query, body, Some(token)).await {
            Ok(response) => response,
            Err(err) => return Err(self.normalize_failure(err)),
        };

        if response.status.is_success() {
            return Ok(response.body);
        }

        if response.status == StatusCode::UNAUTHORIZED {
            // Second 401 in a row: the fresh credential was rejected too.
            warn!(path, "request rejected again after refresh");
            return Err(ApiError::Auth(error_details(
                &response,
                "Authentication failed",
            )));
        }

        Err(self.normalize_response(&response))
    }

    /// Single-flight refresh protocol.
    ///
    /// The first caller becomes the leader and issues the refresh call;
    /// everyone else queues a continuation and suspends. The leader
    /// installs the new credential before draining the queue, so no
    /// queued request ever retries with a stale token. The latch is
    /// released on every exit path, including the leader's future being
    /// dropped mid-refresh.
    async fn refresh_credential(&self) -> ApiResult<String> {
        let waiter = {
            let mut gate = self.refresh.lock().expect("refresh gate poisoned");
            match &mut *gate {
                RefreshGate::InFlight { waiters } => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    Some(rx)
                }
                RefreshGate::Idle => {
                    *gate = RefreshGate::InFlight {
                        waiters: Vec::new(),
                    };
                    None
                }
            }
        };

        if let Some(rx) = waiter {
            debug!("refresh already in flight, queueing request");
            return match rx.await {
                Ok(outcome) => outcome,
                // The latch guard vanished without sending a verdict.
                Err(_) => Err(abandoned_error()),
            };
        }

        // If the leader is cancelled while the refresh call is in flight
        // (caller timeout, task abort), the guard reopens the latch and
        // rejects everyone queued behind it, so the next 401 can start a
        // fresh cycle instead of joining a queue nobody will drain.
        let guard = RefreshAbortGuard { client: self };
        let result = self.run_refresh().await;
        std::mem::forget(guard);

        let waiters = self.drain_waiters();

        match &result {
            Ok(token) => {
                info!(queued = waiters.len(), "credential refreshed");
                *self.bearer.write().await = Some(token.clone());
                for waiter in waiters {
                    let _ = waiter.send(Ok(token.clone()));
                }
            }
            Err(err) => {
                warn!(queued = waiters.len(), error = %err, "credential refresh failed, logging out");
                *self.bearer.write().await = None;
                for waiter in waiters {
                    let _ = waiter.send(Err(err.clone()));
                }
                self.events.emit(ClientEvent::LoggedOut);
            }
        }

        result
    }

    /// Take every queued continuation and reset the latch to idle.
    fn drain_waiters(&self) -> Vec<RefreshWaiter> {
        let mut gate = self.refresh.lock().expect("refresh gate poisoned");
        match std::mem::replace(&mut *gate, RefreshGate::Idle) {
            RefreshGate::InFlight { waiters } => waiters,
            RefreshGate::Idle => Vec::new(),
        }
    }

    /// The actual refresh call, issued directly on the transport so it can
    /// never re-enter the 401 interception above.
    async fn run_refresh(&self) -> ApiResult<String> {
        let request = TransportRequest {
            method: Method::POST,
            path: REFRESH_PATH.to_string(),
            query: Vec::new(),
            body: None,
            bearer: self.bearer().await,
        };

        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                return Err(ApiError::Auth(NormalizedError::from_message(err.message)));
            }
        };

        if !response.status.is_success() {
            return Err(ApiError::Auth(error_details(
                &response,
                "Session refresh failed",
            )));
        }

        response
            .body
            .get("accessToken")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| {
                ApiError::Auth(NormalizedError::from_message(
                    "Refresh response missing accessToken",
                ))
            })
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
        bearer: Option<String>,
    ) -> Result<TransportResponse, TransportError> {
        self.transport
            .execute(TransportRequest {
                method,
                path: path.to_string(),
                query: query.to_vec(),
                body,
                bearer,
            })
            .await
    }

    /// Normalize a non-2xx, non-401 response and fire the one transport-
    /// level notification callers must not duplicate.
    fn normalize_response(&self, response: &TransportResponse) -> ApiError {
        let details = error_details(response, FALLBACK_ERROR_MESSAGE);

        if response.status == StatusCode::BAD_REQUEST
            && details.error_code.is_some()
            && details.validation_errors.is_some()
        {
            let notice = details
                .first_validation_message()
                .unwrap_or(&details.message)
                .to_string();
            self.events.emit(ClientEvent::Notification { message: notice });
            return ApiError::Validation(details);
        }

        self.events.emit(ClientEvent::Notification {
            message: details.message.clone(),
        });
        ApiError::Server(details)
    }

    fn normalize_failure(&self, err: TransportError) -> ApiError {
        warn!(error = %err, "request failed before a response arrived");
        let details = NormalizedError::from_message(err.message);
        self.events.emit(ClientEvent::Notification {
            message: details.message.clone(),
        });
        ApiError::Network(details)
    }
}

/// Releases the refresh latch if the leading future is dropped before the
/// refresh settles. Forgotten on the normal path, where the leader drains
/// the queue itself.
struct RefreshAbortGuard<'a> {
    client: &'a ApiClient,
}

impl Drop for RefreshAbortGuard<'_> {
    fn drop(&mut self) {
        let waiters = self.client.drain_waiters();
        if !waiters.is_empty() {
            warn!(
                queued = waiters.len(),
                "refresh leader dropped mid-flight, rejecting queued requests"
            );
        }
        let err = abandoned_error();
        for waiter in waiters {
            let _ = waiter.send(Err(err.clone()));
        }
    }
}

fn abandoned_error() -> ApiError {
    ApiError::Auth(NormalizedError::from_message(
        "Credential refresh abandoned",
    ))
}

fn is_auth_path(path: &str) -> bool {
    path.contains(REFRESH_PATH) || path.contains(LOGIN_PATH)
}

/// Shape whatever error body the server returned into the canonical form.
fn error_details(response: &TransportResponse, fallback: &str) -> NormalizedError {
    let body: ErrorBody = serde_json::from_value(response.body.clone()).unwrap_or_default();
    NormalizedError {
        message: body.message.unwrap_or_else(|| fallback.to_string()),
        error_code: body.error_code,
        validation_errors: body.validation_errors,
    }
}
