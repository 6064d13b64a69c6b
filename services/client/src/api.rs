//! Request client for the blog REST API
//!
//! Every authenticated call attaches the stored access token. A `401`
//! triggers one token refresh followed by one retry of the original
//! request. Refreshes are serialized behind a single lock so that
//! concurrent `401`s produce exactly one `POST /auth/refresh`.

use std::{sync::Arc, time::Duration};

use common::models::{RefreshTokenRequest, TokenResponse};
use reqwest::{Method, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info, warn};

use crate::{
    auth::AuthState,
    config::ClientConfig,
    error::{ApiError, ApiResult},
    storage::SessionStore,
};

const GENERIC_ERROR: &str = "Request failed";
const REFRESH_ENDPOINT: &str = "/auth/refresh";

/// HTTP client bound to one API root and one session
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
    refresh_gate: Arc<Mutex<()>>,
    auth_state: Arc<watch::Sender<AuthState>>,
}

impl ApiClient {
    /// Create a client without a request timeout
    pub fn new(base_url: &str, session: SessionStore) -> ApiResult<Self> {
        Self::with_timeout(base_url, session, None)
    }

    pub fn with_timeout(
        base_url: &str,
        session: SessionStore,
        timeout: Option<Duration>,
    ) -> ApiResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let initial = if session.is_authenticated() {
            AuthState::Authenticated
        } else {
            AuthState::Anonymous
        };

        let (auth_state, _) = watch::channel(initial);

        Ok(Self {
            http: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            refresh_gate: Arc::new(Mutex::new(())),
            auth_state: Arc::new(auth_state),
        })
    }

    pub fn from_config(config: &ClientConfig, session: SessionStore) -> ApiResult<Self> {
        Self::with_timeout(&config.api_base_url, session, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn auth_state(&self) -> AuthState {
        *self.auth_state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.auth_state.subscribe()
    }

    pub(crate) fn set_auth_state(&self, next: AuthState) {
        self.auth_state.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            debug!("Auth state {:?} -> {:?}", current, next);
            *current = next;
            true
        });
    }

    /// Drop every stored session key and fall back to `Anonymous`
    pub(crate) fn clear_session(&self) {
        if let Err(e) = self.session.clear() {
            error!("Failed to clear session storage: {}", e);
        }
        self.set_auth_state(AuthState::Anonymous);
    }

    fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.send(Method::GET, endpoint, None::<&()>).await
    }

    pub async fn post<B, T>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::POST, endpoint, Some(body)).await
    }

    pub async fn put<B, T>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::PUT, endpoint, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.send(Method::DELETE, endpoint, None::<&()>).await
    }

    /// POST without bearer header or refresh, for login, registration and
    /// refresh itself; `fallback` is the message used when the error body
    /// carries no detail
    pub async fn post_public<B, T>(&self, endpoint: &str, body: &B, fallback: &str) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(Method::POST, endpoint, Some(body), None).await?;
        read_response(response, fallback).await
    }

    async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        token: Option<&str>,
    ) -> ApiResult<Response> {
        debug!("{} {}", method, endpoint);
        let mut request = self.http.request(method, self.url(endpoint));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    async fn send<B, T>(&self, method: Method, endpoint: &str, body: Option<&B>) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let token = self.session.access_token();
        let response = self
            .execute(method.clone(), endpoint, body, token.as_deref())
            .await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return read_response(response, GENERIC_ERROR).await;
        }

        debug!("{} {} was unauthorized, refreshing session", method, endpoint);
        self.refresh_after_unauthorized(token.as_deref()).await?;

        let token = self.session.access_token();
        let response = self.execute(method, endpoint, body, token.as_deref()).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            warn!("Still unauthorized after refresh: {}", endpoint);
            self.clear_session();
            return Err(ApiError::SessionExpired);
        }
        read_response(response, GENERIC_ERROR).await
    }

    /// Refresh unless a concurrent caller already replaced `stale`
    async fn refresh_after_unauthorized(&self, stale: Option<&str>) -> ApiResult<()> {
        let _gate = self.refresh_gate.lock().await;

        match (self.session.access_token(), stale) {
            (Some(current), stale) if Some(current.as_str()) != stale => {
                debug!("Access token already refreshed by another request");
                Ok(())
            }
            // A concurrent refresh failed and ended the session
            (None, Some(_)) => Err(ApiError::SessionExpired),
            _ => self.refresh_locked().await,
        }
    }

    /// Exchange the stored refresh token for a new pair
    ///
    /// Any failure ends the session: a rejected refresh becomes
    /// [`ApiError::SessionExpired`], a transport failure is returned as is.
    pub async fn refresh_tokens(&self) -> ApiResult<()> {
        let _gate = self.refresh_gate.lock().await;
        self.refresh_locked().await
    }

    async fn refresh_locked(&self) -> ApiResult<()> {
        let Some(refresh_token) = self.session.refresh_token() else {
            self.clear_session();
            return Err(ApiError::NotAuthenticated("No refresh token found"));
        };

        info!("Refreshing access token");
        self.set_auth_state(AuthState::Refreshing);
        let result: ApiResult<TokenResponse> = self
            .post_public(
                REFRESH_ENDPOINT,
                &RefreshTokenRequest { refresh_token },
                GENERIC_ERROR,
            )
            .await;

        match result {
            Ok(tokens) => {
                if let Err(e) = self.session.save_tokens(&tokens) {
                    error!("Failed to store refreshed tokens: {}", e);
                    self.clear_session();
                    return Err(e.into());
                }
                self.set_auth_state(AuthState::Authenticated);
                info!("Access token refreshed");
                Ok(())
            }
            Err(ApiError::Transport(e)) => {
                error!("Token refresh failed: {}", e);
                self.clear_session();
                Err(ApiError::Transport(e))
            }
            Err(e) => {
                warn!("Token refresh rejected: {}", e);
                self.clear_session();
                Err(ApiError::SessionExpired)
            }
        }
    }
}

/// Decode a success body into `T`, or turn a failure into
/// [`ApiError::Status`]
///
/// An empty success body is decoded as JSON `null`.
async fn read_response<T: DeserializeOwned>(response: Response, fallback: &str) -> ApiResult<T> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        let message = error_message(&body, fallback);
        debug!("Request failed with {}: {}", status, message);
        return Err(ApiError::Status { status, message });
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_value(Value::Null)?);
    }
    Ok(serde_json::from_slice(&body)?)
}

/// Extract `detail` from an error body
///
/// `detail` is either a string or a list of `{msg}` entries, which are
/// joined.
pub fn error_message(body: &[u8], fallback: &str) -> String {
    let detail = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| value.get("detail").cloned());

    match detail {
        Some(Value::String(message)) if !message.is_empty() => message,
        Some(Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                fallback.to_string()
            } else {
                messages.join(", ")
            }
        }
        _ => fallback.to_string(),
    }
}
