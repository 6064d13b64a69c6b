//! Authentication service
//!
//! Drives the session through `Anonymous -> Authenticating -> Authenticated`
//! and, via the request client, `Authenticated -> Refreshing`. The refresh
//! either returns to `Authenticated` or ends the session in `Anonymous`.

use common::{
    models::{LoginRequest, RegisterRequest, TokenResponse, User},
    validation::validate_registration,
};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    api::ApiClient,
    error::{ApiError, ApiResult},
};

/// Authentication lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticating,
    Authenticated,
    Refreshing,
}

/// Login, registration and token lifecycle
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn state(&self) -> AuthState {
        self.api.auth_state()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.api.subscribe()
    }

    /// Log in, persist the token pair and cache the profile
    ///
    /// On any failure the partially written session is discarded.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<User> {
        info!("Logging in {}", email);
        self.api.set_auth_state(AuthState::Authenticating);

        match self.start_session(email, password).await {
            Ok(user) => {
                self.api.set_auth_state(AuthState::Authenticated);
                info!("Logged in as {}", user.username);
                Ok(user)
            }
            Err(e) => {
                warn!("Login failed for {}: {}", email, e);
                self.api.clear_session();
                Err(e)
            }
        }
    }

    async fn start_session(&self, email: &str, password: &str) -> ApiResult<User> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let tokens: TokenResponse = self
            .api
            .post_public("/auth/login", &request, "Login failed")
            .await?;
        self.api.session().save_tokens(&tokens)?;

        self.get_current_user().await
    }

    /// Create an account, then log in with the same credentials
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<User> {
        validate_registration(request)?;
        self.api.set_auth_state(AuthState::Authenticating);

        let user: User = match self
            .api
            .post_public("/users", request, "Registration failed")
            .await
        {
            Ok(user) => user,
            Err(e) => {
                warn!("Registration failed for {}: {}", request.email, e);
                self.api.clear_session();
                return Err(e);
            }
        };
        info!("Registered {}", user.username);

        self.login(&request.email, &request.password).await?;
        Ok(user)
    }

    /// Fetch and cache the profile of the stored session
    pub async fn get_current_user(&self) -> ApiResult<User> {
        if self.api.session().access_token().is_none() {
            return Err(ApiError::NotAuthenticated("No access token found"));
        }

        let user: User = self.api.get("/auth/me").await?;
        self.api.session().save_user(&user)?;
        Ok(user)
    }

    /// Exchange the stored refresh token for a new pair
    pub async fn refresh_token(&self) -> ApiResult<()> {
        self.api.refresh_tokens().await
    }

    /// Forget the session locally; no request is made
    pub fn logout(&self) {
        info!("Logging out");
        self.api.clear_session();
    }

    pub fn is_authenticated(&self) -> bool {
        self.api.session().is_authenticated()
    }

    /// Profile cached by the last successful login or profile fetch
    pub fn stored_user(&self) -> Option<User> {
        self.api.session().user()
    }
}
