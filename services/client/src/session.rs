//! Session context observed by the presentation layer
//!
//! Holds the current user, a loading flag and the last error. Readers get
//! clones or a watch receiver; mutation goes through [`SessionContext::login`],
//! [`SessionContext::register`] and [`SessionContext::logout`].

use std::sync::Arc;

use common::models::{RegisterRequest, User};
use tokio::sync::watch;
use tracing::{error, info};

use crate::{auth::AuthService, error::ApiResult};

/// Point-in-time view of the session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct SessionContext {
    auth: AuthService,
    state: Arc<watch::Sender<SessionSnapshot>>,
}

impl SessionContext {
    /// Create a context in the loading state; call [`SessionContext::initialize`]
    /// to resolve it
    pub fn new(auth: AuthService) -> Self {
        let (state, _) = watch::channel(SessionSnapshot {
            user: None,
            is_loading: true,
            error: None,
        });

        Self {
            auth,
            state: Arc::new(state),
        }
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    /// Restore the stored session, if any
    ///
    /// A stored token that no longer yields a profile is discarded.
    pub async fn initialize(&self) {
        let user = if self.auth.is_authenticated() {
            match self.auth.get_current_user().await {
                Ok(user) => {
                    info!("Restored session for {}", user.username);
                    Some(user)
                }
                Err(e) => {
                    error!("Failed to restore session: {}", e);
                    self.auth.logout();
                    None
                }
            }
        } else {
            None
        };

        self.state.send_modify(|state| {
            state.user = user;
            state.is_loading = false;
        });
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().user.is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<User> {
        self.begin();
        let result = self.auth.login(email, password).await;
        self.finish(&result);
        result
    }

    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<User> {
        self.begin();
        let result = self.auth.register(request).await;
        self.finish(&result);
        result
    }

    pub fn logout(&self) {
        self.auth.logout();
        self.state.send_modify(|state| {
            state.user = None;
            state.error = None;
        });
    }

    fn begin(&self) {
        self.state.send_modify(|state| {
            state.is_loading = true;
            state.error = None;
        });
    }

    fn finish(&self, result: &ApiResult<User>) {
        self.state.send_modify(|state| {
            match result {
                Ok(user) => state.user = Some(user.clone()),
                Err(e) => {
                    state.user = None;
                    state.error = Some(e.to_string());
                }
            }
            state.is_loading = false;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{api::ApiClient, storage::SessionStore};

    fn context() -> SessionContext {
        let api = ApiClient::new("http://127.0.0.1:9", SessionStore::in_memory()).unwrap();
        SessionContext::new(AuthService::new(api))
    }

    #[test]
    fn test_starts_loading() {
        let context = context();
        assert!(context.is_loading());
        assert!(!context.is_authenticated());
        assert_eq!(context.error(), None);
    }

    #[tokio::test]
    async fn test_initialize_without_token_is_anonymous() {
        let context = context();
        let mut updates = context.subscribe();

        context.initialize().await;

        assert!(updates.has_changed().unwrap());
        let snapshot = updates.borrow_and_update().clone();
        assert!(!snapshot.is_loading);
        assert_eq!(snapshot.user, None);
    }

    #[tokio::test]
    async fn test_failed_registration_records_error() {
        let context = context();
        let request = RegisterRequest {
            email: "a@b.com".to_string(),
            username: "bad name".to_string(),
            full_name: None,
            password: "x".to_string(),
        };

        assert!(context.register(&request).await.is_err());
        assert!(!context.is_loading());
        assert!(context.error().is_some());
    }
}
