//! Application state shared across handlers

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use crate::{config::MockApiConfig, fixtures, jwt::JwtService, store::BlogStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<BlogStore>>,
    pub jwt_service: JwtService,
    refresh_requests: Arc<AtomicU64>,
}

impl AppState {
    /// Build state seeded with the sample fixtures
    pub fn new(config: &MockApiConfig) -> anyhow::Result<Self> {
        Ok(Self::with_store(config, fixtures::seeded_store()?))
    }

    /// Build state around an existing store
    pub fn with_store(config: &MockApiConfig, store: BlogStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            jwt_service: JwtService::new(config.jwt.clone()),
            refresh_requests: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Make every access token issued so far fail validation
    pub fn expire_access_tokens(&self) {
        self.jwt_service.expire_access_tokens();
    }

    /// End every session: access and refresh tokens stop validating
    pub fn revoke_sessions(&self) {
        self.jwt_service.expire_access_tokens();
        self.jwt_service.revoke_refresh_tokens();
    }

    /// Number of `POST /auth/refresh` calls received
    pub fn refresh_requests(&self) -> u64 {
        self.refresh_requests.load(Ordering::SeqCst)
    }

    pub(crate) fn record_refresh_request(&self) {
        self.refresh_requests.fetch_add(1, Ordering::SeqCst);
    }
}
