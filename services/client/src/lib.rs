//! Typed client for the blog REST API
//!
//! [`BlogClient`] bundles the auth service and the resource services over
//! one shared [`ApiClient`], so they all see the same session.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod services;
pub mod session;
pub mod storage;

pub use api::ApiClient;
pub use auth::{AuthService, AuthState};
pub use crate::config::ClientConfig;
pub use error::{ApiError, ApiResult, ErrorKind};
pub use session::{SessionContext, SessionSnapshot};
pub use storage::SessionStore;

use services::{CategoryService, CommentService, PostService, TagService};

/// Every service over one request client
#[derive(Clone)]
pub struct BlogClient {
    pub auth: AuthService,
    pub posts: PostService,
    pub categories: CategoryService,
    pub tags: TagService,
    pub comments: CommentService,
}

impl BlogClient {
    pub fn new(api: ApiClient) -> Self {
        Self {
            auth: AuthService::new(api.clone()),
            posts: PostService::new(api.clone()),
            categories: CategoryService::new(api.clone()),
            tags: TagService::new(api.clone()),
            comments: CommentService::new(api),
        }
    }

    pub fn from_config(config: &ClientConfig, session: SessionStore) -> ApiResult<Self> {
        Ok(Self::new(ApiClient::from_config(config, session)?))
    }

    /// A fresh, still-loading session context over this client's auth
    pub fn session_context(&self) -> SessionContext {
        SessionContext::new(self.auth.clone())
    }
}
