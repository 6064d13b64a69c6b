#![allow(dead_code)]

use client::{ApiClient, BlogClient, SessionStore};
use mock_api::{AppState, MockApiConfig};
use tokio::net::TcpListener;

pub use mock_api::fixtures::FIXTURE_PASSWORD;

pub const JOHN: &str = "john@example.com";
pub const JANE: &str = "jane@example.com";
pub const ALEX: &str = "alex@example.com";

/// Mock backend on an ephemeral port
pub struct TestServer {
    pub base_url: String,
    pub state: AppState,
}

impl TestServer {
    pub async fn spawn() -> anyhow::Result<Self> {
        let state = AppState::new(&MockApiConfig::default())?;
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}/api/v1", listener.local_addr()?);

        tokio::spawn(mock_api::serve(listener, state.clone()));
        Ok(Self { base_url, state })
    }

    pub fn client(&self) -> BlogClient {
        self.client_with(SessionStore::in_memory())
    }

    pub fn client_with(&self, session: SessionStore) -> BlogClient {
        BlogClient::new(ApiClient::new(&self.base_url, session).expect("client builds"))
    }

    /// Client already logged in as `email`
    pub async fn logged_in(&self, email: &str) -> BlogClient {
        let client = self.client();
        client
            .auth
            .login(email, FIXTURE_PASSWORD)
            .await
            .expect("fixture login succeeds");
        client
    }
}
