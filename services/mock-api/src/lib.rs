//! In-memory mock of the blog REST API
//!
//! Serves the sample fixtures under `/api/v1` with JWT bearer authentication,
//! for offline development and as the backend of the client's integration
//! tests.

pub mod config;
pub mod error;
pub mod fixtures;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod routes;
pub mod state;
pub mod store;

pub use config::MockApiConfig;
pub use routes::create_router;
pub use state::AppState;

use tokio::net::TcpListener;
use tracing::info;

/// Serve the mock API on an already bound listener until the task is dropped
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    info!("Mock API listening on {}", listener.local_addr()?);
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}
