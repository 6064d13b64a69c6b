use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mock_api::{AppState, MockApiConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting mock API service");

    let config = MockApiConfig::from_env()?;
    let state = AppState::new(&config)?;

    let listener = TcpListener::bind(config.bind_addr).await?;
    mock_api::serve(listener, state).await
}
