//! Client behaviour against hand-written backends that the mock API cannot
//! be coaxed into imitating

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use client::{ApiClient, ApiError, AuthState, BlogClient, SessionStore};
use common::models::{RegisterRequest, TokenResponse};
use serde_json::json;
use tokio::{net::TcpListener, sync::Notify};

async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/api/v1", listener.local_addr().unwrap());
    tokio::spawn(async move { axum::serve(listener, router).await });
    base_url
}

fn unauthorized() -> impl IntoResponse {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "detail": "Could not validate credentials" })),
    )
}

async fn issue_tokens(State(refreshes): State<Arc<AtomicUsize>>) -> impl IntoResponse {
    let n = refreshes.fetch_add(1, Ordering::SeqCst) + 1;
    Json(json!({
        "access_token": format!("access-{n}"),
        "refresh_token": format!("refresh-{n}"),
        "token_type": "bearer",
    }))
}

#[tokio::test]
async fn test_unauthorized_after_refresh_ends_session() {
    let refreshes = Arc::new(AtomicUsize::new(0));
    let router = Router::new()
        .route("/api/v1/auth/me", get(|| async { unauthorized() }))
        .route("/api/v1/auth/refresh", post(issue_tokens))
        .with_state(refreshes.clone());
    let base_url = spawn(router).await;

    let session = SessionStore::in_memory();
    session
        .save_tokens(&TokenResponse {
            access_token: "access-0".to_string(),
            refresh_token: "refresh-0".to_string(),
            token_type: "bearer".to_string(),
        })
        .unwrap();
    let client = BlogClient::new(ApiClient::new(&base_url, session.clone()).unwrap());

    let error = client.auth.get_current_user().await.unwrap_err();

    assert!(matches!(error, ApiError::SessionExpired));
    assert_eq!(refreshes.load(Ordering::SeqCst), 1);
    assert_eq!(session.access_token(), None);
    assert_eq!(session.refresh_token(), None);
    assert_eq!(client.auth.state(), AuthState::Anonymous);
}

/// Holds `POST /users` open until the test releases it
#[derive(Clone, Default)]
struct Gate {
    arrived: Arc<Notify>,
    release: Arc<Notify>,
}

async fn held_registration(State(gate): State<Gate>) -> impl IntoResponse {
    gate.arrived.notify_one();
    gate.release.notified().await;
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "detail": "Email already registered" })),
    )
}

#[tokio::test]
async fn test_registration_in_flight_is_authenticating() {
    let gate = Gate::default();
    let router = Router::new()
        .route("/api/v1/users", post(held_registration))
        .with_state(gate.clone());
    let base_url = spawn(router).await;
    let client = BlogClient::new(ApiClient::new(&base_url, SessionStore::in_memory()).unwrap());
    assert_eq!(client.auth.state(), AuthState::Anonymous);

    let auth = client.auth.clone();
    let pending = tokio::spawn(async move {
        auth.register(&RegisterRequest {
            email: "taken@example.com".to_string(),
            username: "taken".to_string(),
            full_name: None,
            password: "secret123".to_string(),
        })
        .await
    });

    gate.arrived.notified().await;
    assert_eq!(client.auth.state(), AuthState::Authenticating);

    gate.release.notify_one();
    let error = pending.await.unwrap().unwrap_err();
    assert_eq!(error.to_string(), "Email already registered");
    assert_eq!(client.auth.state(), AuthState::Anonymous);
    assert!(!client.auth.is_authenticated());
}
