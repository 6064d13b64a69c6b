mod support;

use client::{SessionStore, storage::ACCESS_TOKEN_KEY};
use common::models::TokenResponse;
use support::{FIXTURE_PASSWORD, JOHN, TestServer};

#[tokio::test]
async fn test_bootstrap_restores_stored_session() {
    let server = TestServer::spawn().await.unwrap();
    let session = SessionStore::in_memory();
    server
        .client_with(session.clone())
        .auth
        .login(JOHN, FIXTURE_PASSWORD)
        .await
        .unwrap();

    let context = server.client_with(session).session_context();
    assert!(context.is_loading());

    context.initialize().await;
    assert!(!context.is_loading());
    assert!(context.is_authenticated());
    assert_eq!(context.user().unwrap().username, "johndoe");
}

#[tokio::test]
async fn test_bootstrap_with_invalid_token_becomes_anonymous() {
    let server = TestServer::spawn().await.unwrap();
    let session = SessionStore::in_memory();
    session
        .save_tokens(&TokenResponse {
            access_token: "garbage".to_string(),
            refresh_token: "also-garbage".to_string(),
            token_type: "bearer".to_string(),
        })
        .unwrap();

    let context = server.client_with(session.clone()).session_context();
    assert!(context.is_loading());
    assert!(!context.is_authenticated());

    context.initialize().await;

    let snapshot = context.snapshot();
    assert!(!snapshot.is_loading);
    assert_eq!(snapshot.user, None);
    assert_eq!(session.get(ACCESS_TOKEN_KEY), None);
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_failed_login_records_error() {
    let server = TestServer::spawn().await.unwrap();
    let context = server.client().session_context();
    context.initialize().await;

    let mut updates = context.subscribe();
    assert!(context.login(JOHN, "wrong").await.is_err());

    assert!(updates.has_changed().unwrap());
    let snapshot = updates.borrow_and_update().clone();
    assert!(!snapshot.is_loading);
    assert_eq!(
        snapshot.error.as_deref(),
        Some("Incorrect email or password")
    );
    assert!(!context.is_authenticated());
}

#[tokio::test]
async fn test_login_then_logout() {
    let server = TestServer::spawn().await.unwrap();
    let context = server.client().session_context();
    context.initialize().await;

    let user = context.login(JOHN, FIXTURE_PASSWORD).await.unwrap();
    assert_eq!(context.user(), Some(user));
    assert_eq!(context.error(), None);

    context.logout();
    assert!(!context.is_authenticated());
    assert!(!context.auth().is_authenticated());
}
