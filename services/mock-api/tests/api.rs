use mock_api::{AppState, MockApiConfig, fixtures::FIXTURE_PASSWORD};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tokio::net::TcpListener;

async fn spawn_server() -> anyhow::Result<(String, AppState)> {
    let state = AppState::new(&MockApiConfig::default())?;
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base = format!("http://{}", listener.local_addr()?);

    tokio::spawn(mock_api::serve(listener, state.clone()));
    Ok((base, state))
}

async fn login(client: &Client, base: &str, email: &str) -> anyhow::Result<Value> {
    let body = client
        .post(format!("{base}/api/v1/auth/login"))
        .json(&json!({ "email": email, "password": FIXTURE_PASSWORD }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(body)
}

#[tokio::test]
async fn test_health_check() {
    let (base, _) = spawn_server().await.unwrap();
    let body: Value = reqwest::get(format!("{base}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let (base, _) = spawn_server().await.unwrap();
    let response = Client::new()
        .post(format!("{base}/api/v1/auth/login"))
        .json(&json!({ "email": "john@example.com", "password": "nope" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Incorrect email or password");
}

#[tokio::test]
async fn test_me_requires_bearer_token() {
    let (base, _) = spawn_server().await.unwrap();
    let client = Client::new();

    let anonymous = client
        .get(format!("{base}/api/v1/auth/me"))
        .send()
        .await
        .unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let tokens = login(&client, &base, "john@example.com").await.unwrap();
    let me: Value = client
        .get(format!("{base}/api/v1/auth/me"))
        .bearer_auth(tokens["access_token"].as_str().unwrap())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["username"], "johndoe");
}

#[tokio::test]
async fn test_refresh_rotates_and_revokes_used_token() {
    let (base, state) = spawn_server().await.unwrap();
    let client = Client::new();
    let tokens = login(&client, &base, "jane@example.com").await.unwrap();
    let refresh = tokens["refresh_token"].as_str().unwrap();

    let first = client
        .post(format!("{base}/api/v1/auth/refresh"))
        .json(&json!({ "refresh_token": refresh }))
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let replay = client
        .post(format!("{base}/api/v1/auth/refresh"))
        .json(&json!({ "refresh_token": refresh }))
        .send()
        .await
        .unwrap();
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(state.refresh_requests(), 2);
}

#[tokio::test]
async fn test_only_author_or_superuser_edits_post() {
    let (base, _) = spawn_server().await.unwrap();
    let client = Client::new();
    let jane = login(&client, &base, "jane@example.com").await.unwrap();
    let alex = login(&client, &base, "alex@example.com").await.unwrap();
    let update = json!({ "summary": "edited" });

    // post 1 belongs to johndoe
    let forbidden = client
        .put(format!("{base}/api/v1/posts/1"))
        .bearer_auth(jane["access_token"].as_str().unwrap())
        .json(&update)
        .send()
        .await
        .unwrap();
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let allowed = client
        .put(format!("{base}/api/v1/posts/1"))
        .bearer_auth(alex["access_token"].as_str().unwrap())
        .json(&update)
        .send()
        .await
        .unwrap();
    assert_eq!(allowed.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_posts_filter_by_published() {
    let (base, _) = spawn_server().await.unwrap();
    let drafts: Vec<Value> = reqwest::get(format!("{base}/api/v1/posts?published=false"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0]["slug"], "notes-on-remote-team-rituals");
}

#[tokio::test]
async fn test_expired_access_tokens_are_rejected() {
    let (base, state) = spawn_server().await.unwrap();
    let client = Client::new();
    let tokens = login(&client, &base, "john@example.com").await.unwrap();

    state.expire_access_tokens();

    let response = client
        .get(format!("{base}/api/v1/auth/me"))
        .bearer_auth(tokens["access_token"].as_str().unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
