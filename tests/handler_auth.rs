mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::{InMemoryUserRepository, OTHER_TOKEN, USER_TOKEN};
use serde_json::{Value, json};
use std::sync::Arc;

fn make_server(registered: &[&str]) -> (TestServer, Arc<InMemoryUserRepository>) {
    let repo = Arc::new(InMemoryUserRepository::new());
    for id in registered {
        repo.insert(common::sample_user(id));
    }

    let app = common::build_app(common::test_state(repo.clone()));
    (TestServer::new(app).unwrap(), repo)
}

// ─── VALIDATE TOKEN ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_validate_token_registers_new_user() {
    let (server, repo) = make_server(&[]);

    let response = server
        .post("/api/v1/auth/validate-token")
        .json(&json!({
            "token": USER_TOKEN,
            "user": { "id": "u1", "name": "Ada", "email": "ada@example.com" }
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["uid"], "u1");
    assert_eq!(body["name"], "Ada");
    assert!(repo.get("u1").is_some());
}

#[tokio::test]
async fn test_validate_token_returns_existing_user() {
    let (server, _) = make_server(&["u1"]);

    let response = server
        .post("/api/v1/auth/validate-token")
        .json(&json!({
            "token": USER_TOKEN,
            "user": { "id": "u1", "name": "Someone Else" }
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["name"], "Ada Lovelace");
}

#[tokio::test]
async fn test_validate_token_uid_mismatch() {
    let (server, repo) = make_server(&[]);

    let response = server
        .post("/api/v1/auth/validate-token")
        .json(&json!({ "token": USER_TOKEN, "user": { "id": "u2" } }))
        .await;

    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(body["error"], "Token UID does not match user ID");
    assert!(repo.get("u2").is_none());
}

#[tokio::test]
async fn test_validate_token_invalid_token() {
    let (server, _) = make_server(&[]);

    let response = server
        .post("/api/v1/auth/validate-token")
        .json(&json!({ "token": "forged", "user": { "id": "u1" } }))
        .await;

    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn test_validate_token_missing_fields() {
    let (server, _) = make_server(&[]);

    server
        .post("/api/v1/auth/validate-token")
        .json(&json!({ "token": USER_TOKEN }))
        .await
        .assert_status_bad_request();

    server
        .post("/api/v1/auth/validate-token")
        .json(&json!({ "token": "", "user": { "id": "u1" } }))
        .await
        .assert_status_bad_request();
}

// ─── LOGIN / REGISTER ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_registered_user() {
    let (server, _) = make_server(&["u1"]);

    let response = server
        .post("/api/v1/auth/login")
        .add_header("Authorization", format!("Bearer {USER_TOKEN}"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], "u1");
    assert!(body.get("photo_url").is_none());
}

#[tokio::test]
async fn test_login_unregistered_user() {
    let (server, _) = make_server(&[]);

    let response = server
        .post("/api/v1/auth/login")
        .add_header("Authorization", format!("Bearer {USER_TOKEN}"))
        .await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["error"], "User not found. Please register first.");
}

#[tokio::test]
async fn test_register_new_user() {
    let (server, repo) = make_server(&[]);

    let response = server
        .post("/api/v1/auth/register")
        .add_header("Authorization", format!("Bearer {OTHER_TOKEN}"))
        .json(&json!({
            "name": "Grace",
            "email": "grace@example.com",
            "photo_url": "https://example.com/g.png"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], "u2");
    assert_eq!(body["photo_url"], "https://example.com/g.png");
    assert_eq!(repo.get("u2").unwrap().email, "grace@example.com");
}

#[tokio::test]
async fn test_register_twice_conflicts() {
    let (server, _) = make_server(&["u1"]);

    let response = server
        .post("/api/v1/auth/register")
        .add_header("Authorization", format!("Bearer {USER_TOKEN}"))
        .json(&json!({ "name": "Ada", "email": "ada@example.com" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"], "User already exists");
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let (server, repo) = make_server(&[]);

    server
        .post("/api/v1/auth/register")
        .add_header("Authorization", format!("Bearer {USER_TOKEN}"))
        .json(&json!({ "name": "Ada", "email": "not-an-email" }))
        .await
        .assert_status_bad_request();

    assert!(repo.get("u1").is_none());
}

#[tokio::test]
async fn test_login_or_register_is_idempotent() {
    let (server, repo) = make_server(&[]);
    let payload = json!({ "name": "Ada", "email": "ada@example.com" });

    for _ in 0..2 {
        let response = server
            .post("/api/v1/auth/login-or-register")
            .add_header("Authorization", format!("Bearer {USER_TOKEN}"))
            .json(&payload)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["id"], "u1");
    }

    assert_eq!(repo.get("u1").unwrap().name, "Ada");
}
