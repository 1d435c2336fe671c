mod common;

use axum::http::{Method, StatusCode};
use axum_test::TestServer;
use blog_api::utils::ClientIpSource;
use common::InMemoryUserRepository;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Three requests per minute per client, keyed on `X-Forwarded-For`.
fn make_server() -> TestServer {
    let state = common::build_state(
        Arc::new(InMemoryUserRepository::new()),
        3,
        Duration::from_secs(60),
        ClientIpSource::ProxyHeaders,
    );
    TestServer::new(common::build_app(state)).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_fourth_request_in_window_is_rejected() {
    let server = make_server();

    for _ in 0..3 {
        server
            .get("/api/v1/blogs")
            .add_header("X-Forwarded-For", "203.0.113.7")
            .await
            .assert_status_ok();
    }

    let response = server
        .get("/api/v1/blogs")
        .add_header("X-Forwarded-For", "203.0.113.7")
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let body: Value = response.json();
    assert_eq!(body["error"], "Rate limit exceeded. Try again later.");
}

#[tokio::test(start_paused = true)]
async fn test_window_resets_after_expiry() {
    let server = make_server();

    for _ in 0..3 {
        server
            .get("/api/v1/blogs")
            .add_header("X-Forwarded-For", "203.0.113.7")
            .await
            .assert_status_ok();
    }
    server
        .get("/api/v1/blogs")
        .add_header("X-Forwarded-For", "203.0.113.7")
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);

    tokio::time::advance(Duration::from_secs(61)).await;

    server
        .get("/api/v1/blogs")
        .add_header("X-Forwarded-For", "203.0.113.7")
        .await
        .assert_status_ok();
}

#[tokio::test(start_paused = true)]
async fn test_clients_are_counted_separately() {
    let server = make_server();

    for _ in 0..3 {
        server
            .get("/api/v1/blogs")
            .add_header("X-Forwarded-For", "203.0.113.7")
            .await
            .assert_status_ok();
    }

    server
        .get("/api/v1/blogs")
        .add_header("X-Forwarded-For", "198.51.100.20")
        .await
        .assert_status_ok();
}

#[tokio::test(start_paused = true)]
async fn test_rejected_requests_do_not_extend_the_window() {
    let server = make_server();

    for _ in 0..3 {
        server
            .get("/health")
            .add_header("X-Forwarded-For", "203.0.113.7")
            .await
            .assert_status_ok();
    }

    tokio::time::advance(Duration::from_secs(30)).await;
    for _ in 0..5 {
        server
            .get("/health")
            .add_header("X-Forwarded-For", "203.0.113.7")
            .await
            .assert_status(StatusCode::TOO_MANY_REQUESTS);
    }

    // The window opened at t=0, so it has expired by t=61 regardless of the
    // rejections in between.
    tokio::time::advance(Duration::from_secs(31)).await;
    server
        .get("/health")
        .add_header("X-Forwarded-For", "203.0.113.7")
        .await
        .assert_status_ok();
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_applies_before_authentication() {
    let server = make_server();

    for _ in 0..3 {
        server
            .get("/api/v1/user/profile")
            .add_header("X-Forwarded-For", "203.0.113.7")
            .await
            .assert_status_unauthorized();
    }

    // Unauthenticated requests still used up the quota.
    server
        .get("/api/v1/user/profile")
        .add_header("X-Forwarded-For", "203.0.113.7")
        .add_header("Authorization", "Bearer good-token")
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test(start_paused = true)]
async fn test_preflight_is_answered_before_rate_limiting() {
    let server = make_server();

    for _ in 0..3 {
        server
            .get("/api/v1/blogs")
            .add_header("X-Forwarded-For", "203.0.113.7")
            .await
            .assert_status_ok();
    }

    let response = server
        .method(Method::OPTIONS, "/api/v1/blogs")
        .add_header("X-Forwarded-For", "203.0.113.7")
        .add_header("Origin", "https://app.example.com")
        .add_header("Access-Control-Request-Method", "POST")
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.header("access-control-allow-origin"),
        "https://app.example.com"
    );
    assert_eq!(response.header("access-control-allow-credentials"), "true");
}

#[tokio::test(start_paused = true)]
async fn test_rejection_carries_cors_headers() {
    let server = make_server();

    for _ in 0..3 {
        server
            .get("/api/v1/blogs")
            .add_header("X-Forwarded-For", "203.0.113.7")
            .await;
    }

    let response = server
        .get("/api/v1/blogs")
        .add_header("X-Forwarded-For", "203.0.113.7")
        .add_header("Origin", "https://app.example.com")
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        response.header("access-control-allow-origin"),
        "https://app.example.com"
    );
}
