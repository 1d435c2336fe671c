mod common;

use axum_test::TestServer;
use common::InMemoryUserRepository;
use std::sync::Arc;

fn make_server() -> TestServer {
    let state = common::test_state(Arc::new(InMemoryUserRepository::new()));
    TestServer::new(common::build_app(state)).unwrap()
}

#[tokio::test]
async fn test_health_endpoint_success() {
    let server = make_server();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["cache"]["status"], "ok");
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let server = make_server();

    let response = server.get("/health").await;

    let json = response.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json.get("checks").is_some());
    assert!(json["checks"].get("database").is_some());
    assert!(json["checks"].get("cache").is_some());
}

#[tokio::test]
async fn test_health_needs_no_credential() {
    let server = make_server();

    server
        .get("/health")
        .add_header("Authorization", "Bearer forged")
        .await
        .assert_status_ok();
}
