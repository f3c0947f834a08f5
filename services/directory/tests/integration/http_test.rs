//! Router-level smoke tests: wiring, identity extraction, and role gates
//! that short-circuit before any storage access.

use axum::http::StatusCode;
use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use serde_json::json;
use uuid::Uuid;

use steeple_domain::role::SystemRole;
use steeple_testing::identity::MockIdentity;

use steeple_directory::infra::claims::HttpClaimsClient;
use steeple_directory::router::build_router;
use steeple_directory::state::AppState;

fn test_server() -> TestServer {
    let state = AppState {
        db: DatabaseConnection::default(),
        claims: HttpClaimsClient::new("http://identity.invalid", "test-token"),
    };
    TestServer::new(build_router(state)).unwrap()
}

fn with_identity(
    request: axum_test::TestRequest,
    identity: &MockIdentity,
) -> axum_test::TestRequest {
    let mut request = request;
    for (name, value) in identity.headers().iter() {
        request = request.add_header(name.clone(), value.clone());
    }
    request
}

#[tokio::test]
async fn should_serve_health_checks_without_identity() {
    let server = test_server();
    assert_eq!(server.get("/healthz").await.status_code(), StatusCode::OK);
    assert_eq!(server.get("/readyz").await.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn should_reject_membership_routes_without_identity_headers() {
    let server = test_server();
    let response = server.get("/memberships/my").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_forbid_church_creation_for_plain_users() {
    let server = test_server();
    let response = with_identity(server.post("/churches"), &MockIdentity::user())
        .json(&json!({"name": "Riverside Local", "level": "local"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_forbid_account_deletion_below_superadmin() {
    let server = test_server();
    let admin = MockIdentity::new(Uuid::new_v4(), SystemRole::Admin);
    let response = with_identity(server.delete(&format!("/users/{}", Uuid::new_v4())), &admin).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_reject_invalid_church_level_before_touching_storage() {
    let server = test_server();
    let admin = MockIdentity::new(Uuid::new_v4(), SystemRole::Admin);
    let response = with_identity(server.post("/churches"), &admin)
        .json(&json!({"name": "Nowhere", "level": "district"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}
