//! Common test utilities for integration tests.
//!
//! These tests run against a real PostgreSQL database. They are skipped
//! unless the `TEST_DATABASE_URL` environment variable is set, so the suite
//! stays green on machines without a database.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request},
    Router,
};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use uuid::Uuid;

use guidebook_api::{app::create_app, config::Config};
use persistence::entities::UserEntity;
use persistence::repositories::user::NewUser;
use persistence::repositories::UserRepository;
use shared::jwt::JwtConfig;
use shared::password::hash_password;

/// Matches the jwt.secret default embedded in `Config::load_for_test`.
pub const TEST_JWT_SECRET: &str = "test-secret-do-not-use-in-production";

/// Connect to the test database and run migrations.
///
/// Returns `None` when `TEST_DATABASE_URL` is not set; callers skip the
/// test in that case.
pub async fn try_test_pool() -> Option<PgPool> {
    let database_url = std::env::var("TEST_DATABASE_URL").ok()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    Some(pool)
}

/// Test configuration built entirely from embedded defaults.
pub fn test_config() -> Config {
    Config::load_for_test(&[]).expect("Failed to build test config")
}

/// Create a test application router.
pub fn create_test_app(pool: PgPool) -> Router {
    create_app(test_config(), pool).expect("Failed to build test app")
}

/// JWT config matching the test application's secret.
pub fn test_jwt() -> JwtConfig {
    JwtConfig::new(TEST_JWT_SECRET, 3600, 86400).expect("Failed to build test JWT config")
}

/// Generate a unique username for testing.
pub fn unique_username() -> String {
    format!("user_{}", Uuid::new_v4().simple())
}

/// Generate a unique email for testing.
pub fn unique_email() -> String {
    format!("test_{}@example.com", Uuid::new_v4().simple())
}

/// A provisioned account with a valid access token.
pub struct TestAccount {
    pub user: UserEntity,
    pub token: String,
}

impl TestAccount {
    pub fn caller_id(&self) -> Uuid {
        self.user.id
    }
}

/// Create an account directly in the database and mint an access token
/// for it.
pub async fn create_account(
    pool: &PgPool,
    email: &str,
    password: &str,
    is_staff: bool,
) -> TestAccount {
    let user = UserRepository::new(pool.clone())
        .create(&NewUser {
            username: unique_username(),
            email: email.to_string(),
            password_hash: hash_password(password).expect("Failed to hash password"),
            is_staff,
        })
        .await
        .expect("Failed to create test account");

    let token = test_jwt()
        .generate_access_token(user.id)
        .expect("Failed to mint test token");

    TestAccount { user, token }
}

/// Shorthand for a regular (non-staff) account with a unique email.
pub async fn create_user_account(pool: &PgPool) -> TestAccount {
    create_account(pool, &unique_email(), "integration-pass", false).await
}

/// Shorthand for an admin account with a unique email.
pub async fn create_admin_account(pool: &PgPool) -> TestAccount {
    create_account(pool, &unique_email(), "integration-pass", true).await
}

/// Build a JSON request with bearer authentication.
pub fn json_request_with_auth(
    method: Method,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Build an unauthenticated JSON request.
pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Build a GET request with bearer authentication.
pub fn get_request_with_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Build a DELETE request with bearer authentication.
pub fn delete_request_with_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Helper to parse a JSON response body.
pub async fn parse_response_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
}

/// Create a guide through the API and return its id.
pub async fn create_test_guide(app: &Router, token: &str, title: &str) -> String {
    use tower::ServiceExt;

    let request = json_request_with_auth(
        Method::POST,
        "/api/guides",
        serde_json::json!({
            "title": title,
            "description": "integration test guide",
            "days": 2,
            "mobility": "car",
            "season": "summer",
            "audience": "family"
        }),
        token,
    );

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = parse_response_body(response).await;
    assert_eq!(
        status,
        axum::http::StatusCode::CREATED,
        "guide creation failed: {:?}",
        body
    );

    body["id"].as_str().expect("guide id missing").to_string()
}

/// Create an invitation through the API and return its id.
pub async fn create_test_invitation(
    app: &Router,
    token: &str,
    guide_id: &str,
    invited_email: &str,
) -> String {
    use tower::ServiceExt;

    let request = json_request_with_auth(
        Method::POST,
        "/api/invitations",
        serde_json::json!({
            "guide": guide_id,
            "invited_email": invited_email
        }),
        token,
    );

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = parse_response_body(response).await;
    assert_eq!(
        status,
        axum::http::StatusCode::CREATED,
        "invitation creation failed: {:?}",
        body
    );

    body["id"].as_str().expect("invitation id missing").to_string()
}

/// Create an activity through the API and return its id.
pub async fn create_test_activity(
    app: &Router,
    token: &str,
    guide_id: &str,
    title: &str,
    day: i32,
    order: i32,
) -> String {
    use tower::ServiceExt;

    let request = json_request_with_auth(
        Method::POST,
        "/api/activities",
        serde_json::json!({
            "guide": guide_id,
            "title": title,
            "category": "museum",
            "day": day,
            "order": order
        }),
        token,
    );

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = parse_response_body(response).await;
    assert_eq!(
        status,
        axum::http::StatusCode::CREATED,
        "activity creation failed: {:?}",
        body
    );

    body["id"].as_str().expect("activity id missing").to_string()
}
