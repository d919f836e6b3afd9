//! Request Validation Tests
//!
//! Public endpoints validate request bodies before any repository call,
//! so malformed payloads must come back as 400 regardless of database
//! availability.

use axum::http::StatusCode;

use crate::common::TestApp;

#[tokio::test]
async fn test_register_client_rejects_invalid_national_id() {
    let app = TestApp::new();

    let body = r#"{
        "username": "carmen",
        "password": "supersecret",
        "national_id_document": "12345678z",
        "name": "Carmen Pérez"
    }"#;
    let response = app.post_json("/users/register/client", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_client_rejects_short_password() {
    let app = TestApp::new();

    let body = r#"{
        "username": "carmen",
        "password": "short",
        "national_id_document": "12345678Z",
        "name": "Carmen Pérez"
    }"#;
    let response = app.post_json("/users/register/client", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_client_rejects_bad_phone_number() {
    let app = TestApp::new();

    let body = r#"{
        "username": "carmen",
        "password": "supersecret",
        "national_id_document": "12345678Z",
        "name": "Carmen Pérez",
        "phone_number": "12-34"
    }"#;
    let response = app.post_json("/users/register/client", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_rejects_short_password() {
    let app = TestApp::new();

    let body = r#"{"username": "carmen", "password": "short"}"#;
    let response = app.post_json("/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_client_is_public() {
    let app = TestApp::new();

    // No Authorization header; a validation failure (not 401) proves the
    // route is reachable without a token
    let body = r#"{
        "username": "carmen",
        "password": "short",
        "national_id_document": "12345678Z",
        "name": "Carmen Pérez"
    }"#;
    let response = app.post_json("/users/register/client", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
