//! Path Authorization Matrix Tests
//!
//! Exercises the role tiers end-to-end: requests carry real signed
//! tokens, and every assertion falls on a response produced before any
//! repository call (401/403 from the guards, 400 from validation once a
//! guard has admitted the request).

use axum::http::StatusCode;

use crate::common::{expired_token, token_for, TestApp};

// A register-vet payload that passes the role guard but fails request
// validation (bad NIF), proving how far the request got
const INVALID_VET_BODY: &str = r#"{
    "username": "anavet",
    "password": "supersecret",
    "national_id_document": "not-a-nif",
    "registration_number": "15/V-6789",
    "name": "Ana García"
}"#;

const INVALID_VET_ENTITY_BODY: &str = r#"{
    "username": "vetsur",
    "password": "supersecret",
    "cif": "not-a-cif",
    "name": "VetSur Clinic"
}"#;

const INVALID_CLIENT_UPDATE_BODY: &str = r#"{
    "email": "not-an-email",
    "enabled": true
}"#;

#[tokio::test]
async fn test_api_requires_authentication() {
    let app = TestApp::new();

    let response = app.get("/api/pets/find/1").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_api_rejects_garbage_token() {
    let app = TestApp::new();

    let response = app.get_auth("/api/pets/find/1", "garbage.token.here").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_api_rejects_expired_token() {
    let app = TestApp::new();
    let token = expired_token(1, &["ROLE_CLIENT"]);

    let response = app.get_auth("/api/pets/find/1", &token).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_client_cannot_write_core_entities() {
    let app = TestApp::new();
    let token = token_for(1, &["ROLE_CLIENT"]);

    let response = app
        .post_json_auth(
            "/api/pets",
            r#"{"species": "dog", "name": "Luna"}"#,
            &token,
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_client_cannot_delete_core_entities() {
    let app = TestApp::new();
    let token = token_for(1, &["ROLE_CLIENT"]);

    let response = app.delete_auth("/api/pets/9", &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_roleless_token_cannot_read_core_entities() {
    let app = TestApp::new();
    let token = token_for(1, &[]);

    let response = app.get_auth("/api/pets/find/1", &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_role_names_are_not_trusted() {
    let app = TestApp::new();
    let token = token_for(1, &["ROLE_SUPERADMIN"]);

    let response = app.get_auth("/api/pets/find/1", &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_vet_cannot_register_vets() {
    let app = TestApp::new();
    let token = token_for(3, &["ROLE_VET"]);

    let response = app
        .post_json_auth("/users/register/vet", INVALID_VET_BODY, &token)
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_vet_entity_may_register_vets() {
    let app = TestApp::new();
    let token = token_for(8, &["ROLE_VET_ENTITY"]);

    // Guard admits the request; validation then rejects the bad NIF
    let response = app
        .post_json_auth("/users/register/vet", INVALID_VET_BODY, &token)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_vet_entity_cannot_register_clinics() {
    let app = TestApp::new();
    let token = token_for(8, &["ROLE_VET_ENTITY"]);

    let response = app
        .post_json_auth("/users/register/vet-entity", INVALID_VET_ENTITY_BODY, &token)
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_root_may_register_clinics() {
    let app = TestApp::new();
    let token = token_for(99, &["ROLE_ROOT"]);

    // Guard admits the request; validation then rejects the bad CIF
    let response = app
        .post_json_auth("/users/register/vet-entity", INVALID_VET_ENTITY_BODY, &token)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_client_may_use_the_client_update_path() {
    let app = TestApp::new();
    let token = token_for(1, &["ROLE_CLIENT"]);

    // Guard admits the request; validation then rejects the bad email
    let response = app
        .put_json_auth("/users/update/client/1", INVALID_CLIENT_UPDATE_BODY, &token)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_client_cannot_update_vets() {
    let app = TestApp::new();
    let token = token_for(1, &["ROLE_CLIENT"]);

    let response = app
        .put_json_auth(
            "/users/update/vet/3",
            r#"{"enabled": true}"#,
            &token,
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_user_management_requires_authentication() {
    let app = TestApp::new();

    let response = app
        .post_json("/users/register/vet", INVALID_VET_BODY)
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
