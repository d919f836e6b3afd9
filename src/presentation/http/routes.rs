//! Route Configuration
//!
//! Configures all HTTP routes and applies the path authorization matrix:
//! reads on the core API are open to every registered role, writes to
//! clinical staff, account management to the tier that owns it.

use axum::{
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::middleware::{
    auth_middleware, require_any_role, require_root, require_staff, require_vet_entity,
    security_headers, track_metrics,
};
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes(state.clone()))
        .nest("/users", user_routes(state.clone()))
        .nest("/auth", auth_routes())
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .layer(middleware::from_fn(track_metrics))
        // Applied last (outermost) so headers land on every response
        .layer(middleware::from_fn(security_headers))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// Core API routes (authenticated; GET for every role, writes for staff)
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/appointments", appointment_routes())
        .nest("/pets", pet_routes())
        .nest("/reports", report_routes())
        .nest("/clients", client_routes())
        .nest("/vets", vet_routes())
        .nest("/vet-entities", vet_entity_routes())
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/refresh", post(handlers::auth::refresh_token))
        .route("/logout", post(handlers::auth::logout))
}

/// User registration and update routes.
///
/// Client registration is the only public path; everything else follows
/// the role matrix.
fn user_routes(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/register/client", post(handlers::users::register_client));

    let client_update = Router::new()
        .route("/update/client/{id}", put(handlers::users::update_client))
        .route_layer(middleware::from_fn(require_any_role));

    let staff = Router::new()
        .route("/update/vet/{id}", put(handlers::users::update_vet))
        .route_layer(middleware::from_fn(require_staff));

    let management = Router::new()
        .route("/register/vet", post(handlers::users::register_vet))
        .route("/update/vet-entity/{id}", put(handlers::users::update_vet_entity))
        .route_layer(middleware::from_fn(require_vet_entity));

    let root = Router::new()
        .route("/register/vet-entity", post(handlers::users::register_vet_entity))
        .route_layer(middleware::from_fn(require_root));

    let protected = client_update
        .merge(staff)
        .merge(management)
        .merge(root)
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    public.merge(protected)
}

/// Appointment routes
fn appointment_routes() -> Router<AppState> {
    let read = Router::new()
        .route(
            "/find/client-id/{client_id}",
            get(handlers::appointments::find_by_client_id),
        )
        .route(
            "/find/vet-id/{vet_id}",
            get(handlers::appointments::find_by_vet_id),
        )
        .route(
            "/find/vet-id/{vet_id}/date/{date}",
            get(handlers::appointments::find_by_vet_id_and_date),
        )
        .route(
            "/find/vet-entity-id/{vet_entity_id}",
            get(handlers::appointments::find_by_vet_entity_id),
        )
        .route(
            "/find/vet-entity-id/{vet_entity_id}/date/{date}",
            get(handlers::appointments::find_by_vet_entity_id_and_date),
        )
        .route_layer(middleware::from_fn(require_any_role));

    let write = Router::new()
        .route("/", post(handlers::appointments::save))
        .route("/{id}", put(handlers::appointments::update))
        .route("/{id}", delete(handlers::appointments::delete))
        .route_layer(middleware::from_fn(require_staff));

    read.merge(write)
}

/// Pet routes
fn pet_routes() -> Router<AppState> {
    let read = Router::new()
        .route("/find/{id}", get(handlers::pets::find_by_id))
        .route(
            "/find/client-id/{client_id}",
            get(handlers::pets::find_by_client_id),
        )
        .route(
            "/find/client-national-id-document/{national_id_document}",
            get(handlers::pets::find_by_client_national_id_document),
        )
        .route_layer(middleware::from_fn(require_any_role));

    let write = Router::new()
        .route("/", post(handlers::pets::save))
        .route("/{id}", put(handlers::pets::update))
        .route(
            "/pet-id/{pet_id}/client-national-id-document/{national_id_document}",
            put(handlers::pets::add_client),
        )
        .route("/{id}", delete(handlers::pets::delete))
        .route(
            "/pet-id/{pet_id}/client-id/{client_id}",
            delete(handlers::pets::remove_client),
        )
        .route_layer(middleware::from_fn(require_staff));

    read.merge(write)
}

/// Report routes
fn report_routes() -> Router<AppState> {
    let read = Router::new()
        .route("/find/{id}", get(handlers::reports::find_by_id))
        .route("/find/pet-id/{pet_id}", get(handlers::reports::find_by_pet_id))
        .route(
            "/find/client-id/{client_id}",
            get(handlers::reports::find_by_client_id),
        )
        .route(
            "/find/client-national-id-document/{national_id_document}",
            get(handlers::reports::find_by_client_national_id_document),
        )
        .route("/find/vet-id/{vet_id}", get(handlers::reports::find_by_vet_id))
        .route(
            "/find/vet-entity-id/{vet_entity_id}",
            get(handlers::reports::find_by_vet_entity_id),
        )
        .route_layer(middleware::from_fn(require_any_role));

    let write = Router::new()
        .route("/", post(handlers::reports::save))
        .route("/{id}", put(handlers::reports::update))
        .route("/{id}", delete(handlers::reports::delete))
        .route_layer(middleware::from_fn(require_staff));

    read.merge(write)
}

/// Client query routes
fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/find/{id}", get(handlers::clients::find_by_id))
        .route_layer(middleware::from_fn(require_any_role))
}

/// Vet query routes
fn vet_routes() -> Router<AppState> {
    Router::new()
        .route("/find/{id}", get(handlers::vets::find_by_id))
        .route(
            "/find/appointment-id/{appointment_id}",
            get(handlers::vets::find_by_appointment_id),
        )
        .route(
            "/find/vet-entity-id/{vet_entity_id}",
            get(handlers::vets::find_by_vet_entity_id),
        )
        .route(
            "/find/name/{name}/vet-entity-id/{vet_entity_id}",
            get(handlers::vets::find_by_name_and_vet_entity_id),
        )
        .route_layer(middleware::from_fn(require_any_role))
}

/// Vet entity query routes
fn vet_entity_routes() -> Router<AppState> {
    Router::new()
        .route("/find/{id}", get(handlers::vet_entities::find_by_id))
        .route("/find/name/{name}", get(handlers::vet_entities::find_by_name))
        .route_layer(middleware::from_fn(require_any_role))
}
