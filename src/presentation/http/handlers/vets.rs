//! Vet Query Handlers
//!
//! Read endpoints under `/api/vets`.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::application::dto::response::VetResponse;
use crate::application::services::{VetError, VetService, VetServiceImpl};
use crate::domain::Page;
use crate::infrastructure::repositories::PgVetRepository;
use crate::shared::error::AppError;
use crate::startup::AppState;

fn vet_service(state: &AppState) -> VetServiceImpl<PgVetRepository> {
    VetServiceImpl::new(Arc::new(PgVetRepository::new(state.db.clone())))
}

fn map_vet_error(e: VetError) -> AppError {
    match e {
        VetError::NotFound(_) | VetError::NotFoundForAppointment(_) => {
            AppError::NotFound(e.to_string())
        }
        VetError::Internal(msg) => AppError::Internal(msg),
    }
}

/// Find a vet by id
pub async fn find_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<VetResponse>, AppError> {
    let vet = vet_service(&state).find_by_id(id).await.map_err(map_vet_error)?;

    Ok(Json(vet.into()))
}

/// Find the vet assigned to an appointment
pub async fn find_by_appointment_id(
    State(state): State<AppState>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<VetResponse>, AppError> {
    let vet = vet_service(&state)
        .find_by_appointment_id(appointment_id)
        .await
        .map_err(map_vet_error)?;

    Ok(Json(vet.into()))
}

/// All vets of a clinic
pub async fn find_by_vet_entity_id(
    State(state): State<AppState>,
    Path(vet_entity_id): Path<i64>,
    Query(page): Query<Page>,
) -> Result<Json<Vec<VetResponse>>, AppError> {
    let vets = vet_service(&state)
        .find_by_vet_entity_id(vet_entity_id, page)
        .await
        .map_err(map_vet_error)?;

    Ok(Json(vets.into_iter().map(VetResponse::from).collect()))
}

/// Vets of a clinic matched by name fragment
pub async fn find_by_name_and_vet_entity_id(
    State(state): State<AppState>,
    Path((name, vet_entity_id)): Path<(String, i64)>,
    Query(page): Query<Page>,
) -> Result<Json<Vec<VetResponse>>, AppError> {
    let vets = vet_service(&state)
        .find_by_name_and_vet_entity_id(&name, vet_entity_id, page)
        .await
        .map_err(map_vet_error)?;

    Ok(Json(vets.into_iter().map(VetResponse::from).collect()))
}
