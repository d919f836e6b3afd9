//! Vet Entity Query Handlers
//!
//! Read endpoints under `/api/vet-entities`.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::application::dto::response::VetEntityResponse;
use crate::application::services::{VetEntityError, VetEntityService, VetEntityServiceImpl};
use crate::domain::Page;
use crate::infrastructure::repositories::PgVetEntityRepository;
use crate::shared::error::AppError;
use crate::startup::AppState;

fn vet_entity_service(state: &AppState) -> VetEntityServiceImpl<PgVetEntityRepository> {
    VetEntityServiceImpl::new(Arc::new(PgVetEntityRepository::new(state.db.clone())))
}

fn map_vet_entity_error(e: VetEntityError) -> AppError {
    match e {
        VetEntityError::NotFound(_) => AppError::NotFound(e.to_string()),
        VetEntityError::Internal(msg) => AppError::Internal(msg),
    }
}

/// Find a vet entity by id
pub async fn find_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<VetEntityResponse>, AppError> {
    let vet_entity = vet_entity_service(&state)
        .find_by_id(id)
        .await
        .map_err(map_vet_entity_error)?;

    Ok(Json(vet_entity.into()))
}

/// Vet entities whose name contains the given fragment
pub async fn find_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(page): Query<Page>,
) -> Result<Json<Vec<VetEntityResponse>>, AppError> {
    let vet_entities = vet_entity_service(&state)
        .find_by_name_containing(&name, page)
        .await
        .map_err(map_vet_entity_error)?;

    Ok(Json(
        vet_entities.into_iter().map(VetEntityResponse::from).collect(),
    ))
}
