//! User Management Handlers
//!
//! Registration and update endpoints for the three account types. Role
//! requirements are enforced by the route-group guards in `routes.rs`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::application::dto::request::{
    RegisterClientRequest, RegisterVetEntityRequest, RegisterVetRequest, UpdateClientRequest,
    UpdateVetEntityRequest, UpdateVetRequest,
};
use crate::application::dto::response::{
    ClientAccountResponse, VetAccountResponse, VetEntityAccountResponse,
};
use crate::application::services::{
    RegisterClientData, RegisterVetData, RegisterVetEntityData, UpdateClientData, UpdateVetData,
    UpdateVetEntityData, UserError, UserService, UserServiceImpl,
};
use crate::infrastructure::repositories::{
    PgClientRepository, PgVetEntityRepository, PgVetRepository,
};
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

fn user_service(
    state: &AppState,
) -> UserServiceImpl<PgClientRepository, PgVetRepository, PgVetEntityRepository> {
    UserServiceImpl::new(
        Arc::new(PgClientRepository::new(state.db.clone())),
        Arc::new(PgVetRepository::new(state.db.clone())),
        Arc::new(PgVetEntityRepository::new(state.db.clone())),
    )
}

fn map_user_error(e: UserError) -> AppError {
    match e {
        UserError::ClientNotFound(_)
        | UserError::VetNotFound(_)
        | UserError::VetEntityNotFound(_) => AppError::NotFound(e.to_string()),
        UserError::DuplicateAccount => AppError::Conflict(e.to_string()),
        UserError::PasswordHash(msg) | UserError::Internal(msg) => AppError::Internal(msg),
    }
}

/// Register a new client account
pub async fn register_client(
    State(state): State<AppState>,
    Json(body): Json<RegisterClientRequest>,
) -> Result<(StatusCode, Json<ClientAccountResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    let client = user_service(&state)
        .register_client(RegisterClientData {
            username: body.username,
            password: body.password,
            email: body.email,
            national_id_document: body.national_id_document,
            name: body.name,
            birthdate: body.birthdate,
            address: body.address,
            phone_number: body.phone_number,
        })
        .await
        .map_err(map_user_error)?;

    Ok((StatusCode::CREATED, Json(client.into())))
}

/// Register a new vet account
pub async fn register_vet(
    State(state): State<AppState>,
    Json(body): Json<RegisterVetRequest>,
) -> Result<(StatusCode, Json<VetAccountResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    let vet = user_service(&state)
        .register_vet(RegisterVetData {
            username: body.username,
            password: body.password,
            email: body.email,
            national_id_document: body.national_id_document,
            registration_number: body.registration_number,
            name: body.name,
            vet_entity_id: body.vet_entity_id,
        })
        .await
        .map_err(map_user_error)?;

    Ok((StatusCode::CREATED, Json(vet.into())))
}

/// Register a new vet entity account
pub async fn register_vet_entity(
    State(state): State<AppState>,
    Json(body): Json<RegisterVetEntityRequest>,
) -> Result<(StatusCode, Json<VetEntityAccountResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    let vet_entity = user_service(&state)
        .register_vet_entity(RegisterVetEntityData {
            username: body.username,
            password: body.password,
            email: body.email,
            cif: body.cif,
            name: body.name,
            address: body.address,
            phone_number: body.phone_number,
        })
        .await
        .map_err(map_user_error)?;

    Ok((StatusCode::CREATED, Json(vet_entity.into())))
}

/// Update an existing client account
pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateClientRequest>,
) -> Result<Json<ClientAccountResponse>, AppError> {
    body.validate().map_err(validation_error)?;

    let client = user_service(&state)
        .update_client(
            id,
            UpdateClientData {
                email: body.email,
                enabled: body.enabled,
                address: body.address,
                phone_number: body.phone_number,
            },
        )
        .await
        .map_err(map_user_error)?;

    Ok(Json(client.into()))
}

/// Update an existing vet account
pub async fn update_vet(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateVetRequest>,
) -> Result<Json<VetAccountResponse>, AppError> {
    body.validate().map_err(validation_error)?;

    let vet = user_service(&state)
        .update_vet(
            id,
            UpdateVetData {
                email: body.email,
                enabled: body.enabled,
                vet_entity_id: body.vet_entity_id,
            },
        )
        .await
        .map_err(map_user_error)?;

    Ok(Json(vet.into()))
}

/// Update an existing vet entity account
pub async fn update_vet_entity(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateVetEntityRequest>,
) -> Result<Json<VetEntityAccountResponse>, AppError> {
    body.validate().map_err(validation_error)?;

    let vet_entity = user_service(&state)
        .update_vet_entity(
            id,
            UpdateVetEntityData {
                email: body.email,
                enabled: body.enabled,
                name: body.name,
                address: body.address,
                phone_number: body.phone_number,
            },
        )
        .await
        .map_err(map_user_error)?;

    Ok(Json(vet_entity.into()))
}
