//! Pet Handlers
//!
//! Endpoints under `/api/pets`, including the client↔pet association
//! management paths.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::application::dto::request::PetRequest;
use crate::application::dto::response::PetResponse;
use crate::application::services::{PetError, PetService, PetServiceImpl};
use crate::domain::{NewPet, Page};
use crate::infrastructure::repositories::{PgClientRepository, PgPetRepository};
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

fn pet_service(state: &AppState) -> PetServiceImpl<PgPetRepository, PgClientRepository> {
    PetServiceImpl::new(
        Arc::new(PgPetRepository::new(state.db.clone())),
        Arc::new(PgClientRepository::new(state.db.clone())),
    )
}

fn map_pet_error(e: PetError) -> AppError {
    match e {
        PetError::NotFound(_)
        | PetError::ClientNotFound(_)
        | PetError::ClientNotFoundByDocument(_) => AppError::NotFound(e.to_string()),
        PetError::Internal(msg) => AppError::Internal(msg),
    }
}

fn new_pet(body: PetRequest) -> NewPet {
    NewPet {
        chip_number: body.chip_number,
        species: body.species,
        breed: body.breed,
        name: body.name,
        birthdate: body.birthdate,
        alive: body.alive,
        castrated: body.castrated,
    }
}

/// Find a pet by id, owners included
pub async fn find_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PetResponse>, AppError> {
    let pet = pet_service(&state)
        .find_by_id(id)
        .await
        .map_err(map_pet_error)?;

    Ok(Json(pet.into()))
}

/// Pets of a client, living animals first
pub async fn find_by_client_id(
    State(state): State<AppState>,
    Path(client_id): Path<i64>,
    Query(page): Query<Page>,
) -> Result<Json<Vec<PetResponse>>, AppError> {
    let pets = pet_service(&state)
        .find_by_client_id(client_id, page)
        .await
        .map_err(map_pet_error)?;

    Ok(Json(pets.into_iter().map(PetResponse::from).collect()))
}

/// Pets of a client located by NIF/NIE, living animals first
pub async fn find_by_client_national_id_document(
    State(state): State<AppState>,
    Path(national_id_document): Path<String>,
    Query(page): Query<Page>,
) -> Result<Json<Vec<PetResponse>>, AppError> {
    let pets = pet_service(&state)
        .find_by_client_national_id_document(&national_id_document, page)
        .await
        .map_err(map_pet_error)?;

    Ok(Json(pets.into_iter().map(PetResponse::from).collect()))
}

/// Register a new pet
pub async fn save(
    State(state): State<AppState>,
    Json(body): Json<PetRequest>,
) -> Result<(StatusCode, Json<PetResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    let pet = pet_service(&state)
        .save(new_pet(body))
        .await
        .map_err(map_pet_error)?;

    Ok((StatusCode::CREATED, Json(pet.into())))
}

/// Update a pet's descriptive fields
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<PetRequest>,
) -> Result<Json<PetResponse>, AppError> {
    body.validate().map_err(validation_error)?;

    let pet = pet_service(&state)
        .update(id, new_pet(body))
        .await
        .map_err(map_pet_error)?;

    Ok(Json(pet.into()))
}

/// Associate a client (by NIF/NIE) with a pet
pub async fn add_client(
    State(state): State<AppState>,
    Path((pet_id, national_id_document)): Path<(i64, String)>,
) -> Result<StatusCode, AppError> {
    pet_service(&state)
        .add_client(pet_id, &national_id_document)
        .await
        .map_err(map_pet_error)?;

    Ok(StatusCode::OK)
}

/// Remove a client↔pet association
pub async fn remove_client(
    State(state): State<AppState>,
    Path((pet_id, client_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    pet_service(&state)
        .remove_client(pet_id, client_id)
        .await
        .map_err(map_pet_error)?;

    Ok(StatusCode::OK)
}

/// Delete a pet
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    pet_service(&state).delete(id).await.map_err(map_pet_error)?;

    Ok(StatusCode::OK)
}
