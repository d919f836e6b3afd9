//! Appointment Handlers
//!
//! Endpoints under `/api/appointments`, mirroring the `/find/...` lookup
//! paths of the appointment controller.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;

use crate::application::dto::request::AppointmentRequest;
use crate::application::dto::response::AppointmentResponse;
use crate::application::services::{
    AppointmentError, AppointmentService, AppointmentServiceImpl,
};
use crate::domain::{NewAppointment, Page};
use crate::infrastructure::repositories::{
    PgAppointmentRepository, PgClientRepository, PgPetRepository, PgVetRepository,
};
use crate::shared::error::AppError;
use crate::startup::AppState;

fn appointment_service(
    state: &AppState,
) -> AppointmentServiceImpl<
    PgAppointmentRepository,
    PgPetRepository,
    PgClientRepository,
    PgVetRepository,
> {
    AppointmentServiceImpl::new(
        Arc::new(PgAppointmentRepository::new(state.db.clone())),
        Arc::new(PgPetRepository::new(state.db.clone())),
        Arc::new(PgClientRepository::new(state.db.clone())),
        Arc::new(PgVetRepository::new(state.db.clone())),
    )
}

fn map_appointment_error(e: AppointmentError) -> AppError {
    match e {
        AppointmentError::NotFound(_)
        | AppointmentError::VetNotFound(_)
        | AppointmentError::PetNotFound(_)
        | AppointmentError::ClientNotFound(_) => AppError::NotFound(e.to_string()),
        AppointmentError::Internal(msg) => AppError::Internal(msg),
    }
}

fn to_responses(appointments: Vec<crate::domain::Appointment>) -> Vec<AppointmentResponse> {
    appointments.into_iter().map(AppointmentResponse::from).collect()
}

/// Upcoming appointments for the client's pets
pub async fn find_by_client_id(
    State(state): State<AppState>,
    Path(client_id): Path<i64>,
    Query(page): Query<Page>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    let appointments = appointment_service(&state)
        .find_by_client_id(client_id, page)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(to_responses(appointments)))
}

/// Upcoming appointments assigned to a vet
pub async fn find_by_vet_id(
    State(state): State<AppState>,
    Path(vet_id): Path<i64>,
    Query(page): Query<Page>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    let appointments = appointment_service(&state)
        .find_by_vet_id(vet_id, page)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(to_responses(appointments)))
}

/// Appointments assigned to a vet on a given day (date in `yyyy-MM-dd`)
pub async fn find_by_vet_id_and_date(
    State(state): State<AppState>,
    Path((vet_id, date)): Path<(i64, NaiveDate)>,
    Query(page): Query<Page>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    let appointments = appointment_service(&state)
        .find_by_vet_id_and_date(vet_id, date, page)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(to_responses(appointments)))
}

/// Upcoming appointments assigned to a clinic's vets
pub async fn find_by_vet_entity_id(
    State(state): State<AppState>,
    Path(vet_entity_id): Path<i64>,
    Query(page): Query<Page>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    let appointments = appointment_service(&state)
        .find_by_vet_entity_id(vet_entity_id, page)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(to_responses(appointments)))
}

/// Appointments assigned to a clinic's vets on a given day
pub async fn find_by_vet_entity_id_and_date(
    State(state): State<AppState>,
    Path((vet_entity_id, date)): Path<(i64, NaiveDate)>,
    Query(page): Query<Page>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    let appointments = appointment_service(&state)
        .find_by_vet_entity_id_and_date(vet_entity_id, date, page)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(to_responses(appointments)))
}

/// Book a new appointment
pub async fn save(
    State(state): State<AppState>,
    Json(body): Json<AppointmentRequest>,
) -> Result<(StatusCode, Json<AppointmentResponse>), AppError> {
    let appointment = appointment_service(&state)
        .save(NewAppointment {
            client_id: body.client_id,
            pet_id: body.pet_id,
            vet_id: body.vet_id,
            appointment_date: body.appointment_date,
        })
        .await
        .map_err(map_appointment_error)?;

    Ok((StatusCode::CREATED, Json(appointment.into())))
}

/// Reschedule / reassign an appointment
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<AppointmentRequest>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let appointment = appointment_service(&state)
        .update(
            id,
            NewAppointment {
                client_id: body.client_id,
                pet_id: body.pet_id,
                vet_id: body.vet_id,
                appointment_date: body.appointment_date,
            },
        )
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(appointment.into()))
}

/// Cancel an appointment
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    appointment_service(&state)
        .delete(id)
        .await
        .map_err(map_appointment_error)?;

    Ok(StatusCode::OK)
}
