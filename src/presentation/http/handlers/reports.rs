//! Report Handlers
//!
//! Endpoints under `/api/reports` for clinical visit reports.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::request::ReportRequest;
use crate::application::dto::response::ReportResponse;
use crate::application::services::{ReportError, ReportService, ReportServiceImpl};
use crate::domain::{NewReport, Page};
use crate::infrastructure::repositories::{
    PgPetRepository, PgReportRepository, PgVetRepository,
};
use crate::shared::error::AppError;
use crate::startup::AppState;

fn report_service(
    state: &AppState,
) -> ReportServiceImpl<PgReportRepository, PgPetRepository, PgVetRepository> {
    ReportServiceImpl::new(
        Arc::new(PgReportRepository::new(state.db.clone())),
        Arc::new(PgPetRepository::new(state.db.clone())),
        Arc::new(PgVetRepository::new(state.db.clone())),
    )
}

fn map_report_error(e: ReportError) -> AppError {
    match e {
        ReportError::NotFound(_) | ReportError::PetNotFound(_) | ReportError::VetNotFound(_) => {
            AppError::NotFound(e.to_string())
        }
        ReportError::Internal(msg) => AppError::Internal(msg),
    }
}

fn new_report(body: ReportRequest) -> NewReport {
    NewReport {
        pet_id: body.pet_id,
        vet_id: body.vet_id,
        reason: body.reason,
        diagnosis: body.diagnosis,
        treatment: body.treatment,
        report_date: body.report_date,
    }
}

fn to_responses(reports: Vec<crate::domain::Report>) -> Vec<ReportResponse> {
    reports.into_iter().map(ReportResponse::from).collect()
}

/// Find a report by id
pub async fn find_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ReportResponse>, AppError> {
    let report = report_service(&state)
        .find_by_id(id)
        .await
        .map_err(map_report_error)?;

    Ok(Json(report.into()))
}

/// Reports for a pet
pub async fn find_by_pet_id(
    State(state): State<AppState>,
    Path(pet_id): Path<i64>,
    Query(page): Query<Page>,
) -> Result<Json<Vec<ReportResponse>>, AppError> {
    let reports = report_service(&state)
        .find_by_pet_id(pet_id, page)
        .await
        .map_err(map_report_error)?;

    Ok(Json(to_responses(reports)))
}

/// Reports for any pet of a client
pub async fn find_by_client_id(
    State(state): State<AppState>,
    Path(client_id): Path<i64>,
    Query(page): Query<Page>,
) -> Result<Json<Vec<ReportResponse>>, AppError> {
    let reports = report_service(&state)
        .find_by_client_id(client_id, page)
        .await
        .map_err(map_report_error)?;

    Ok(Json(to_responses(reports)))
}

/// Reports for any pet of a client located by NIF/NIE
pub async fn find_by_client_national_id_document(
    State(state): State<AppState>,
    Path(national_id_document): Path<String>,
    Query(page): Query<Page>,
) -> Result<Json<Vec<ReportResponse>>, AppError> {
    let reports = report_service(&state)
        .find_by_client_national_id_document(&national_id_document, page)
        .await
        .map_err(map_report_error)?;

    Ok(Json(to_responses(reports)))
}

/// Reports issued by a vet
pub async fn find_by_vet_id(
    State(state): State<AppState>,
    Path(vet_id): Path<i64>,
    Query(page): Query<Page>,
) -> Result<Json<Vec<ReportResponse>>, AppError> {
    let reports = report_service(&state)
        .find_by_vet_id(vet_id, page)
        .await
        .map_err(map_report_error)?;

    Ok(Json(to_responses(reports)))
}

/// Reports issued by a clinic's vets
pub async fn find_by_vet_entity_id(
    State(state): State<AppState>,
    Path(vet_entity_id): Path<i64>,
    Query(page): Query<Page>,
) -> Result<Json<Vec<ReportResponse>>, AppError> {
    let reports = report_service(&state)
        .find_by_vet_entity_id(vet_entity_id, page)
        .await
        .map_err(map_report_error)?;

    Ok(Json(to_responses(reports)))
}

/// Issue a new report
pub async fn save(
    State(state): State<AppState>,
    Json(body): Json<ReportRequest>,
) -> Result<(StatusCode, Json<ReportResponse>), AppError> {
    let report = report_service(&state)
        .save(new_report(body))
        .await
        .map_err(map_report_error)?;

    Ok((StatusCode::CREATED, Json(report.into())))
}

/// Amend a report
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<ReportRequest>,
) -> Result<Json<ReportResponse>, AppError> {
    let report = report_service(&state)
        .update(id, new_report(body))
        .await
        .map_err(map_report_error)?;

    Ok(Json(report.into()))
}

/// Delete a report
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    report_service(&state)
        .delete(id)
        .await
        .map_err(map_report_error)?;

    Ok(StatusCode::OK)
}
