//! Client Query Handlers
//!
//! Read endpoints under `/api/clients`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::application::dto::response::ClientResponse;
use crate::application::services::{ClientError, ClientService, ClientServiceImpl};
use crate::infrastructure::repositories::PgClientRepository;
use crate::shared::error::AppError;
use crate::startup::AppState;

fn client_service(state: &AppState) -> ClientServiceImpl<PgClientRepository> {
    ClientServiceImpl::new(Arc::new(PgClientRepository::new(state.db.clone())))
}

/// Find a client by id
pub async fn find_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ClientResponse>, AppError> {
    let client = client_service(&state)
        .find_by_id(id)
        .await
        .map_err(|e| match e {
            ClientError::NotFound(_) => AppError::NotFound(e.to_string()),
            ClientError::Internal(msg) => AppError::Internal(msg),
        })?;

    Ok(Json(client.into()))
}
