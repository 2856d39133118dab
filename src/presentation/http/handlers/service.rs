//! Service Handlers

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::application::dto::request::{ServiceRequest, SyncLocaleRequest};
use crate::application::dto::response::{
    IdResponse, PropagateResponse, ServiceResponse, SyncResponse,
};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

/// Create a service with its nested collections
pub async fn create_service(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<ServiceRequest>,
) -> Result<(StatusCode, Json<IdResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    let id = state.content.create_service(Some(auth.user_id), body).await?;

    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

/// Get a service with all of its collections
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ServiceResponse>, AppError> {
    let detail = state.content.get_service(id).await?;
    Ok(Json(ServiceResponse::from(detail)))
}

/// Replace a service
pub async fn update_service(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(body): Json<ServiceRequest>,
) -> Result<Json<IdResponse>, AppError> {
    body.validate().map_err(validation_error)?;

    let id = state
        .content
        .update_service(id, Some(auth.user_id), body)
        .await?;

    Ok(Json(IdResponse { id }))
}

/// Delete a service and every row referencing it
pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if state.content.delete_service(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("service {} not found", id)))
    }
}

/// Create or refresh the sibling of a service in another locale
pub async fn sync_locale(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(body): Json<SyncLocaleRequest>,
) -> Result<(StatusCode, Json<SyncResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    let outcome = state
        .content
        .sync_service_locale(id, Some(auth.user_id), body.locale, body.mode)
        .await?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(SyncResponse::from(outcome))))
}

/// Copy the media references of a service onto its locale siblings
pub async fn propagate_images(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PropagateResponse>, AppError> {
    let updated = state.content.propagate_service_images(id).await?;
    Ok(Json(PropagateResponse { updated }))
}
