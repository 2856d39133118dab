//! Tag and Category Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::application::dto::request::TermRequest;
use crate::application::dto::response::IdResponse;
use crate::domain::EntityKind;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

async fn create_term(
    state: AppState,
    kind: EntityKind,
    body: TermRequest,
) -> Result<(StatusCode, Json<IdResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    let id = state.taxonomy.create_term(kind, body).await?;

    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

async fn delete_term(state: AppState, kind: EntityKind, id: i64) -> Result<StatusCode, AppError> {
    if state.taxonomy.delete_term(kind, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("{} {} not found", kind, id)))
    }
}

/// Create a tag
pub async fn create_tag(
    State(state): State<AppState>,
    Json(body): Json<TermRequest>,
) -> Result<(StatusCode, Json<IdResponse>), AppError> {
    create_term(state, EntityKind::Tag, body).await
}

/// Delete a tag and unlink it from all content
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    delete_term(state, EntityKind::Tag, id).await
}

/// Create a category
pub async fn create_category(
    State(state): State<AppState>,
    Json(body): Json<TermRequest>,
) -> Result<(StatusCode, Json<IdResponse>), AppError> {
    create_term(state, EntityKind::Category, body).await
}

/// Delete a category and unlink it from all content
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    delete_term(state, EntityKind::Category, id).await
}
