//! Post Handlers

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::application::dto::request::PostRequest;
use crate::application::dto::response::{IdResponse, PostResponse};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

/// Create a post
pub async fn create_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<PostRequest>,
) -> Result<(StatusCode, Json<IdResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    let id = state.content.create_post(Some(auth.user_id), body).await?;

    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

/// Get a post
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PostResponse>, AppError> {
    let detail = state.content.get_post(id).await?;
    Ok(Json(PostResponse::from(detail)))
}

/// Replace a post
pub async fn update_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(body): Json<PostRequest>,
) -> Result<Json<IdResponse>, AppError> {
    body.validate().map_err(validation_error)?;

    let id = state
        .content
        .update_post(id, Some(auth.user_id), body)
        .await?;

    Ok(Json(IdResponse { id }))
}

/// Delete a post
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if state.content.delete_post(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("post {} not found", id)))
    }
}
