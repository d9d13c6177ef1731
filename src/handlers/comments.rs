use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::info;

use super::parse_id;
use crate::auth::authorize;
use crate::database::models::{Comment, CommentDetail, NewComment};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub message: String,
    pub photo_id: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCommentRequest {
    pub message: Option<String>,
}

fn not_found() -> ApiError {
    ApiError::not_found("Comment not found")
}

/// POST /comments
pub async fn create(
    caller: AuthUser,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateCommentRequest>,
) -> ApiResult<Comment> {
    if state.store.find_photo(request.photo_id).await?.is_none() {
        return Err(ApiError::not_found("Photo not found"));
    }

    let comment = state
        .store
        .create_comment(NewComment {
            user_id: caller.user_id,
            photo_id: request.photo_id,
            message: request.message,
        })
        .await?;

    info!("User {} commented on photo {}", caller.user_id, comment.photo_id);
    Ok(ApiResponse::created(comment))
}

/// GET /comments
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<CommentDetail>> {
    let comments = state.store.list_comments().await?;
    Ok(ApiResponse::success(comments))
}

/// GET /comments/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<CommentDetail> {
    let id = parse_id(&id, "comment")?;
    let comment = state
        .store
        .find_comment_detail(id)
        .await?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::success(comment))
}

/// PUT /comments/:id - only the message is editable
pub async fn update(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UpdateCommentRequest>,
) -> ApiResult<Comment> {
    let id = parse_id(&id, "comment")?;

    let mut comment = state.store.find_comment(id).await?.ok_or_else(not_found)?;
    authorize(caller.user_id, comment.user_id).require()?;

    if let Some(message) = request.message {
        comment.message = message;
    }

    let saved = state.store.save_comment(&comment).await?;
    Ok(ApiResponse::success(saved))
}

/// DELETE /comments/:id
pub async fn delete(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "comment")?;

    let comment = state.store.find_comment(id).await?.ok_or_else(not_found)?;
    authorize(caller.user_id, comment.user_id).require()?;

    state.store.delete_comment(comment.id).await?;
    info!("User {} deleted comment {}", caller.user_id, comment.id);
    Ok(StatusCode::OK)
}
