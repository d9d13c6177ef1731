use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::info;

use super::parse_id;
use crate::auth::authorize;
use crate::database::models::{NewPhoto, Photo, PhotoWithUser};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePhotoRequest {
    pub title: String,
    #[serde(default)]
    pub caption: String,
    pub photo_url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePhotoRequest {
    pub title: Option<String>,
    pub caption: Option<String>,
    pub photo_url: Option<String>,
}

fn not_found() -> ApiError {
    ApiError::not_found("Photo not found")
}

/// POST /photos
pub async fn create(
    caller: AuthUser,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreatePhotoRequest>,
) -> ApiResult<Photo> {
    let photo = state
        .store
        .create_photo(NewPhoto {
            title: request.title,
            caption: request.caption,
            photo_url: request.photo_url,
            user_id: caller.user_id,
        })
        .await?;

    info!("User {} created photo {}", caller.user_id, photo.id);
    Ok(ApiResponse::created(photo))
}

/// GET /photos
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<PhotoWithUser>> {
    let photos = state.store.list_photos().await?;
    Ok(ApiResponse::success(photos))
}

/// GET /photos/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<PhotoWithUser> {
    let id = parse_id(&id, "photo")?;
    let photo = state
        .store
        .find_photo_with_user(id)
        .await?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::success(photo))
}

/// PUT /photos/:id
pub async fn update(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UpdatePhotoRequest>,
) -> ApiResult<Photo> {
    let id = parse_id(&id, "photo")?;

    let mut photo = state.store.find_photo(id).await?.ok_or_else(not_found)?;
    authorize(caller.user_id, photo.user_id).require()?;

    if let Some(title) = request.title {
        photo.title = title;
    }
    if let Some(caption) = request.caption {
        photo.caption = caption;
    }
    if let Some(url) = request.photo_url {
        photo.photo_url = url;
    }

    let saved = state.store.save_photo(&photo).await?;
    Ok(ApiResponse::success(saved))
}

/// DELETE /photos/:id
pub async fn delete(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "photo")?;

    let photo = state.store.find_photo(id).await?.ok_or_else(not_found)?;
    authorize(caller.user_id, photo.user_id).require()?;

    state.store.delete_photo(photo.id).await?;
    info!("User {} deleted photo {}", caller.user_id, photo.id);
    Ok(StatusCode::OK)
}
