use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::info;

use super::parse_id;
use crate::auth::authorize;
use crate::database::models::{NewSocialMedia, SocialMedia};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSocialMediaRequest {
    pub name: String,
    pub social_media_url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSocialMediaRequest {
    pub name: Option<String>,
    pub social_media_url: Option<String>,
}

/// Load an entry only if the caller owns it; anything else is indistinguishable from missing.
async fn load_owned(state: &AppState, caller: AuthUser, id: i64) -> Result<SocialMedia, ApiError> {
    let entry = state
        .store
        .find_social_media(id, caller.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Social media entry not found"))?;

    authorize(caller.user_id, entry.user_id).require()?;
    Ok(entry)
}

/// POST /socialmedias
pub async fn create(
    caller: AuthUser,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateSocialMediaRequest>,
) -> ApiResult<SocialMedia> {
    let entry = state
        .store
        .create_social_media(NewSocialMedia {
            name: request.name,
            social_media_url: request.social_media_url,
            user_id: caller.user_id,
        })
        .await?;

    info!("User {} added social media entry {}", caller.user_id, entry.id);
    Ok(ApiResponse::created(entry))
}

/// GET /socialmedias - the caller's entries only
pub async fn list(caller: AuthUser, State(state): State<AppState>) -> ApiResult<Vec<SocialMedia>> {
    let entries = state.store.list_social_medias(caller.user_id).await?;
    Ok(ApiResponse::success(entries))
}

/// GET /socialmedias/:id
pub async fn get(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SocialMedia> {
    let id = parse_id(&id, "social media")?;
    let entry = load_owned(&state, caller, id).await?;
    Ok(ApiResponse::success(entry))
}

/// PUT /socialmedias/:id
pub async fn update(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UpdateSocialMediaRequest>,
) -> ApiResult<SocialMedia> {
    let id = parse_id(&id, "social media")?;
    let mut entry = load_owned(&state, caller, id).await?;

    if let Some(name) = request.name {
        entry.name = name;
    }
    if let Some(url) = request.social_media_url {
        entry.social_media_url = url;
    }

    let saved = state.store.save_social_media(&entry).await?;
    Ok(ApiResponse::success(saved))
}

/// DELETE /socialmedias/:id
pub async fn delete(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "social media")?;
    let entry = load_owned(&state, caller, id).await?;

    state.store.delete_social_media(entry.id).await?;
    info!("User {} deleted social media entry {}", caller.user_id, entry.id);
    Ok(StatusCode::OK)
}
