use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::database::models::{NewUser, User};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub age: i32,
    #[serde(default)]
    pub profile_image_url: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Editable profile fields. Absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub profile_image_url: Option<String>,
}

impl UpdateUserRequest {
    fn apply(self, user: &mut User) {
        if let Some(username) = self.username {
            user.username = username;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(age) = self.age {
            user.age = age;
        }
        if let Some(url) = self.profile_image_url {
            user.profile_image_url = url;
        }
    }
}

/// POST /users/register
pub async fn register(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> ApiResult<User> {
    if request.username.trim().is_empty()
        || request.email.trim().is_empty()
        || request.password.is_empty()
    {
        return Err(ApiError::bad_request("Username, email and password are required"));
    }

    let password_hash = state.hasher.hash(request.password).await?;
    let user = state
        .store
        .create_user(NewUser {
            username: request.username,
            email: request.email,
            password_hash,
            age: request.age,
            profile_image_url: request.profile_image_url,
        })
        .await?;

    info!("Registered user {}", user.id);
    Ok(ApiResponse::created(user))
}

/// POST /users/login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> ApiResult<Value> {
    let rejected = || ApiError::unauthorized("Invalid email or password");

    let Some(user) = state.store.find_user_by_email(&request.email).await? else {
        warn!("Login attempt for unknown email");
        return Err(rejected());
    };

    if !state.hasher.verify(user.password_hash.clone(), request.password).await {
        warn!("Login attempt with wrong password for user {}", user.id);
        return Err(rejected());
    }

    let token = state.tokens.issue(user.id, &user.email)?;
    Ok(ApiResponse::success(json!({ "token": token })))
}

/// PUT /users - update the caller's own profile
pub async fn update(
    caller: AuthUser,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UpdateUserRequest>,
) -> ApiResult<User> {
    let mut user = state
        .store
        .find_user(caller.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    request.apply(&mut user);
    let saved = state.store.save_user(&user).await?;
    Ok(ApiResponse::success(saved))
}

/// DELETE /users - delete the caller's own account and everything it owns
pub async fn delete(caller: AuthUser, State(state): State<AppState>) -> ApiResult<Value> {
    state.store.delete_user(caller.user_id).await?;

    info!("Deleted user {}", caller.user_id);
    Ok(ApiResponse::success(json!({ "message": "User deleted successfully" })))
}
