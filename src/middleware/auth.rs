use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::debug;

use crate::auth::bearer_token;
use crate::error::ApiError;
use crate::state::AppState;

/// Caller identity resolved from the bearer token.
///
/// Listed first among a handler's extractors so an unauthenticated request is
/// rejected before its path or body is looked at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let token = bearer_token(header)?;
        let user_id = state.tokens.verify(token).map_err(|e| {
            debug!("Rejected bearer token: {}", e);
            e
        })?;

        Ok(AuthUser { user_id })
    }
}
