use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;

/// JSON request body. The `Content-Type` header is not consulted; only the bytes matter.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            debug!("Failed to read request body: {}", e);
            ApiError::invalid_json("Invalid request body")
        })?;

        serde_json::from_slice(&bytes).map(JsonBody).map_err(|e| {
            debug!("Rejected request body: {}", e);
            ApiError::invalid_json("Invalid request body")
        })
    }
}
