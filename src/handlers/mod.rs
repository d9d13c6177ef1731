// One module per resource. Public reads and bearer-protected writes share
// routes; handlers that need a caller take `AuthUser` as their first extractor.

pub mod comments;
pub mod photos;
pub mod root;
pub mod social_medias;
pub mod users;

use crate::error::ApiError;

/// Parse a numeric path id, reporting `Invalid <entity> ID` otherwise.
pub(crate) fn parse_id(raw: &str, entity: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::bad_request(format!("Invalid {} ID", entity)))
}
