use crate::error::ApiError;

/// Outcome of an ownership check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Forbidden,
}

/// Single ownership rule applied before every mutation of an owned record.
pub fn authorize(caller_id: i64, owner_id: i64) -> Access {
    if caller_id == owner_id {
        Access::Allowed
    } else {
        Access::Forbidden
    }
}

impl Access {
    pub fn require(self) -> Result<(), ApiError> {
        match self {
            Access::Allowed => Ok(()),
            Access::Forbidden => Err(ApiError::forbidden("Unauthorized")),
        }
    }
}
