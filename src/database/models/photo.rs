use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{postgres::PgRow, FromRow, Row};

use super::user::UserSummary;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Photo {
    pub id: i64,
    pub title: String,
    pub caption: String,
    pub photo_url: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub title: String,
    pub caption: String,
    pub photo_url: String,
    pub user_id: i64,
}

/// Photo with its owner loaded
#[derive(Debug, Clone, Serialize)]
pub struct PhotoWithUser {
    #[serde(flatten)]
    pub photo: Photo,
    pub user: UserSummary,
}

impl Photo {
    /// Read a photo from joined columns aliased with `prefix`.
    pub fn from_prefixed_row(row: &PgRow, prefix: &str) -> Result<Self, sqlx::Error> {
        let col = |name: &str| format!("{}{}", prefix, name);
        Ok(Self {
            id: row.try_get(col("id").as_str())?,
            title: row.try_get(col("title").as_str())?,
            caption: row.try_get(col("caption").as_str())?,
            photo_url: row.try_get(col("photo_url").as_str())?,
            user_id: row.try_get(col("user_id").as_str())?,
            created_at: row.try_get(col("created_at").as_str())?,
            updated_at: row.try_get(col("updated_at").as_str())?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for PhotoWithUser {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            photo: Photo::from_row(row)?,
            user: UserSummary::from_prefixed_row(row, "owner_")?,
        })
    }
}
