use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{postgres::PgRow, FromRow};

use super::photo::Photo;
use super::user::UserSummary;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Comment {
    pub id: i64,
    pub user_id: i64,
    pub photo_id: i64,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub user_id: i64,
    pub photo_id: i64,
    pub message: String,
}

/// Comment with its author and photo loaded
#[derive(Debug, Clone, Serialize)]
pub struct CommentDetail {
    #[serde(flatten)]
    pub comment: Comment,
    pub user: UserSummary,
    pub photo: Photo,
}

impl<'r> FromRow<'r, PgRow> for CommentDetail {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            comment: Comment::from_row(row)?,
            user: UserSummary::from_prefixed_row(row, "owner_")?,
            photo: Photo::from_prefixed_row(row, "photo_ref_")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_flattens_comment_fields() {
        let now = Utc::now();
        let detail = CommentDetail {
            comment: Comment {
                id: 3,
                user_id: 1,
                photo_id: 2,
                message: "nice".into(),
                created_at: now,
                updated_at: now,
            },
            user: UserSummary {
                id: 1,
                username: "alice".into(),
                email: "a@x.com".into(),
            },
            photo: Photo {
                id: 2,
                title: "sunset".into(),
                caption: String::new(),
                photo_url: "https://img/1.jpg".into(),
                user_id: 1,
                created_at: now,
                updated_at: now,
            },
        };

        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["message"], "nice");
        assert_eq!(value["user"]["username"], "alice");
        assert_eq!(value["photo"]["photo_url"], "https://img/1.jpg");
    }
}
