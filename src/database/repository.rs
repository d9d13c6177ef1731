use async_trait::async_trait;
use sqlx::{error::ErrorKind, PgPool};

use super::models::{
    Comment, CommentDetail, NewComment, NewPhoto, NewSocialMedia, NewUser, Photo, PhotoWithUser,
    SocialMedia, User,
};
use super::{DatabaseError, Store};

const USER_COLUMNS: &str =
    "id, username, email, password_hash, age, profile_image_url, created_at, updated_at";
const PHOTO_COLUMNS: &str = "id, title, caption, photo_url, user_id, created_at, updated_at";
const COMMENT_COLUMNS: &str = "id, user_id, photo_id, message, created_at, updated_at";
const SOCIAL_MEDIA_COLUMNS: &str = "id, name, social_media_url, user_id, created_at, updated_at";

const PHOTO_WITH_USER: &str = r#"
    SELECT p.id, p.title, p.caption, p.photo_url, p.user_id, p.created_at, p.updated_at,
           u.id AS owner_id, u.username AS owner_username, u.email AS owner_email
    FROM photos p
    JOIN users u ON u.id = p.user_id
"#;

const COMMENT_DETAIL: &str = r#"
    SELECT c.id, c.user_id, c.photo_id, c.message, c.created_at, c.updated_at,
           u.id AS owner_id, u.username AS owner_username, u.email AS owner_email,
           p.id AS photo_ref_id, p.title AS photo_ref_title, p.caption AS photo_ref_caption,
           p.photo_url AS photo_ref_photo_url, p.user_id AS photo_ref_user_id,
           p.created_at AS photo_ref_created_at, p.updated_at AS photo_ref_updated_at
    FROM comments c
    JOIN users u ON u.id = c.user_id
    JOIN photos p ON p.id = c.photo_id
"#;

/// Postgres-backed store over a shared, bounded pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Translate constraint violations on insert/update into client-facing errors.
fn write_error(err: sqlx::Error) -> DatabaseError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.kind() {
            ErrorKind::UniqueViolation => {
                return DatabaseError::Conflict("Email already registered".to_string());
            }
            ErrorKind::ForeignKeyViolation => {
                let message = match db_err.constraint() {
                    Some(name) if name.contains("photo_id") => "Photo not found",
                    _ => "User not found",
                };
                return DatabaseError::NotFound(message.to_string());
            }
            _ => {}
        }
    }
    DatabaseError::Sqlx(err)
}

fn require_deleted(rows_affected: u64, what: &str) -> Result<(), DatabaseError> {
    if rows_affected == 0 {
        Err(DatabaseError::NotFound(format!("{} not found", what)))
    } else {
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash, age, profile_image_url) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.age)
            .bind(&user.profile_image_url)
            .fetch_one(&self.pool)
            .await
            .map_err(write_error)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn save_user(&self, user: &User) -> Result<User, DatabaseError> {
        let sql = format!(
            "UPDATE users SET username = $2, email = $3, age = $4, profile_image_url = $5, \
             updated_at = now() WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.username)
            .bind(&user.email)
            .bind(user.age)
            .bind(&user.profile_image_url)
            .fetch_optional(&self.pool)
            .await
            .map_err(write_error)?
            .ok_or_else(|| DatabaseError::NotFound("User not found".to_string()))
    }

    async fn delete_user(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        require_deleted(result.rows_affected(), "User")
    }

    async fn create_photo(&self, photo: NewPhoto) -> Result<Photo, DatabaseError> {
        let sql = format!(
            "INSERT INTO photos (title, caption, photo_url, user_id) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            PHOTO_COLUMNS
        );
        sqlx::query_as::<_, Photo>(&sql)
            .bind(&photo.title)
            .bind(&photo.caption)
            .bind(&photo.photo_url)
            .bind(photo.user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(write_error)
    }

    async fn list_photos(&self) -> Result<Vec<PhotoWithUser>, DatabaseError> {
        let sql = format!("{} ORDER BY p.id", PHOTO_WITH_USER);
        let photos = sqlx::query_as::<_, PhotoWithUser>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(photos)
    }

    async fn find_photo(&self, id: i64) -> Result<Option<Photo>, DatabaseError> {
        let sql = format!("SELECT {} FROM photos WHERE id = $1", PHOTO_COLUMNS);
        let photo = sqlx::query_as::<_, Photo>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(photo)
    }

    async fn find_photo_with_user(&self, id: i64) -> Result<Option<PhotoWithUser>, DatabaseError> {
        let sql = format!("{} WHERE p.id = $1", PHOTO_WITH_USER);
        let photo = sqlx::query_as::<_, PhotoWithUser>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(photo)
    }

    async fn save_photo(&self, photo: &Photo) -> Result<Photo, DatabaseError> {
        let sql = format!(
            "UPDATE photos SET title = $2, caption = $3, photo_url = $4, updated_at = now() \
             WHERE id = $1 RETURNING {}",
            PHOTO_COLUMNS
        );
        sqlx::query_as::<_, Photo>(&sql)
            .bind(photo.id)
            .bind(&photo.title)
            .bind(&photo.caption)
            .bind(&photo.photo_url)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Photo not found".to_string()))
    }

    async fn delete_photo(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM photos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        require_deleted(result.rows_affected(), "Photo")
    }

    async fn create_comment(&self, comment: NewComment) -> Result<Comment, DatabaseError> {
        let sql = format!(
            "INSERT INTO comments (user_id, photo_id, message) VALUES ($1, $2, $3) RETURNING {}",
            COMMENT_COLUMNS
        );
        sqlx::query_as::<_, Comment>(&sql)
            .bind(comment.user_id)
            .bind(comment.photo_id)
            .bind(&comment.message)
            .fetch_one(&self.pool)
            .await
            .map_err(write_error)
    }

    async fn list_comments(&self) -> Result<Vec<CommentDetail>, DatabaseError> {
        let sql = format!("{} ORDER BY c.id", COMMENT_DETAIL);
        let comments = sqlx::query_as::<_, CommentDetail>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(comments)
    }

    async fn find_comment(&self, id: i64) -> Result<Option<Comment>, DatabaseError> {
        let sql = format!("SELECT {} FROM comments WHERE id = $1", COMMENT_COLUMNS);
        let comment = sqlx::query_as::<_, Comment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(comment)
    }

    async fn find_comment_detail(&self, id: i64) -> Result<Option<CommentDetail>, DatabaseError> {
        let sql = format!("{} WHERE c.id = $1", COMMENT_DETAIL);
        let comment = sqlx::query_as::<_, CommentDetail>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(comment)
    }

    async fn save_comment(&self, comment: &Comment) -> Result<Comment, DatabaseError> {
        let sql = format!(
            "UPDATE comments SET message = $2, updated_at = now() WHERE id = $1 RETURNING {}",
            COMMENT_COLUMNS
        );
        sqlx::query_as::<_, Comment>(&sql)
            .bind(comment.id)
            .bind(&comment.message)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Comment not found".to_string()))
    }

    async fn delete_comment(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        require_deleted(result.rows_affected(), "Comment")
    }

    async fn create_social_media(&self, entry: NewSocialMedia) -> Result<SocialMedia, DatabaseError> {
        let sql = format!(
            "INSERT INTO social_medias (name, social_media_url, user_id) VALUES ($1, $2, $3) RETURNING {}",
            SOCIAL_MEDIA_COLUMNS
        );
        sqlx::query_as::<_, SocialMedia>(&sql)
            .bind(&entry.name)
            .bind(&entry.social_media_url)
            .bind(entry.user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(write_error)
    }

    async fn list_social_medias(&self, owner_id: i64) -> Result<Vec<SocialMedia>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM social_medias WHERE user_id = $1 ORDER BY id",
            SOCIAL_MEDIA_COLUMNS
        );
        let entries = sqlx::query_as::<_, SocialMedia>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(entries)
    }

    async fn find_social_media(&self, id: i64, owner_id: i64) -> Result<Option<SocialMedia>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM social_medias WHERE user_id = $1 AND id = $2",
            SOCIAL_MEDIA_COLUMNS
        );
        let entry = sqlx::query_as::<_, SocialMedia>(&sql)
            .bind(owner_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(entry)
    }

    async fn save_social_media(&self, entry: &SocialMedia) -> Result<SocialMedia, DatabaseError> {
        let sql = format!(
            "UPDATE social_medias SET name = $2, social_media_url = $3, updated_at = now() \
             WHERE id = $1 RETURNING {}",
            SOCIAL_MEDIA_COLUMNS
        );
        sqlx::query_as::<_, SocialMedia>(&sql)
            .bind(entry.id)
            .bind(&entry.name)
            .bind(&entry.social_media_url)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Social media entry not found".to_string()))
    }

    async fn delete_social_media(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM social_medias WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        require_deleted(result.rows_affected(), "Social media entry")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deleting_nothing_is_not_found() {
        let err = require_deleted(0, "Photo").unwrap_err();
        assert_eq!(err.to_string(), "Photo not found");
        assert!(require_deleted(1, "Photo").is_ok());
    }

    #[test]
    fn non_constraint_errors_pass_through() {
        assert!(matches!(write_error(sqlx::Error::RowNotFound), DatabaseError::Sqlx(_)));
    }
}
