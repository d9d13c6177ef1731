use async_trait::async_trait;

use super::models::{
    Comment, CommentDetail, NewComment, NewPhoto, NewSocialMedia, NewUser, Photo, PhotoWithUser,
    SocialMedia, User,
};
use super::DatabaseError;

/// Persistence gateway shared by every handler.
///
/// `create_*` assigns ids and timestamps. `save_*` overwrites the editable
/// columns of an existing row, stamps `updated_at` and returns the stored row.
/// `delete_*` is a hard delete; dependent rows go with it.
/// Saves and deletes of a row that no longer exists fail with `DatabaseError::NotFound`.
#[async_trait]
pub trait Store: Send + Sync {
    async fn health_check(&self) -> Result<(), DatabaseError>;

    // Users
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError>;
    async fn find_user(&self, id: i64) -> Result<Option<User>, DatabaseError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
    async fn save_user(&self, user: &User) -> Result<User, DatabaseError>;
    async fn delete_user(&self, id: i64) -> Result<(), DatabaseError>;

    // Photos
    async fn create_photo(&self, photo: NewPhoto) -> Result<Photo, DatabaseError>;
    async fn list_photos(&self) -> Result<Vec<PhotoWithUser>, DatabaseError>;
    async fn find_photo(&self, id: i64) -> Result<Option<Photo>, DatabaseError>;
    async fn find_photo_with_user(&self, id: i64) -> Result<Option<PhotoWithUser>, DatabaseError>;
    async fn save_photo(&self, photo: &Photo) -> Result<Photo, DatabaseError>;
    async fn delete_photo(&self, id: i64) -> Result<(), DatabaseError>;

    // Comments
    async fn create_comment(&self, comment: NewComment) -> Result<Comment, DatabaseError>;
    async fn list_comments(&self) -> Result<Vec<CommentDetail>, DatabaseError>;
    async fn find_comment(&self, id: i64) -> Result<Option<Comment>, DatabaseError>;
    async fn find_comment_detail(&self, id: i64) -> Result<Option<CommentDetail>, DatabaseError>;
    async fn save_comment(&self, comment: &Comment) -> Result<Comment, DatabaseError>;
    async fn delete_comment(&self, id: i64) -> Result<(), DatabaseError>;

    // Social media, always filtered by owner on read
    async fn create_social_media(&self, entry: NewSocialMedia) -> Result<SocialMedia, DatabaseError>;
    async fn list_social_medias(&self, owner_id: i64) -> Result<Vec<SocialMedia>, DatabaseError>;
    async fn find_social_media(&self, id: i64, owner_id: i64) -> Result<Option<SocialMedia>, DatabaseError>;
    async fn save_social_media(&self, entry: &SocialMedia) -> Result<SocialMedia, DatabaseError>;
    async fn delete_social_media(&self, id: i64) -> Result<(), DatabaseError>;
}
