use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::models::{
    Comment, CommentDetail, NewComment, NewPhoto, NewSocialMedia, NewUser, Photo, PhotoWithUser,
    SocialMedia, User, UserSummary,
};
use super::{DatabaseError, Store};

#[derive(Default)]
struct Tables {
    next_id: u64,
    users: BTreeMap<i64, User>,
    photos: BTreeMap<i64, Photo>,
    comments: BTreeMap<i64, Comment>,
    social_medias: BTreeMap<i64, SocialMedia>,
}

impl Tables {
    fn allocate(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id as i64
    }

    fn owner(&self, user_id: i64) -> Result<UserSummary, DatabaseError> {
        self.users
            .get(&user_id)
            .map(UserSummary::from)
            .ok_or_else(|| DatabaseError::NotFound("User not found".to_string()))
    }

    fn photo_with_user(&self, photo: &Photo) -> Result<PhotoWithUser, DatabaseError> {
        Ok(PhotoWithUser {
            photo: photo.clone(),
            user: self.owner(photo.user_id)?,
        })
    }

    fn comment_detail(&self, comment: &Comment) -> Result<CommentDetail, DatabaseError> {
        let photo = self
            .photos
            .get(&comment.photo_id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound("Photo not found".to_string()))?;
        Ok(CommentDetail {
            comment: comment.clone(),
            user: self.owner(comment.user_id)?,
            photo,
        })
    }

    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }

    fn remove_photo_cascade(&mut self, photo_id: i64) {
        self.photos.remove(&photo_id);
        self.comments.retain(|_, c| c.photo_id != photo_id);
    }
}

/// Process-local store with the same contract as the Postgres store.
/// Backs the HTTP tests and local runs without a database.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(&user.email, None) {
            return Err(DatabaseError::Conflict("Email already registered".to_string()));
        }

        let now = Utc::now();
        let created = User {
            id: tables.allocate(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            age: user.age,
            profile_image_url: user.profile_image_url,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn save_user(&self, user: &User) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(&user.email, Some(user.id)) {
            return Err(DatabaseError::Conflict("Email already registered".to_string()));
        }

        let stored = tables
            .users
            .get_mut(&user.id)
            .ok_or_else(|| DatabaseError::NotFound("User not found".to_string()))?;
        stored.username = user.username.clone();
        stored.email = user.email.clone();
        stored.age = user.age;
        stored.profile_image_url = user.profile_image_url.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete_user(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Err(DatabaseError::NotFound("User not found".to_string()));
        }

        let owned_photos: Vec<i64> = tables
            .photos
            .values()
            .filter(|p| p.user_id == id)
            .map(|p| p.id)
            .collect();
        for photo_id in owned_photos {
            tables.remove_photo_cascade(photo_id);
        }
        tables.comments.retain(|_, c| c.user_id != id);
        tables.social_medias.retain(|_, s| s.user_id != id);
        Ok(())
    }

    async fn create_photo(&self, photo: NewPhoto) -> Result<Photo, DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.owner(photo.user_id)?;

        let now = Utc::now();
        let created = Photo {
            id: tables.allocate(),
            title: photo.title,
            caption: photo.caption,
            photo_url: photo.photo_url,
            user_id: photo.user_id,
            created_at: now,
            updated_at: now,
        };
        tables.photos.insert(created.id, created.clone());
        Ok(created)
    }

    async fn list_photos(&self) -> Result<Vec<PhotoWithUser>, DatabaseError> {
        let tables = self.tables.read().await;
        tables
            .photos
            .values()
            .map(|p| tables.photo_with_user(p))
            .collect()
    }

    async fn find_photo(&self, id: i64) -> Result<Option<Photo>, DatabaseError> {
        Ok(self.tables.read().await.photos.get(&id).cloned())
    }

    async fn find_photo_with_user(&self, id: i64) -> Result<Option<PhotoWithUser>, DatabaseError> {
        let tables = self.tables.read().await;
        tables
            .photos
            .get(&id)
            .map(|p| tables.photo_with_user(p))
            .transpose()
    }

    async fn save_photo(&self, photo: &Photo) -> Result<Photo, DatabaseError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .photos
            .get_mut(&photo.id)
            .ok_or_else(|| DatabaseError::NotFound("Photo not found".to_string()))?;
        stored.title = photo.title.clone();
        stored.caption = photo.caption.clone();
        stored.photo_url = photo.photo_url.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete_photo(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.photos.contains_key(&id) {
            return Err(DatabaseError::NotFound("Photo not found".to_string()));
        }
        tables.remove_photo_cascade(id);
        Ok(())
    }

    async fn create_comment(&self, comment: NewComment) -> Result<Comment, DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.owner(comment.user_id)?;
        if !tables.photos.contains_key(&comment.photo_id) {
            return Err(DatabaseError::NotFound("Photo not found".to_string()));
        }

        let now = Utc::now();
        let created = Comment {
            id: tables.allocate(),
            user_id: comment.user_id,
            photo_id: comment.photo_id,
            message: comment.message,
            created_at: now,
            updated_at: now,
        };
        tables.comments.insert(created.id, created.clone());
        Ok(created)
    }

    async fn list_comments(&self) -> Result<Vec<CommentDetail>, DatabaseError> {
        let tables = self.tables.read().await;
        tables
            .comments
            .values()
            .map(|c| tables.comment_detail(c))
            .collect()
    }

    async fn find_comment(&self, id: i64) -> Result<Option<Comment>, DatabaseError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn find_comment_detail(&self, id: i64) -> Result<Option<CommentDetail>, DatabaseError> {
        let tables = self.tables.read().await;
        tables
            .comments
            .get(&id)
            .map(|c| tables.comment_detail(c))
            .transpose()
    }

    async fn save_comment(&self, comment: &Comment) -> Result<Comment, DatabaseError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .comments
            .get_mut(&comment.id)
            .ok_or_else(|| DatabaseError::NotFound("Comment not found".to_string()))?;
        stored.message = comment.message.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete_comment(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        tables
            .comments
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DatabaseError::NotFound("Comment not found".to_string()))
    }

    async fn create_social_media(&self, entry: NewSocialMedia) -> Result<SocialMedia, DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.owner(entry.user_id)?;

        let now = Utc::now();
        let created = SocialMedia {
            id: tables.allocate(),
            name: entry.name,
            social_media_url: entry.social_media_url,
            user_id: entry.user_id,
            created_at: now,
            updated_at: now,
        };
        tables.social_medias.insert(created.id, created.clone());
        Ok(created)
    }

    async fn list_social_medias(&self, owner_id: i64) -> Result<Vec<SocialMedia>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .social_medias
            .values()
            .filter(|s| s.user_id == owner_id)
            .cloned()
            .collect())
    }

    async fn find_social_media(&self, id: i64, owner_id: i64) -> Result<Option<SocialMedia>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .social_medias
            .get(&id)
            .filter(|s| s.user_id == owner_id)
            .cloned())
    }

    async fn save_social_media(&self, entry: &SocialMedia) -> Result<SocialMedia, DatabaseError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .social_medias
            .get_mut(&entry.id)
            .ok_or_else(|| DatabaseError::NotFound("Social media entry not found".to_string()))?;
        stored.name = entry.name.clone();
        stored.social_media_url = entry.social_media_url.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete_social_media(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        tables
            .social_medias
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DatabaseError::NotFound("Social media entry not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            username: email.split('@').next().unwrap_or_default().to_string(),
            email: email.to_string(),
            password_hash: "digest".to_string(),
            age: 20,
            profile_image_url: String::new(),
        }
    }

    fn new_photo(user_id: i64) -> NewPhoto {
        NewPhoto {
            title: "sunset".to_string(),
            caption: "beach".to_string(),
            photo_url: "https://img/1.jpg".to_string(),
            user_id,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = MemoryStore::new();
        store.create_user(new_user("a@x.com")).await.unwrap();

        let err = store.create_user(new_user("a@x.com")).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
    }

    #[tokio::test]
    async fn save_cannot_take_another_users_email() {
        let store = MemoryStore::new();
        store.create_user(new_user("a@x.com")).await.unwrap();
        let mut bob = store.create_user(new_user("b@x.com")).await.unwrap();

        bob.email = "a@x.com".to_string();
        let err = store.save_user(&bob).await.unwrap_err();
        assert_eq!(err.to_string(), "Email already registered");
    }

    #[tokio::test]
    async fn save_stamps_updated_at_and_keeps_created_at() {
        let store = MemoryStore::new();
        let mut user = store.create_user(new_user("a@x.com")).await.unwrap();
        let created_at = user.created_at;

        user.username = "renamed".to_string();
        let saved = store.save_user(&user).await.unwrap();
        assert_eq!(saved.username, "renamed");
        assert_eq!(saved.created_at, created_at);
        assert!(saved.updated_at >= created_at);
    }

    #[tokio::test]
    async fn deleting_a_user_cascades() {
        let store = MemoryStore::new();
        let alice = store.create_user(new_user("a@x.com")).await.unwrap();
        let bob = store.create_user(new_user("b@x.com")).await.unwrap();

        let photo = store.create_photo(new_photo(alice.id)).await.unwrap();
        let bob_photo = store.create_photo(new_photo(bob.id)).await.unwrap();
        store
            .create_comment(NewComment { user_id: bob.id, photo_id: photo.id, message: "hi".into() })
            .await
            .unwrap();
        let alice_on_bob = store
            .create_comment(NewComment { user_id: alice.id, photo_id: bob_photo.id, message: "yo".into() })
            .await
            .unwrap();
        store
            .create_social_media(NewSocialMedia {
                name: "site".into(),
                social_media_url: "https://a.example".into(),
                user_id: alice.id,
            })
            .await
            .unwrap();

        store.delete_user(alice.id).await.unwrap();

        assert!(store.find_photo(photo.id).await.unwrap().is_none());
        assert!(store.find_comment(alice_on_bob.id).await.unwrap().is_none());
        assert!(store.list_comments().await.unwrap().is_empty());
        assert!(store.list_social_medias(alice.id).await.unwrap().is_empty());
        assert_eq!(store.list_photos().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn comment_on_missing_photo_is_not_found() {
        let store = MemoryStore::new();
        let alice = store.create_user(new_user("a@x.com")).await.unwrap();

        let err = store
            .create_comment(NewComment { user_id: alice.id, photo_id: 999, message: "hi".into() })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Photo not found");
    }

    #[tokio::test]
    async fn social_media_reads_are_owner_scoped() {
        let store = MemoryStore::new();
        let alice = store.create_user(new_user("a@x.com")).await.unwrap();
        let bob = store.create_user(new_user("b@x.com")).await.unwrap();

        let entry = store
            .create_social_media(NewSocialMedia {
                name: "site".into(),
                social_media_url: "https://a.example".into(),
                user_id: alice.id,
            })
            .await
            .unwrap();

        assert!(store.find_social_media(entry.id, alice.id).await.unwrap().is_some());
        assert!(store.find_social_media(entry.id, bob.id).await.unwrap().is_none());
        assert!(store.list_social_medias(bob.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_rows_are_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(store.delete_photo(1).await, Err(DatabaseError::NotFound(_))));
        assert!(matches!(store.delete_comment(1).await, Err(DatabaseError::NotFound(_))));
        assert!(matches!(store.delete_user(1).await, Err(DatabaseError::NotFound(_))));
    }
}
