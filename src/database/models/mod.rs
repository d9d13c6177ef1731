pub mod comment;
pub mod photo;
pub mod social_media;
pub mod user;

pub use comment::{Comment, CommentDetail, NewComment};
pub use photo::{NewPhoto, Photo, PhotoWithUser};
pub use social_media::{NewSocialMedia, SocialMedia};
pub use user::{NewUser, User, UserSummary};
