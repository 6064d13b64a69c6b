//! Wire models exchanged with the blog REST API

pub mod auth;
pub mod category;
pub mod comment;
pub mod post;
pub mod tag;
pub mod user;

// Re-export for convenience
pub use auth::{ErrorBody, LoginRequest, RefreshTokenRequest, RegisterRequest, TokenResponse};
pub use category::{Category, CategoryUpdate, NewCategory};
pub use comment::{Comment, CommentUpdate, NewComment};
pub use post::{NewPost, Post, PostStats, PostUpdate};
pub use tag::{NewTag, Tag, TagUpdate};
pub use user::User;
