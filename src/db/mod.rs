pub mod memory;
pub mod pool;
pub mod posts;
pub mod ratings;
pub mod users;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{NewPost, NewUser, Post, PostView, Rating, RatingAggregate, User},
};

pub use memory::MemoryStore;
pub use pool::PgStore;

/// Persistence used by the HTTP layer and the rating service.
#[async_trait]
pub trait Store: Send + Sync {
    /// All posts ordered by id, with `viewer`'s own rate filled in.
    async fn list_posts(&self, viewer: Option<Uuid>) -> Result<Vec<PostView>, AppError>;

    async fn get_post(&self, post_id: i64) -> Result<Option<Post>, AppError>;

    async fn create_post(&self, new_post: NewPost) -> Result<Post, AppError>;

    async fn get_rating(&self, owner_id: Uuid, post_id: i64) -> Result<Option<Rating>, AppError>;

    /// Creates or overwrites the `(owner_id, post_id)` rating, recomputes
    /// the post's aggregate from all of its ratings and stores it on the
    /// post. The three steps are serialized per post and either all apply
    /// or none do. An unknown owner fails with `AppError::Unauthorized`.
    async fn upsert_rating(
        &self,
        owner_id: Uuid,
        post_id: i64,
        rate: i16,
    ) -> Result<(Rating, RatingAggregate), AppError>;

    /// Fails with `AppError::Conflict` when the username is taken.
    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError>;

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, AppError>;
}
