use async_trait::async_trait;
use sqlx::{PgPool, postgres::PgPoolOptions};
use uuid::Uuid;

use crate::{
    db::{Store, posts, ratings, users},
    errors::AppError,
    models::{NewPost, NewUser, Post, PostView, Rating, RatingAggregate, User},
};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to connect to Postgres: {}", e)))?;

        Self::from_pool(pool).await
    }

    /// Wraps an existing pool, applying pending migrations first.
    async fn from_pool(pool: PgPool) -> Result<Self, AppError> {
        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to run migrations: {}", e)))?;

        tracing::info!("Connected to Postgres and applied migrations");

        Ok(Self { pool })
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list_posts(&self, viewer: Option<Uuid>) -> Result<Vec<PostView>, AppError> {
        posts::get::list_posts(viewer, &self.pool).await
    }

    async fn get_post(&self, post_id: i64) -> Result<Option<Post>, AppError> {
        posts::get::get_post_by_id(post_id, &self.pool).await
    }

    async fn create_post(&self, new_post: NewPost) -> Result<Post, AppError> {
        posts::post::create_post(new_post, &self.pool).await
    }

    async fn get_rating(&self, owner_id: Uuid, post_id: i64) -> Result<Option<Rating>, AppError> {
        ratings::get::get_rating(owner_id, post_id, &self.pool).await
    }

    async fn upsert_rating(
        &self,
        owner_id: Uuid,
        post_id: i64,
        rate: i16,
    ) -> Result<(Rating, RatingAggregate), AppError> {
        ratings::put::upsert_rating(owner_id, post_id, rate, &self.pool).await
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError> {
        users::post::create_user(new_user, &self.pool).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        users::get::get_user_by_username(username, &self.pool).await
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        users::get::get_user_by_id(user_id, &self.pool).await
    }
}
