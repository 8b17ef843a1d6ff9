use sqlx::PgPool;

use crate::{
    errors::AppError,
    models::{NewPost, Post},
};

pub async fn create_post(new_post: NewPost, postgres: &PgPool) -> Result<Post, AppError> {
    let post = sqlx::query_as::<_, Post>(
        "INSERT INTO posts (title, content)
        VALUES ($1, $2)
        RETURNING id, title, content, rating_avg, rating_count, created_at, updated_at",
    )
    .bind(&new_post.title)
    .bind(&new_post.content)
    .fetch_one(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to create post: {}", e)))?;

    tracing::info!("Created post: {} (ID: {})", post.display_title(), post.id);

    Ok(post)
}
