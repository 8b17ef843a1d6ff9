use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{Post, PostView},
};

pub async fn list_posts(viewer: Option<Uuid>, postgres: &PgPool) -> Result<Vec<PostView>, AppError> {
    // A NULL viewer never matches the join, leaving user_rating NULL.
    let posts = sqlx::query_as::<_, PostView>(
        "SELECT p.id, p.title, p.content, p.rating_avg, p.rating_count, r.rate AS user_rating
        FROM posts p
        LEFT JOIN ratings r ON r.post_id = p.id AND r.owner_id = $1
        ORDER BY p.id",
    )
    .bind(viewer)
    .fetch_all(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to list posts: {}", e)))?;

    Ok(posts)
}

pub async fn get_post_by_id(post_id: i64, postgres: &PgPool) -> Result<Option<Post>, AppError> {
    let post = sqlx::query_as::<_, Post>(
        "SELECT id, title, content, rating_avg, rating_count, created_at, updated_at
        FROM posts
        WHERE id = $1",
    )
    .bind(post_id)
    .fetch_optional(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch post {}: {}", post_id, e)))?;

    Ok(post)
}
