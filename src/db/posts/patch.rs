use sqlx::PgConnection;

use crate::{errors::AppError, models::RatingAggregate};

/// Overwrites the cached aggregate columns of a post.
pub async fn update_rating_aggregate(
    post_id: i64,
    aggregate: &RatingAggregate,
    conn: &mut PgConnection,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE posts
        SET rating_avg = $2, rating_count = $3, updated_at = NOW()
        WHERE id = $1",
    )
    .bind(post_id)
    .bind(aggregate.avg)
    .bind(aggregate.count)
    .execute(&mut *conn)
    .await
    .map_err(|e| {
        AppError::DatabaseError(format!("Failed to update rating of post {}: {}", post_id, e))
    })?;

    Ok(())
}
