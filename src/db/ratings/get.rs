use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{Rating, RatingAggregate},
};

pub async fn get_rating(
    owner_id: Uuid,
    post_id: i64,
    postgres: &PgPool,
) -> Result<Option<Rating>, AppError> {
    let rating = sqlx::query_as::<_, Rating>(
        "SELECT id, owner_id, post_id, rate
        FROM ratings
        WHERE owner_id = $1 AND post_id = $2",
    )
    .bind(owner_id)
    .bind(post_id)
    .fetch_optional(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch rating: {}", e)))?;

    Ok(rating)
}

/// Mean and count over every rating of the post.
pub async fn rating_aggregate(
    post_id: i64,
    conn: &mut PgConnection,
) -> Result<RatingAggregate, AppError> {
    let (avg, count) = sqlx::query_as::<_, (Option<Decimal>, i64)>(
        "SELECT AVG(rate), COUNT(*)
        FROM ratings
        WHERE post_id = $1",
    )
    .bind(post_id)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| {
        AppError::DatabaseError(format!("Failed to aggregate ratings of post {}: {}", post_id, e))
    })?;

    Ok(RatingAggregate::from_query(avg, count))
}
