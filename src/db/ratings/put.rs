use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::{posts::update_rating_aggregate, ratings::rating_aggregate},
    errors::AppError,
    models::{Rating, RatingAggregate},
};

pub async fn upsert_rating(
    owner_id: Uuid,
    post_id: i64,
    rate: i16,
    postgres: &PgPool,
) -> Result<(Rating, RatingAggregate), AppError> {
    let mut tx = postgres
        .begin()
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to begin transaction: {}", e)))?;

    // Row lock on the post serializes concurrent submissions for it until commit.
    let locked = sqlx::query_scalar::<_, i64>("SELECT id FROM posts WHERE id = $1 FOR UPDATE")
        .bind(post_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to lock post {}: {}", post_id, e)))?;

    if locked.is_none() {
        return Err(AppError::NotFound(format!("Post {} not found", post_id)));
    }

    let rating = sqlx::query_as::<_, Rating>(
        "INSERT INTO ratings (owner_id, post_id, rate)
        VALUES ($1, $2, $3)
        ON CONFLICT (owner_id, post_id) DO UPDATE SET rate = EXCLUDED.rate
        RETURNING id, owner_id, post_id, rate",
    )
    .bind(owner_id)
    .bind(post_id)
    .bind(rate)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| match e.as_database_error() {
        // The post is locked, so the only foreign key that can fail is the owner.
        Some(db_err) if db_err.is_foreign_key_violation() => {
            AppError::Unauthorized(format!("User {} no longer exists", owner_id))
        }
        _ => AppError::DatabaseError(format!("Failed to upsert rating: {}", e)),
    })?;

    let aggregate = rating_aggregate(post_id, &mut *tx).await?;
    update_rating_aggregate(post_id, &aggregate, &mut *tx).await?;

    tx.commit()
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to commit rating: {}", e)))?;

    Ok((rating, aggregate))
}
