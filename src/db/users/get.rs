use sqlx::PgPool;
use uuid::Uuid;

use crate::{errors::AppError, models::User};

pub async fn get_user_by_username(
    username: &str,
    postgres: &PgPool,
) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, email, password_hash, created_at
        FROM users
        WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch user: {}", e)))?;

    Ok(user)
}

pub async fn get_user_by_id(user_id: Uuid, postgres: &PgPool) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, email, password_hash, created_at
        FROM users
        WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch user {}: {}", user_id, e)))?;

    Ok(user)
}
