use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{NewUser, User},
};

pub async fn create_user(new_user: NewUser, postgres: &PgPool) -> Result<User, AppError> {
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (id, username, email, password_hash)
        VALUES ($1, $2, $3, $4)
        RETURNING id, username, email, password_hash, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(&new_user.username)
    .bind(&new_user.email)
    .bind(&new_user.password_hash)
    .fetch_one(postgres)
    .await
    .map_err(|e| match e.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => AppError::Conflict(format!(
            "Username '{}' is already taken",
            new_user.username
        )),
        _ => AppError::DatabaseError(format!("Failed to create user: {}", e)),
    })?;

    tracing::info!("Created user: {} (ID: {})", user.username, user.id);

    Ok(user)
}
