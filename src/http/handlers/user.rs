use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::{
    errors::AppError,
    http::extract::JsonBody,
    services::account::{self, Registered},
    state::AppState,
};

#[derive(Deserialize)]
pub struct RegisterPayload {
    pub username: String,
    pub password: String,
    pub email: String,
}

pub async fn register_handler(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterPayload>,
) -> Result<(StatusCode, Json<Registered>), AppError> {
    match account::register(
        state.store.as_ref(),
        &state.config,
        payload.username,
        payload.email,
        payload.password,
    )
    .await
    {
        Ok(registered) => {
            tracing::info!("User registered: {}", registered.username);
            Ok((StatusCode::CREATED, Json(registered)))
        }
        Err(err) => {
            tracing::error!("Error registering user: {}", err);
            Err(err)
        }
    }
}

#[derive(Deserialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

pub async fn login_handler(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginPayload>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = account::login(
        state.store.as_ref(),
        &state.config,
        &payload.username,
        &payload.password,
    )
    .await
    .map_err(|e| {
        tracing::warn!("Login failed for {}: {}", payload.username, e);
        e
    })?;

    Ok(Json(TokenResponse { token }))
}
