use serde::Serialize;

use crate::{
    auth::{generate_jwt, hash_password, verify_password},
    config::Config,
    db::Store,
    errors::AppError,
    models::NewUser,
};

const MAX_USERNAME_LEN: usize = 150;

#[derive(Debug, Serialize)]
pub struct Registered {
    pub username: String,
    pub email: String,
    pub token: String,
}

pub async fn register(
    store: &dyn Store,
    config: &Config,
    username: String,
    email: String,
    password: String,
) -> Result<Registered, AppError> {
    let username = username.trim().to_string();
    let email = email.trim().to_string();

    if username.is_empty() || username.len() > MAX_USERNAME_LEN {
        return Err(AppError::BadRequest(format!(
            "Username must be between 1 and {} characters",
            MAX_USERNAME_LEN
        )));
    }
    if !email.contains('@') {
        return Err(AppError::BadRequest("Enter a valid email address".into()));
    }
    if password.is_empty() {
        return Err(AppError::BadRequest("Password may not be blank".into()));
    }

    let password_hash = hash_password(&password)?;
    let user = store
        .create_user(NewUser {
            username,
            email,
            password_hash,
        })
        .await?;

    let token = generate_jwt(&user, &config.jwt_secret, config.jwt_ttl_hours)?;

    Ok(Registered {
        username: user.username,
        email: user.email,
        token,
    })
}

pub async fn login(
    store: &dyn Store,
    config: &Config,
    username: &str,
    password: &str,
) -> Result<String, AppError> {
    let invalid = || AppError::Unauthorized("Invalid username or password".into());

    let user = store
        .get_user_by_username(username.trim())
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(password, &user.password_hash)? {
        return Err(invalid());
    }

    generate_jwt(&user, &config.jwt_secret, config.jwt_ttl_hours)
}
