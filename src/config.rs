use std::str::FromStr;

use crate::errors::AppError;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_JWT_TTL_HOURS: i64 = 24;
const MAX_JWT_TTL_HOURS: i64 = 24 * 365;
const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 1000;
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub rate_limit_per_minute: u32,
    pub rating_policy: RatingPolicy,
}

/// Accepted range for submitted star values.
///
/// Posts are rated on a 1 to 5 scale, but a submitted 0 has always been
/// accepted and stored as a regular rating that pulls the average down.
/// Whether 0 is a legitimate value is a product decision, so it stays
/// switchable through `ALLOW_ZERO_RATING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingPolicy {
    pub allow_zero: bool,
}

impl RatingPolicy {
    pub const MAX: i64 = 5;

    pub fn min(&self) -> i64 {
        if self.allow_zero { 0 } else { 1 }
    }

    pub fn accepts(&self, value: i64) -> bool {
        (self.min()..=Self::MAX).contains(&value)
    }
}

impl Default for RatingPolicy {
    fn default() -> Self {
        Self { allow_zero: true }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| AppError::EnvError("JWT_SECRET must be set".into()))?;

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            database_url,
            database_max_connections: env_or("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            jwt_secret,
            jwt_ttl_hours: check_jwt_ttl(env_or("JWT_TTL_HOURS", DEFAULT_JWT_TTL_HOURS)?)?,
            port: env_or("PORT", DEFAULT_PORT)?,
            allowed_origins,
            rate_limit_per_minute: env_or("RATE_LIMIT_PER_MINUTE", DEFAULT_RATE_LIMIT_PER_MINUTE)?,
            rating_policy: RatingPolicy {
                allow_zero: env_or("ALLOW_ZERO_RATING", true)?,
            },
        })
    }

    /// Settings for tests and local tooling: in-memory store, fixed secret.
    pub fn for_tests() -> Self {
        Self {
            database_url: None,
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
            jwt_secret: "test-secret".into(),
            jwt_ttl_hours: DEFAULT_JWT_TTL_HOURS,
            port: DEFAULT_PORT,
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGINS.into()],
            rate_limit_per_minute: DEFAULT_RATE_LIMIT_PER_MINUTE,
            rating_policy: RatingPolicy::default(),
        }
    }
}

fn check_jwt_ttl(hours: i64) -> Result<i64, AppError> {
    if (1..=MAX_JWT_TTL_HOURS).contains(&hours) {
        Ok(hours)
    } else {
        Err(AppError::EnvError(format!(
            "JWT_TTL_HOURS must be between 1 and {}, got {}",
            MAX_JWT_TTL_HOURS, hours
        )))
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::EnvError(format!("Invalid value for {}: {}", key, raw))),
        Err(_) => Ok(default),
    }
}
