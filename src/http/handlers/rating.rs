use axum::{Json, extract::State};
use serde::Deserialize;
use std::num::IntErrorKind;
use serde_json::Value;

use crate::{
    auth::AuthClaims,
    errors::AppError,
    http::extract::{JsonBody, PathParam},
    models::Rating,
    services::submit_rating,
    state::AppState,
};

#[derive(Deserialize)]
pub struct RatePostPayload {
    #[serde(default)]
    pub rate: Option<Value>,
}

/// Responds with the stored rating, or `null` when the body carried no
/// rate at all.
pub async fn rate_post_handler(
    State(state): State<AppState>,
    claims: AuthClaims,
    PathParam(post_id): PathParam<i64>,
    JsonBody(payload): JsonBody<RatePostPayload>,
) -> Result<Json<Option<Rating>>, AppError> {
    let user_id = claims.user_id()?;

    if state.store.get_post(post_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Post {} not found", post_id)));
    }

    let Some(raw) = payload.rate.filter(|v| !v.is_null()) else {
        return Ok(Json(None));
    };

    let rate_value = parse_rate(&raw)?;

    let rating = submit_rating(
        state.store.as_ref(),
        state.config.rating_policy,
        user_id,
        post_id,
        rate_value,
    )
    .await
    .map_err(|e| {
        tracing::warn!("Rating of post {} by {} rejected: {}", post_id, user_id, e);
        e
    })?;

    Ok(Json(Some(rating)))
}

/// Accepts JSON integers and strings holding an integer. Integers too large
/// for `i64` saturate so the range check reports them as out of range.
pub fn parse_rate(raw: &Value) -> Result<i64, AppError> {
    let not_integer = || AppError::BadRequest("Failed, the rate number should be an integer.".into());

    match raw {
        Value::Number(n) => {
            if let Some(v) = n.as_i64() {
                Ok(v)
            } else if n.is_u64() {
                Ok(i64::MAX)
            } else {
                // serde_json falls back to f64 for integers beyond the u64/i64 range.
                match n.as_f64() {
                    Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() >= I64_BOUND => {
                        Ok(if f.is_sign_negative() { i64::MIN } else { i64::MAX })
                    }
                    _ => Err(not_integer()),
                }
            }
        }
        Value::String(s) => match s.trim().parse::<i64>() {
            Ok(v) => Ok(v),
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow => Ok(i64::MAX),
                IntErrorKind::NegOverflow => Ok(i64::MIN),
                _ => Err(not_integer()),
            },
        },
        _ => Err(not_integer()),
    }
}

// 2^63
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integers_and_numeric_strings_parse() {
        assert_eq!(parse_rate(&json!(4)).ok(), Some(4));
        assert_eq!(parse_rate(&json!("3")).ok(), Some(3));
        assert_eq!(parse_rate(&json!(" 5 ")).ok(), Some(5));
        assert_eq!(parse_rate(&json!(-1)).ok(), Some(-1));
    }

    #[test]
    fn oversized_integers_saturate() {
        assert_eq!(parse_rate(&json!(u64::MAX)).ok(), Some(i64::MAX));
        assert_eq!(parse_rate(&json!("18446744073709551615")).ok(), Some(i64::MAX));
        assert_eq!(parse_rate(&json!("-99999999999999999999")).ok(), Some(i64::MIN));
        let huge: Value = serde_json::from_str("-99999999999999999999").expect("valid JSON");
        assert_eq!(parse_rate(&huge).ok(), Some(i64::MIN));
    }

    #[test]
    fn non_integers_are_bad_requests() {
        for raw in [json!("abc"), json!(2.5), json!(true), json!([3])] {
            assert!(matches!(parse_rate(&raw), Err(AppError::BadRequest(_))));
        }
    }
}
