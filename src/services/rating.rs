use uuid::Uuid;

use crate::{config::RatingPolicy, db::Store, errors::AppError, models::Rating};

/// Records `user_id`'s star value for a post and refreshes the post's
/// cached average and count.
///
/// Out-of-range values fail with [`AppError::InvalidRatingValue`] before
/// anything is written. Callers are expected to have authenticated the
/// user and resolved the post already.
pub async fn submit_rating(
    store: &dyn Store,
    policy: RatingPolicy,
    user_id: Uuid,
    post_id: i64,
    rate_value: i64,
) -> Result<Rating, AppError> {
    if !policy.accepts(rate_value) {
        return Err(AppError::InvalidRatingValue {
            value: rate_value,
            min: policy.min(),
            max: RatingPolicy::MAX,
        });
    }

    // Bounded by the policy check above.
    let rate = i16::try_from(rate_value).map_err(|_| AppError::InternalError)?;

    let (rating, aggregate) = store.upsert_rating(user_id, post_id, rate).await?;

    tracing::info!(
        "User {} rated post {} with {} (avg: {}, count: {})",
        user_id,
        post_id,
        rating.rate,
        aggregate.avg,
        aggregate.count
    );

    Ok(rating)
}
