use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Decimal places kept in `posts.rating_avg`, matching `NUMERIC(6,3)`.
pub const AVG_SCALE: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Rating {
    pub id: i64,
    pub owner_id: Uuid,
    pub post_id: i64,
    pub rate: i16,
}

/// Cached `(rating_avg, rating_count)` pair of a post.
///
/// Always built from the complete set of ratings of the post, never
/// adjusted incrementally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RatingAggregate {
    pub avg: Decimal,
    pub count: i64,
}

impl RatingAggregate {
    /// A post nobody has rated.
    pub const EMPTY: Self = Self {
        avg: Decimal::ZERO,
        count: 0,
    };

    pub fn from_rates<I>(rates: I) -> Self
    where
        I: IntoIterator<Item = i16>,
    {
        let (sum, count) = rates
            .into_iter()
            .fold((0i64, 0i64), |(sum, count), rate| (sum + i64::from(rate), count + 1));

        if count == 0 {
            return Self::EMPTY;
        }

        let avg = Decimal::from(sum) / Decimal::from(count);
        Self::from_query(Some(avg), count)
    }

    /// Builds the aggregate from an `AVG(..)`/`COUNT(*)` row. `AVG` over no
    /// rows is NULL, which maps to a zero average.
    pub fn from_query(avg: Option<Decimal>, count: i64) -> Self {
        if count <= 0 {
            return Self::EMPTY;
        }

        let avg = avg
            .unwrap_or(Decimal::ZERO)
            .round_dp_with_strategy(AVG_SCALE, RoundingStrategy::MidpointAwayFromZero);

        Self { avg, count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_is_zero() {
        assert_eq!(RatingAggregate::from_rates(Vec::new()), RatingAggregate::EMPTY);
        assert_eq!(RatingAggregate::from_query(None, 0), RatingAggregate::EMPTY);
    }

    #[test]
    fn mean_of_two_and_four_is_three() {
        let agg = RatingAggregate::from_rates([2, 4]);
        assert_eq!(agg.avg, Decimal::from(3));
        assert_eq!(agg.count, 2);
    }

    #[test]
    fn mean_is_rounded_to_three_places() {
        let agg = RatingAggregate::from_rates([1, 2, 2]);
        assert_eq!(agg.avg, Decimal::new(1667, 3));
        assert_eq!(agg.count, 3);
    }

    #[test]
    fn count_is_kept_exactly() {
        let count = i64::from(i32::MAX) + 1;
        let agg = RatingAggregate::from_query(Some(Decimal::from(4)), count);
        assert_eq!(agg.count, count);
        assert_eq!(agg.avg, Decimal::from(4));
    }

    #[test]
    fn zero_rates_pull_the_average_down() {
        let agg = RatingAggregate::from_rates([0, 5]);
        assert_eq!(agg.avg, Decimal::new(25, 1));
    }
}
