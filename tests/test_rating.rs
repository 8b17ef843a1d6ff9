use post_ratings_be::{
    config::RatingPolicy,
    db::{MemoryStore, Store},
    errors::AppError,
    models::{NewPost, NewUser, Post, RatingAggregate},
    services::submit_rating,
};
use rust_decimal::Decimal;
use uuid::Uuid;

async fn create_user(store: &MemoryStore, username: &str) -> Uuid {
    store
        .create_user(NewUser {
            username: username.into(),
            email: format!("{}@example.com", username),
            password_hash: "not-a-real-hash".into(),
        })
        .await
        .unwrap_or_else(|e| panic!("failed to create user {}: {}", username, e))
        .id
}

async fn create_post(store: &MemoryStore) -> Post {
    store
        .create_post(NewPost {
            title: Some("test".into()),
            content: Some("test".into()),
        })
        .await
        .expect("failed to create post")
}

async fn reload(store: &MemoryStore, post_id: i64) -> Post {
    store
        .get_post(post_id)
        .await
        .expect("store error")
        .expect("post vanished")
}

async fn rate(store: &MemoryStore, user: Uuid, post_id: i64, value: i64) -> Result<i16, AppError> {
    submit_rating(store, RatingPolicy::default(), user, post_id, value)
        .await
        .map(|rating| rating.rate)
}

#[tokio::test]
async fn test_new_post_starts_unrated() {
    let store = MemoryStore::new();
    let post = create_post(&store).await;

    assert_eq!(post.rating_avg, Decimal::ZERO);
    assert_eq!(post.rating_count, 0);
}

#[tokio::test]
async fn test_same_user_rating_twice_is_counted_once() {
    let store = MemoryStore::new();
    let user = create_user(&store, "misagh").await;
    let post = create_post(&store).await;

    assert_eq!(rate(&store, user, post.id, 2).await.ok(), Some(2));
    let after_first = reload(&store, post.id).await;
    assert_eq!(after_first.rating_avg, Decimal::from(2));
    assert_eq!(after_first.rating_count, 1);

    assert_eq!(rate(&store, user, post.id, 2).await.ok(), Some(2));
    let after_second = reload(&store, post.id).await;
    assert_eq!(after_second.rating_avg, Decimal::from(2));
    assert_eq!(after_second.rating_count, 1);
}

#[tokio::test]
async fn test_rating_by_multiple_users() {
    let store = MemoryStore::new();
    let first = create_user(&store, "misagh").await;
    let second = create_user(&store, "misagh2").await;
    let post = create_post(&store).await;

    rate(&store, first, post.id, 2).await.expect("first rating");
    rate(&store, first, post.id, 2).await.expect("repeated rating");
    rate(&store, second, post.id, 4).await.expect("second rating");

    let post = reload(&store, post.id).await;
    assert_eq!(post.rating_avg, Decimal::from(3));
    assert_eq!(post.rating_count, 2);
}

#[tokio::test]
async fn test_second_submission_overwrites_first() {
    let store = MemoryStore::new();
    let user = create_user(&store, "alice").await;
    let post = create_post(&store).await;

    let first = submit_rating(&store, RatingPolicy::default(), user, post.id, 1)
        .await
        .expect("first rating");
    let second = submit_rating(&store, RatingPolicy::default(), user, post.id, 5)
        .await
        .expect("second rating");

    assert_eq!(first.id, second.id);
    assert_eq!(second.rate, 5);

    let stored = store
        .get_rating(user, post.id)
        .await
        .expect("store error")
        .expect("rating missing");
    assert_eq!(stored.rate, 5);

    let post = reload(&store, post.id).await;
    assert_eq!(post.rating_count, 1);
    assert_eq!(post.rating_avg, Decimal::from(5));
}

#[tokio::test]
async fn test_out_of_range_values_change_nothing() {
    let store = MemoryStore::new();
    let user = create_user(&store, "alice").await;
    let post = create_post(&store).await;

    rate(&store, user, post.id, 3).await.expect("valid rating");
    let before = reload(&store, post.id).await;

    for value in [6, -1, 100, i64::MIN] {
        let result = rate(&store, user, post.id, value).await;
        assert!(
            matches!(result, Err(AppError::InvalidRatingValue { value: v, .. }) if v == value),
            "value {} should be rejected",
            value
        );
    }

    let after = reload(&store, post.id).await;
    assert_eq!(after.rating_avg, before.rating_avg);
    assert_eq!(after.rating_count, before.rating_count);
    assert_eq!(after.updated_at, before.updated_at);

    let stored = store.get_rating(user, post.id).await.expect("store error");
    assert_eq!(stored.map(|r| r.rate), Some(3));
}

#[tokio::test]
async fn test_rejected_first_submission_creates_no_rating() {
    let store = MemoryStore::new();
    let user = create_user(&store, "alice").await;
    let post = create_post(&store).await;

    assert!(rate(&store, user, post.id, 6).await.is_err());

    assert!(store.get_rating(user, post.id).await.expect("store error").is_none());
    assert_eq!(reload(&store, post.id).await.rating_count, 0);
}

#[tokio::test]
async fn test_boundaries() {
    let store = MemoryStore::new();
    let user = create_user(&store, "alice").await;
    let post = create_post(&store).await;

    assert!(rate(&store, user, post.id, 5).await.is_ok());
    assert!(rate(&store, user, post.id, -1).await.is_err());
    assert!(rate(&store, user, post.id, 6).await.is_err());
}

#[tokio::test]
async fn test_zero_follows_policy() {
    let store = MemoryStore::new();
    let user = create_user(&store, "alice").await;
    let post = create_post(&store).await;

    let strict = RatingPolicy { allow_zero: false };
    let rejected = submit_rating(&store, strict, user, post.id, 0).await;
    assert!(matches!(
        rejected,
        Err(AppError::InvalidRatingValue { min: 1, max: 5, .. })
    ));
    assert_eq!(reload(&store, post.id).await.rating_count, 0);

    let accepted = submit_rating(&store, RatingPolicy::default(), user, post.id, 0)
        .await
        .expect("zero accepted by default");
    assert_eq!(accepted.rate, 0);

    let post = reload(&store, post.id).await;
    assert_eq!(post.rating_count, 1);
    assert_eq!(post.rating_avg, Decimal::ZERO);
}

#[tokio::test]
async fn test_cached_aggregate_matches_recomputation() {
    let store = MemoryStore::new();
    let post = create_post(&store).await;
    let other_post = create_post(&store).await;

    let submissions = [
        ("u1", 5),
        ("u2", 1),
        ("u3", 4),
        ("u1", 2),
        ("u4", 3),
        ("u2", 2),
    ];

    let mut users = std::collections::HashMap::new();
    for (name, value) in submissions {
        let id = match users.get(name) {
            Some(id) => *id,
            None => {
                let id = create_user(&store, name).await;
                users.insert(name, id);
                id
            }
        };
        rate(&store, id, post.id, value).await.expect("valid rating");
        rate(&store, id, other_post.id, 5).await.expect("valid rating");

        let mut current = Vec::new();
        for user in users.values() {
            if let Some(r) = store.get_rating(*user, post.id).await.expect("store error") {
                current.push(r.rate);
            }
        }
        let expected = RatingAggregate::from_rates(current);

        let cached = reload(&store, post.id).await;
        assert_eq!(cached.rating_avg, expected.avg);
        assert_eq!(cached.rating_count, expected.count);
    }

    // u1=2, u2=2, u3=4, u4=3
    let post = reload(&store, post.id).await;
    assert_eq!(post.rating_count, 4);
    assert_eq!(post.rating_avg, Decimal::new(2750, 3));

    let other_post = reload(&store, other_post.id).await;
    assert_eq!(other_post.rating_count, 4);
    assert_eq!(other_post.rating_avg, Decimal::from(5));
}

#[tokio::test]
async fn test_unknown_owner_is_unauthorized() {
    let store = MemoryStore::new();
    let post = create_post(&store).await;

    let result = rate(&store, Uuid::new_v4(), post.id, 3).await;
    assert!(matches!(result, Err(AppError::Unauthorized(_))));

    let post = reload(&store, post.id).await;
    assert_eq!(post.rating_count, 0);
    assert_eq!(post.rating_avg, Decimal::ZERO);
}

#[tokio::test]
async fn test_unknown_post_is_not_found() {
    let store = MemoryStore::new();
    let user = create_user(&store, "alice").await;

    let result = rate(&store, user, 42, 3).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_concurrent_submissions_keep_aggregate_consistent() {
    let store = MemoryStore::new();
    let post = create_post(&store).await;

    let mut users = Vec::new();
    for i in 0..20 {
        users.push(create_user(&store, &format!("user{}", i)).await);
    }

    let post_id = post.id;
    let mut handles = Vec::new();
    for (i, user) in users.iter().copied().enumerate() {
        let store = store.clone();
        let value = (i % 5 + 1) as i64;
        handles.push(tokio::spawn(async move {
            submit_rating(&store, RatingPolicy::default(), user, post_id, value).await
        }));
    }
    for handle in handles {
        handle.await.expect("task panicked").expect("rating failed");
    }

    // Four of each value 1..=5.
    let post = reload(&store, post_id).await;
    assert_eq!(post.rating_count, 20);
    assert_eq!(post.rating_avg, Decimal::from(3));
}
