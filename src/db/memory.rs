use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    db::Store,
    errors::AppError,
    models::{NewPost, NewUser, Post, PostView, Rating, RatingAggregate, User},
};

#[derive(Debug, Default)]
struct Tables {
    posts: BTreeMap<i64, Post>,
    ratings: HashMap<(Uuid, i64), Rating>,
    users: HashMap<String, User>,
    next_post_id: i64,
    next_rating_id: i64,
}

impl Tables {
    fn rates_of(&self, post_id: i64) -> impl Iterator<Item = i16> + '_ {
        self.ratings
            .values()
            .filter(move |r| r.post_id == post_id)
            .map(|r| r.rate)
    }
}

/// Process-local store used when no database is configured and in tests.
///
/// Everything sits behind one lock, so a rating upsert and the recompute
/// that follows it can never interleave with another submission.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_posts(&self, viewer: Option<Uuid>) -> Result<Vec<PostView>, AppError> {
        let tables = self.tables.lock().await;

        let posts = tables
            .posts
            .values()
            .map(|post| {
                let user_rating = viewer
                    .and_then(|owner| tables.ratings.get(&(owner, post.id)))
                    .map(|r| r.rate);
                PostView::from_post(post.clone(), user_rating)
            })
            .collect();

        Ok(posts)
    }

    async fn get_post(&self, post_id: i64) -> Result<Option<Post>, AppError> {
        Ok(self.tables.lock().await.posts.get(&post_id).cloned())
    }

    async fn create_post(&self, new_post: NewPost) -> Result<Post, AppError> {
        let mut guard = self.tables.lock().await;
        let tables = &mut *guard;
        tables.next_post_id += 1;

        let now = Utc::now();
        let post = Post {
            id: tables.next_post_id,
            title: new_post.title,
            content: new_post.content,
            rating_avg: Decimal::ZERO,
            rating_count: 0,
            created_at: now,
            updated_at: now,
        };
        tables.posts.insert(post.id, post.clone());

        tracing::info!("Created post: {} (ID: {})", post.display_title(), post.id);

        Ok(post)
    }

    async fn get_rating(&self, owner_id: Uuid, post_id: i64) -> Result<Option<Rating>, AppError> {
        Ok(self
            .tables
            .lock()
            .await
            .ratings
            .get(&(owner_id, post_id))
            .cloned())
    }

    async fn upsert_rating(
        &self,
        owner_id: Uuid,
        post_id: i64,
        rate: i16,
    ) -> Result<(Rating, RatingAggregate), AppError> {
        let mut guard = self.tables.lock().await;
        let tables = &mut *guard;

        if !tables.posts.contains_key(&post_id) {
            return Err(AppError::NotFound(format!("Post {} not found", post_id)));
        }
        if !tables.users.values().any(|u| u.id == owner_id) {
            return Err(AppError::Unauthorized(format!(
                "User {} no longer exists",
                owner_id
            )));
        }

        let rating = match tables.ratings.get_mut(&(owner_id, post_id)) {
            Some(existing) => {
                existing.rate = rate;
                existing.clone()
            }
            None => {
                tables.next_rating_id += 1;
                let rating = Rating {
                    id: tables.next_rating_id,
                    owner_id,
                    post_id,
                    rate,
                };
                tables.ratings.insert((owner_id, post_id), rating.clone());
                rating
            }
        };

        let aggregate = RatingAggregate::from_rates(tables.rates_of(post_id));

        // Presence was checked above while holding the same lock.
        let post = tables
            .posts
            .get_mut(&post_id)
            .ok_or(AppError::InternalError)?;
        post.rating_avg = aggregate.avg;
        post.rating_count = aggregate.count;
        post.updated_at = Utc::now();

        Ok((rating, aggregate))
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.lock().await;

        if tables.users.contains_key(&new_user.username) {
            return Err(AppError::Conflict(format!(
                "Username '{}' is already taken",
                new_user.username
            )));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: Utc::now(),
        };
        tables.users.insert(user.username.clone(), user.clone());

        tracing::info!("Created user: {} (ID: {})", user.username, user.id);

        Ok(user)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self.tables.lock().await.users.get(username).cloned())
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self
            .tables
            .lock()
            .await
            .users
            .values()
            .find(|u| u.id == user_id)
            .cloned())
    }
}
