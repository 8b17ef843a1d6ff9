use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const MAX_TITLE_LEN: usize = 255;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: i64,
    pub title: Option<String>,
    pub content: Option<String>,
    pub rating_avg: Decimal,
    pub rating_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled Post")
    }
}

/// One entry of the public post listing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PostView {
    pub id: i64,
    pub title: Option<String>,
    pub content: Option<String>,
    pub rating_avg: Decimal,
    pub rating_count: i64,
    /// The viewer's own rate, `None` when anonymous or not rated yet.
    pub user_rating: Option<i16>,
}

impl PostView {
    pub fn from_post(post: Post, user_rating: Option<i16>) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            rating_avg: post.rating_avg,
            rating_count: post.rating_count,
            user_rating,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPost {
    pub title: Option<String>,
    pub content: Option<String>,
}
