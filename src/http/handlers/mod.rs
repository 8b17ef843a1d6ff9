pub mod post;
pub mod rating;
pub mod user;

pub use post::{create_post_handler, list_posts_handler};
pub use rating::rate_post_handler;
pub use user::{login_handler, register_handler};
