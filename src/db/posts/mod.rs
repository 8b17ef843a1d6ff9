pub mod get;
pub mod patch;
pub mod post;

pub use get::{get_post_by_id, list_posts};
pub use patch::update_rating_aggregate;
pub use post::create_post;
