pub mod get;
pub mod put;

pub use get::{get_rating, rating_aggregate};
pub use put::upsert_rating;
