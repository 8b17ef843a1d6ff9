pub mod post;
pub mod rating;
pub mod user;

pub use post::{NewPost, Post, PostView};
pub use rating::{Rating, RatingAggregate};
pub use user::{NewUser, User};
