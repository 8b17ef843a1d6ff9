pub mod account;
pub mod rating;

pub use rating::submit_rating;
