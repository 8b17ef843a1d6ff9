use axum::{
    Router,
    routing::{get, post},
};

use crate::{
    http::handlers::{
        create_post_handler, list_posts_handler, login_handler, rate_post_handler,
        register_handler,
    },
    state::AppState,
};

pub fn create_http_routes(state: AppState) -> Router {
    Router::new()
        .route("/posts/", get(list_posts_handler).post(create_post_handler))
        .route("/posts/{post_id}/rate", post(rate_post_handler))
        .route("/register/", post(register_handler))
        .route("/login/", post(login_handler))
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
}
