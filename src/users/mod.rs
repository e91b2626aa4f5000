use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod repo;
pub(crate) mod services;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/logout", get(handlers::logout))
        .route("/profile", get(handlers::get_profile))
        .route("/profile/portfolio", get(handlers::portfolio_profile))
        .route("/update/profile", put(handlers::update_profile))
        .route("/update/password", put(handlers::update_password))
        .route("/password/forgot", post(handlers::forgot_password))
        .route("/password/reset/:token", put(handlers::reset_password))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB for avatar + resume
}
