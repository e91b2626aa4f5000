use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add", post(handlers::add_application))
        .route("/getall", get(handlers::list_applications))
        .route("/delete/:id", delete(handlers::delete_application))
        .layer(DefaultBodyLimit::max(5 * 1024 * 1024))
}
