use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add", post(handlers::add_skill))
        .route("/getall", get(handlers::list_skills))
        .route("/update/:id", put(handlers::update_skill))
        .route("/delete/:id", delete(handlers::delete_skill))
        .layer(DefaultBodyLimit::max(5 * 1024 * 1024))
}
