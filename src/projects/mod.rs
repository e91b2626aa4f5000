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
        .route("/add", post(handlers::add_project))
        .route("/getall", get(handlers::list_projects))
        .route("/get/:id", get(handlers::get_project))
        .route("/update/:id", put(handlers::update_project))
        .route("/delete/:id", delete(handlers::delete_project))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
}
