use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add", post(handlers::add_timeline))
        .route("/getall", get(handlers::list_timelines))
        .route("/delete/:id", delete(handlers::delete_timeline))
}
