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
        .route("/send", post(handlers::send_message))
        .route("/getall", get(handlers::list_messages))
        .route("/delete/:id", delete(handlers::delete_message))
}
