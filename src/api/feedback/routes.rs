use crate::api::feedback::handlers::{list_feedback_handler, submit_feedback_handler};
use crate::api::models::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/feedback", post(submit_feedback_handler))
        .route("/api/feedback/list", get(list_feedback_handler))
}
