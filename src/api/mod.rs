pub mod feedback;
pub mod models;

// Re-exports
pub use models::*;

// Health handler (simple, keep here)
use axum::Json;

/// Always reports ok, independent of store state.
pub async fn health_handler() -> impl axum::response::IntoResponse {
    Json(models::HealthResponse {
        status: "ok".to_string(),
    })
}
