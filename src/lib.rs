pub mod api;
pub mod config;
pub mod storage;

pub use api::AppState;
pub use config::AppConfig;
pub use storage::{FeedbackRecord, XlsxStorage};

use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Assemble the full application router: feedback routes, health check,
/// permissive CORS and request tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(api::health_handler))
        .merge(api::feedback::routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
