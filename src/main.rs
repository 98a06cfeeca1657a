use feedback_api::api::AppState;
use feedback_api::build_router;
use feedback_api::config::AppConfig;
use feedback_api::storage::XlsxStorage;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    info!("🚀 Starting Feedback API Server");

    // Load configuration
    let config = AppConfig::load()?;
    info!("📋 Configuration loaded");
    info!("   - Server: {}:{}", config.server.host, config.server.port);
    info!("   - Feedback file: {:?}", config.storage.feedback_path);

    // Initialize feedback storage
    info!("💾 Initializing feedback storage...");
    let feedback_store = XlsxStorage::new(config.storage.feedback_path.clone());
    feedback_store.initialize()?;
    let record_count = feedback_store.count()?;
    info!("✅ Feedback storage ready ({} records)", record_count);

    // Create application state
    let state = AppState {
        feedback_store: Arc::new(RwLock::new(feedback_store)),
    };

    // Build router
    let app = build_router(state);

    // Start server
    let port = std::env::var("PORT").unwrap_or_else(|_| config.server.port.to_string());
    let addr = format!("{}:{}", config.server.host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📡 Available endpoints:");
    info!("   GET  /api/health         - Health check");
    info!("   POST /api/feedback       - Submit feedback");
    info!("   GET  /api/feedback/list  - List stored feedback");
    info!("");
    info!("✨ Server is ready to accept requests!");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutting down gracefully");

    Ok(())
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Shutdown signal received");
}
