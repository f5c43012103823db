//! Forest-Fire Risk API Server
//!
//! Serves risk predictions from the model trained by `fire-train`. The
//! model is loaded once before the listener binds; a missing or
//! incompatible artifact is fatal rather than served around.

mod config;
mod error;
mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use firerisk_core::ModelService;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "firerisk_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("Forest-fire risk server starting...");
    tracing::info!("Models directory: {}", config.models_dir.display());

    // Load the model before accepting any traffic
    let service = ModelService::new();
    if let Err(err) = service.load(&config.models_dir) {
        tracing::error!(
            "failed to load model from {}: {err} (run fire-train first)",
            config.models_dir.display()
        );
        std::process::exit(1);
    }

    // Build application state
    let state = AppState {
        service: Arc::new(service),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");
    axum::serve(listener, app).await.expect("Server error");
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ModelService>,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/predict", post(handlers::predict::predict))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
