//! Cardioserve - heart disease prediction server
//!
//! Serves binary heart-disease predictions from a pre-trained classifier
//! and its paired feature scaler.
//!
//! # Architecture
//!
//! ```text
//! HTTP request
//!   -> schema validation   (13-field numeric patient record)
//!   -> preprocessing       (scaler transform, training column order)
//!   -> inference           (tagged classifier variant)
//!   -> response assembly   (label + confidence + model id; batch keeps
//!                           input order with per-item error isolation)
//! ```
//!
//! Both artifacts load once at startup and are shared read-only; if the
//! load fails the process serves health/info in a degraded state and
//! refuses inference traffic until restarted with valid artifacts.

mod config;
mod error;
mod handlers;
mod inference;
mod models;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};
use inference::ModelArtifacts;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cardioserve=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("Cardioserve starting...");
    tracing::info!("Model artifact: {}", config.model_path.display());
    tracing::info!("Scaler artifact: {}", config.scaler_path.display());

    // Load model artifacts once; a failure leaves the process serving in a
    // degraded state (health not-ready, predictions 503) rather than
    // crash-looping.
    let artifacts = match inference::load_artifacts(&config.model_path, &config.scaler_path) {
        Ok(a) => Some(Arc::new(a)),
        Err(e) => {
            tracing::warn!("could not load model artifacts on startup: {}", e);
            tracing::warn!("serving degraded; predictions will fail until artifacts are provided");
            None
        }
    };

    // Build application state
    let state = AppState {
        artifacts,
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind server address")?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Immutable artifact bundle; `None` when the startup load failed
    pub artifacts: Option<Arc<ModelArtifacts>>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::info::root))
        .route("/health", get(handlers::health::check))
        .route("/model/info", get(handlers::info::model_info))
        .route("/predict", post(handlers::predict::predict))
        .route("/predict/batch", post(handlers::predict::predict_batch))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
