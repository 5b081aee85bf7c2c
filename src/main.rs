//! Fraud Scoring API - Server Entry Point
//!
//! Loads the fitted scaler and classifier artifacts and serves the
//! prediction endpoint over HTTP. A failed artifact load leaves the
//! service running in degraded mode.

use anyhow::Result;
use fraud_scoring_api::api::{self, AppState};
use fraud_scoring_api::config::AppConfig;
use fraud_scoring_api::models::inference::ModelState;
use fraud_scoring_api::models::loader::ModelLoader;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging; RUST_LOG overrides the configured level
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("fraud_scoring_api={}", config.logging.level))
    });
    let subscriber = tracing_subscriber::fmt().with_env_filter(env_filter);
    match config.logging.format.as_str() {
        "json" => subscriber.json().init(),
        _ => subscriber.init(),
    }

    info!("Starting Fraud Scoring API");
    info!("Configuration loaded successfully");

    // Load artifacts; an unavailable runtime or missing file degrades
    // rather than aborting, so the health endpoint stays reachable
    let models = match ModelLoader::with_threads(config.models.onnx_threads) {
        Ok(loader) => loader.load_model_state(&config.models),
        Err(e) => {
            warn!(error = %e, "ONNX Runtime unavailable, serving without models");
            ModelState::absent()
        }
    };
    if models.is_ready() {
        info!("Models loaded successfully");
    } else {
        warn!("Model files not found; run preprocessing and training, then restart");
    }

    let state = AppState { models };
    let app = api::routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
