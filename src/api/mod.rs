//! HTTP surface for the fraud-scoring service

pub mod handlers;

use axum::routing::{get, post};
use axum::Router;

use crate::models::inference::ModelState;

/// Shared application state, constructed once at startup.
///
/// Artifacts are shared read-only across requests; no request path
/// mutates them.
#[derive(Clone, Default)]
pub struct AppState {
    pub models: ModelState,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::home))
        .route("/favicon.ico", get(handlers::favicon))
        .route("/predict", post(handlers::predict))
}
