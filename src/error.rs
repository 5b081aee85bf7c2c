//! Request-error taxonomy for the prediction endpoint
//!
//! Every failure is converted at the endpoint boundary into a structured
//! JSON body with an explicit status code; nothing propagates as an opaque
//! 500 without a message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::features::FeatureError;
use crate::models::inference::InferenceError;

/// Failure kinds the prediction endpoint can report
#[derive(Debug, Error)]
pub enum PredictError {
    /// Either artifact is absent; retryable only after deploying model files
    #[error("Model files not found. Please run preprocessing and training first.")]
    ModelUnavailable,

    /// Body empty, unparseable, or not a usable JSON object
    #[error("Empty request body")]
    EmptyBody,

    /// Required feature keys absent, in canonical order
    #[error("Missing required fields: {0:?}")]
    MissingFields(Vec<&'static str>),

    /// Malformed field values or internal transform failure
    #[error("{0}")]
    Computation(String),
}

impl PredictError {
    /// HTTP status the error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            PredictError::ModelUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            PredictError::EmptyBody
            | PredictError::MissingFields(_)
            | PredictError::Computation(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<FeatureError> for PredictError {
    fn from(e: FeatureError) -> Self {
        PredictError::Computation(e.to_string())
    }
}

impl From<InferenceError> for PredictError {
    fn from(e: InferenceError) -> Self {
        PredictError::Computation(e.to_string())
    }
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
