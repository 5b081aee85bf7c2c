//! Request handlers for the prediction API

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Map, Value};
use tracing::warn;

use crate::api::AppState;
use crate::error::PredictError;
use crate::features;
use crate::models::inference::Prediction;

/// GET / liveness message, independent of artifact state
pub async fn home() -> Json<Value> {
    Json(json!({ "message": "✅ Fraud Detection API is running" }))
}

/// GET /favicon.ico returns an empty response, keeping browser probes
/// out of the logs
pub async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// POST /predict scores one transaction record
pub async fn predict(State(state): State<AppState>, body: Bytes) -> Response {
    match score_request(&state, &body) {
        Ok(prediction) => (StatusCode::OK, Json(prediction)).into_response(),
        Err(e) => e.into_response(),
    }
}

fn score_request(state: &AppState, body: &[u8]) -> Result<Prediction, PredictError> {
    // Artifact presence is checked before the body is touched
    let scorer = state
        .models
        .scorer()
        .ok_or(PredictError::ModelUnavailable)?;

    let record = parse_record(body)?;

    let missing = features::missing_fields(&record);
    if !missing.is_empty() {
        return Err(PredictError::MissingFields(missing));
    }

    let row = features::feature_row(&record)?;
    let prediction = scorer.score(&row).map_err(|e| {
        warn!(error = %e, "Scoring failed");
        PredictError::from(e)
    })?;

    Ok(prediction)
}

/// Parse the body as a non-empty JSON object.
///
/// An absent body, malformed JSON, a non-object value, and the empty object
/// all read as an empty request.
fn parse_record(body: &[u8]) -> Result<Map<String, Value>, PredictError> {
    if body.is_empty() {
        return Err(PredictError::EmptyBody);
    }
    let value: Value = serde_json::from_slice(body).map_err(|_| PredictError::EmptyBody)?;
    match value {
        Value::Object(record) if !record.is_empty() => Ok(record),
        _ => Err(PredictError::EmptyBody),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_rejects_empty_and_non_object_bodies() {
        assert!(matches!(parse_record(b""), Err(PredictError::EmptyBody)));
        assert!(matches!(
            parse_record(b"not json"),
            Err(PredictError::EmptyBody)
        ));
        assert!(matches!(parse_record(b"{}"), Err(PredictError::EmptyBody)));
        assert!(matches!(
            parse_record(b"[1, 2, 3]"),
            Err(PredictError::EmptyBody)
        ));
        assert!(matches!(
            parse_record(b"\"amount\""),
            Err(PredictError::EmptyBody)
        ));
    }

    #[test]
    fn test_parse_record_accepts_object() {
        let record = parse_record(br#"{"amount_log": 3.2}"#).unwrap();
        assert_eq!(record.len(), 1);
        assert!(record.contains_key("amount_log"));
    }
}
