//! Feature schema for single-transaction fraud scoring.
//!
//! The scaler and classifier were fitted against a fixed three-column
//! feature order; vector assembly here must match it exactly.

use serde_json::{Map, Value};
use thiserror::Error;

/// Required feature keys, in the order the artifacts were fitted with.
pub const FEATURES: [&str; 3] = ["amount_log", "hour", "Amount"];

/// Width of the assembled feature row.
pub const FEATURE_COUNT: usize = FEATURES.len();

/// Rejected value in an otherwise complete feature record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureError {
    #[error("field {field:?} must be a number, got {found}")]
    NotNumeric {
        field: &'static str,
        found: &'static str,
    },
}

/// Required keys absent from the record, preserving canonical order.
pub fn missing_fields(record: &Map<String, Value>) -> Vec<&'static str> {
    FEATURES
        .iter()
        .copied()
        .filter(|field| !record.contains_key(*field))
        .collect()
}

/// Assemble the canonical feature row from a record.
///
/// Keys beyond the required three are ignored. Callers are expected to have
/// checked [`missing_fields`] first; an absent key reads as null here.
pub fn feature_row(record: &Map<String, Value>) -> Result<[f64; FEATURE_COUNT], FeatureError> {
    let mut row = [0.0; FEATURE_COUNT];
    for (slot, field) in row.iter_mut().zip(FEATURES) {
        let value = record.get(field).unwrap_or(&Value::Null);
        *slot = value.as_f64().ok_or(FeatureError::NotNumeric {
            field,
            found: json_type(value),
        })?;
    }
    Ok(row)
}

/// Log-amount transform applied at training time: log1p of the raw amount,
/// zero for non-positive amounts.
pub fn amount_log(amount: f64) -> f64 {
    if amount > 0.0 {
        amount.ln_1p()
    } else {
        0.0
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_missing_fields_preserves_canonical_order() {
        let record = record(json!({ "amount_log": 3.2 }));
        assert_eq!(missing_fields(&record), vec!["hour", "Amount"]);

        let record = Map::new();
        assert_eq!(missing_fields(&record), vec!["amount_log", "hour", "Amount"]);
    }

    #[test]
    fn test_missing_fields_empty_when_complete() {
        let record = record(json!({ "amount_log": 3.2, "hour": 15, "Amount": 120.0 }));
        assert!(missing_fields(&record).is_empty());
    }

    #[test]
    fn test_feature_row_canonical_order() {
        let record = record(json!({ "Amount": 120.0, "hour": 15, "amount_log": 3.2 }));
        assert_eq!(feature_row(&record).unwrap(), [3.2, 15.0, 120.0]);
    }

    #[test]
    fn test_feature_row_ignores_extra_keys() {
        let record = record(json!({
            "amount_log": 3.2,
            "hour": 15,
            "Amount": 120.0,
            "merchant": "grocery",
            "Time": 54000
        }));
        assert_eq!(feature_row(&record).unwrap(), [3.2, 15.0, 120.0]);
    }

    #[test]
    fn test_feature_row_rejects_non_numeric_value() {
        let record = record(json!({ "amount_log": 3.2, "hour": "noon", "Amount": 120.0 }));
        let err = feature_row(&record).unwrap_err();
        assert_eq!(
            err,
            FeatureError::NotNumeric {
                field: "hour",
                found: "string"
            }
        );
        assert!(err.to_string().contains("hour"));
    }

    #[test]
    fn test_amount_log_matches_training_transform() {
        assert!((amount_log(120.0) - 120.0_f64.ln_1p()).abs() < 1e-12);
        assert_eq!(amount_log(0.0), 0.0);
        assert_eq!(amount_log(-5.0), 0.0);
    }
}
