//! Scaler + classifier composition for fraud scoring
//!
//! The endpoint consumes the fitted artifacts through the trait seams here,
//! so tests can substitute stub transforms for real ONNX sessions.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::features::FEATURE_COUNT;

/// Failure kinds the transform/inference step can raise
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("inference backend error: {0}")]
    Backend(#[from] ort::Error),
    #[error("model session lock poisoned")]
    LockPoisoned,
    #[error("model produced no usable output tensor")]
    MissingOutput,
    #[error("scaler changed feature dimensions: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("classifier output has no positive-class column")]
    MalformedProbabilities,
    #[error("classifier probability {0} outside [0, 1]")]
    ProbabilityOutOfRange(f64),
}

/// A fitted numeric normalization transform with a fixed feature order.
pub trait FeatureScaler: Send + Sync {
    /// Apply the fitted transform to one feature row.
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError>;
}

/// A fitted binary classifier with a probability-output contract.
pub trait FraudClassifier: Send + Sync {
    /// Per-class probabilities for one feature row. Index 1 is the
    /// positive (fraud) class.
    fn class_probabilities(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError>;
}

/// Result of scoring a single transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Probability of the fraud class (0.0 - 1.0)
    pub fraud_probability: f64,
    /// True iff the probability strictly exceeds 0.5
    pub fraud_flag: bool,
}

/// Scores one transaction row through the scaler and classifier.
#[derive(Clone)]
pub struct FraudScorer {
    scaler: Arc<dyn FeatureScaler>,
    classifier: Arc<dyn FraudClassifier>,
}

impl FraudScorer {
    /// Create a scorer from loaded artifacts
    pub fn new(scaler: Arc<dyn FeatureScaler>, classifier: Arc<dyn FraudClassifier>) -> Self {
        Self { scaler, classifier }
    }

    /// Scale the row, run the classifier, and threshold the fraud probability.
    pub fn score(&self, row: &[f64; FEATURE_COUNT]) -> Result<Prediction, InferenceError> {
        let scaled = self.scaler.transform(row)?;
        if scaled.len() != FEATURE_COUNT {
            return Err(InferenceError::DimensionMismatch {
                expected: FEATURE_COUNT,
                actual: scaled.len(),
            });
        }

        let probabilities = self.classifier.class_probabilities(&scaled)?;
        if probabilities.len() < 2 {
            return Err(InferenceError::MalformedProbabilities);
        }
        let fraud_probability = probabilities[1];
        if !(0.0..=1.0).contains(&fraud_probability) {
            return Err(InferenceError::ProbabilityOutOfRange(fraud_probability));
        }

        debug!(fraud_probability, "Transaction scored");

        Ok(Prediction {
            fraud_probability,
            // Strictly greater than, so an exact 0.5 is not flagged
            fraud_flag: fraud_probability > 0.5,
        })
    }
}

/// Process-lifetime artifact state, constructed once at startup.
///
/// Either artifact may be absent when its file was missing or failed to
/// deserialize; the service then runs degraded and `/predict` reports it.
#[derive(Clone, Default)]
pub struct ModelState {
    pub scaler: Option<Arc<dyn FeatureScaler>>,
    pub classifier: Option<Arc<dyn FraudClassifier>>,
}

impl ModelState {
    /// State with no artifacts loaded
    pub fn absent() -> Self {
        Self::default()
    }

    /// State with both artifacts present
    pub fn with_artifacts(
        scaler: Arc<dyn FeatureScaler>,
        classifier: Arc<dyn FraudClassifier>,
    ) -> Self {
        Self {
            scaler: Some(scaler),
            classifier: Some(classifier),
        }
    }

    /// Whether both artifacts are loaded
    pub fn is_ready(&self) -> bool {
        self.scaler.is_some() && self.classifier.is_some()
    }

    /// A scorer over the loaded artifacts, or None if either is absent
    pub fn scorer(&self) -> Option<FraudScorer> {
        match (&self.scaler, &self.classifier) {
            (Some(scaler), Some(classifier)) => {
                Some(FraudScorer::new(scaler.clone(), classifier.clone()))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedScaler(Vec<f64>);

    impl FeatureScaler for FixedScaler {
        fn transform(&self, _row: &[f64]) -> Result<Vec<f64>, InferenceError> {
            Ok(self.0.clone())
        }
    }

    struct FixedClassifier(Vec<f64>);

    impl FraudClassifier for FixedClassifier {
        fn class_probabilities(&self, _row: &[f64]) -> Result<Vec<f64>, InferenceError> {
            Ok(self.0.clone())
        }
    }

    fn scorer(scaled: Vec<f64>, probabilities: Vec<f64>) -> FraudScorer {
        FraudScorer::new(
            Arc::new(FixedScaler(scaled)),
            Arc::new(FixedClassifier(probabilities)),
        )
    }

    const ROW: [f64; FEATURE_COUNT] = [3.2, 15.0, 120.0];

    #[test]
    fn test_low_probability_not_flagged() {
        let prediction = scorer(vec![0.5, 15.0, 120.0], vec![0.9, 0.1])
            .score(&ROW)
            .unwrap();
        assert_eq!(prediction.fraud_probability, 0.1);
        assert!(!prediction.fraud_flag);
    }

    #[test]
    fn test_high_probability_flagged() {
        let prediction = scorer(vec![0.5, 15.0, 120.0], vec![0.1, 0.9])
            .score(&ROW)
            .unwrap();
        assert_eq!(prediction.fraud_probability, 0.9);
        assert!(prediction.fraud_flag);
    }

    #[test]
    fn test_threshold_is_strict() {
        let prediction = scorer(vec![0.5, 15.0, 120.0], vec![0.5, 0.5])
            .score(&ROW)
            .unwrap();
        assert_eq!(prediction.fraud_probability, 0.5);
        assert!(!prediction.fraud_flag);
    }

    #[test]
    fn test_scaler_must_preserve_dimensions() {
        let err = scorer(vec![0.5], vec![0.9, 0.1]).score(&ROW).unwrap_err();
        match err {
            InferenceError::DimensionMismatch { expected, actual } => {
                assert_eq!(expected, FEATURE_COUNT);
                assert_eq!(actual, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_single_column_output_is_malformed() {
        let err = scorer(vec![0.5, 15.0, 120.0], vec![0.9])
            .score(&ROW)
            .unwrap_err();
        assert!(matches!(err, InferenceError::MalformedProbabilities));
    }

    #[test]
    fn test_probability_outside_unit_interval_rejected() {
        let err = scorer(vec![0.5, 15.0, 120.0], vec![-0.2, 1.2])
            .score(&ROW)
            .unwrap_err();
        assert!(matches!(err, InferenceError::ProbabilityOutOfRange(_)));
    }

    #[test]
    fn test_model_state_readiness() {
        assert!(!ModelState::absent().is_ready());
        assert!(ModelState::absent().scorer().is_none());

        let state = ModelState {
            scaler: Some(Arc::new(FixedScaler(vec![0.0; FEATURE_COUNT]))),
            classifier: None,
        };
        assert!(!state.is_ready());
        assert!(state.scorer().is_none());

        let state = ModelState::with_artifacts(
            Arc::new(FixedScaler(vec![0.0; FEATURE_COUNT])),
            Arc::new(FixedClassifier(vec![0.6, 0.4])),
        );
        assert!(state.is_ready());
        assert!(state.scorer().is_some());
    }
}
