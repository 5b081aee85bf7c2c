//! ONNX artifact loader

use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

use crate::config::ModelsConfig;
use crate::models::inference::{FeatureScaler, FraudClassifier, InferenceError, ModelState};

/// A fitted artifact backed by an ONNX Runtime session
pub struct LoadedArtifact {
    /// Artifact name
    pub name: String,
    /// ONNX Runtime session (run takes &mut, so interior lock)
    session: RwLock<Session>,
    /// Input name for the artifact
    input_name: String,
    /// Output name carrying the numeric result
    output_name: String,
}

impl LoadedArtifact {
    /// Run the session on a single feature row.
    ///
    /// Returns output tensor dims and flattened data.
    fn run_row(&self, row: &[f64]) -> Result<(Vec<i64>, Vec<f32>), InferenceError> {
        use ort::value::Tensor;

        let features: Vec<f32> = row.iter().map(|&v| v as f32).collect();

        // Single-row input tensor - shape [1, num_features]
        let shape = vec![1_i64, features.len() as i64];
        let input_tensor = Tensor::from_array((shape, features))?;

        let mut session = self
            .session
            .write()
            .map_err(|_| InferenceError::LockPoisoned)?;
        let outputs = session.run(ort::inputs![&self.input_name => input_tensor])?;

        // Prefer the named output, then fall back to any extractable
        // non-label tensor
        if let Some(output) = outputs.get(self.output_name.as_str()) {
            if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
                return Ok((shape.iter().copied().collect(), data.to_vec()));
            }
        }
        for (name, output) in outputs.iter() {
            if name.contains("label") {
                continue;
            }
            if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
                return Ok((shape.iter().copied().collect(), data.to_vec()));
            }
        }

        Err(InferenceError::MissingOutput)
    }
}

/// Scaler artifact: same-width row in, same-width row out
pub struct OnnxScaler(LoadedArtifact);

impl FeatureScaler for OnnxScaler {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError> {
        let (_dims, data) = self.0.run_row(row)?;
        Ok(data.iter().map(|&v| v as f64).collect())
    }
}

/// Classifier artifact: feature row in, per-class probability row out
pub struct OnnxClassifier(LoadedArtifact);

impl FraudClassifier for OnnxClassifier {
    fn class_probabilities(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError> {
        let (_dims, data) = self.0.run_row(row)?;
        Ok(data.iter().map(|&v| v as f64).collect())
    }
}

/// Loader for the fitted ONNX artifacts
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new loader with default settings (1 thread)
    pub fn new() -> Result<Self> {
        Self::with_threads(1)
    }

    /// Create a new loader with the specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Result<Self> {
        // Initialize ONNX Runtime
        ort::init().commit()?;
        info!(onnx_threads = onnx_threads, "ONNX Runtime initialized");
        Ok(Self { onnx_threads })
    }

    /// Load a single artifact from file
    pub fn load_artifact<P: AsRef<Path>>(&self, path: P, name: &str) -> Result<LoadedArtifact> {
        let path = path.as_ref();

        info!(artifact = %name, path = %path.display(), threads = self.onnx_threads, "Loading ONNX artifact");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_file(path)
            .context(format!("Failed to load artifact from {:?}", path))?;

        // Resolve input/output names from session metadata
        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob") || o.name.contains("output"))
            .map(|o| o.name.clone())
            .unwrap_or_else(|| {
                session
                    .outputs
                    .last()
                    .map(|o| o.name.clone())
                    .unwrap_or_else(|| "probabilities".to_string())
            });

        info!(
            artifact = %name,
            input = %input_name,
            output = %output_name,
            "Artifact loaded successfully"
        );

        Ok(LoadedArtifact {
            name: name.to_string(),
            session: RwLock::new(session),
            input_name,
            output_name,
        })
    }

    /// Load the scaler and classifier from the configured paths.
    ///
    /// A missing or unreadable artifact is left absent with a diagnostic;
    /// the caller keeps serving in degraded mode. No retry, no reload.
    pub fn load_model_state(&self, config: &ModelsConfig) -> ModelState {
        let scaler = self
            .try_load(&config.scaler_path(), "scaler")
            .map(|artifact| Arc::new(OnnxScaler(artifact)) as Arc<dyn FeatureScaler>);
        let classifier = self
            .try_load(&config.model_path(), "classifier")
            .map(|artifact| Arc::new(OnnxClassifier(artifact)) as Arc<dyn FraudClassifier>);

        ModelState { scaler, classifier }
    }

    fn try_load(&self, path: &Path, name: &str) -> Option<LoadedArtifact> {
        if !path.exists() {
            warn!(artifact = %name, path = %path.display(), "Model file not found");
            return None;
        }
        match self.load_artifact(path, name) {
            Ok(artifact) => Some(artifact),
            Err(e) => {
                warn!(artifact = %name, error = %e, "Failed to load artifact, leaving absent");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_files_leave_state_absent() {
        let loader = ModelLoader::new().expect("runtime init");
        let config = ModelsConfig {
            models_dir: "does-not-exist".to_string(),
            ..ModelsConfig::default()
        };

        let state = loader.load_model_state(&config);
        assert!(state.scaler.is_none());
        assert!(state.classifier.is_none());
        assert!(!state.is_ready());
    }
}
