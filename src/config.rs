//! Configuration management for the fraud-scoring service

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Model artifact configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    /// Directory containing the fitted ONNX artifacts
    #[serde(default = "default_models_dir")]
    pub models_dir: String,
    /// Scaler artifact file name
    #[serde(default = "default_scaler_file")]
    pub scaler_file: String,
    /// Classifier artifact file name
    #[serde(default = "default_model_file")]
    pub model_file: String,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

fn default_models_dir() -> String {
    "models".to_string()
}

fn default_scaler_file() -> String {
    "scaler.onnx".to_string()
}

fn default_model_file() -> String {
    "xgb_model.onnx".to_string()
}

fn default_onnx_threads() -> usize {
    1
}

impl ModelsConfig {
    /// Path to the scaler artifact
    pub fn scaler_path(&self) -> std::path::PathBuf {
        Path::new(&self.models_dir).join(&self.scaler_file)
    }

    /// Path to the classifier artifact
    pub fn model_path(&self) -> std::path::PathBuf {
        Path::new(&self.models_dir).join(&self.model_file)
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            models_dir: default_models_dir(),
            scaler_file: default_scaler_file(),
            model_file: default_model_file(),
            onnx_threads: default_onnx_threads(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.models.models_dir, "models");
        assert_eq!(config.models.onnx_threads, 1);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_artifact_paths() {
        let config = ModelsConfig::default();
        assert_eq!(config.scaler_path(), Path::new("models/scaler.onnx"));
        assert_eq!(config.model_path(), Path::new("models/xgb_model.onnx"));
    }
}
