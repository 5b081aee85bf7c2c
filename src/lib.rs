//! Fraud Scoring API Library
//!
//! A minimal fraud-scoring web service: loads a fitted feature scaler and
//! binary classifier from disk and serves single-transaction predictions
//! over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod features;
pub mod models;

pub use api::AppState;
pub use config::AppConfig;
pub use error::PredictError;
pub use models::inference::{FraudScorer, ModelState, Prediction};
pub use models::loader::ModelLoader;
