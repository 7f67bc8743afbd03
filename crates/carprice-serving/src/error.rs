//! Error types for the carprice-serving crate.
//!
//! This module defines all error types used while loading artifacts and
//! producing estimates.

use thiserror::Error;

/// Result type alias for serving operations.
pub type ServingResult<T> = Result<T, ServingError>;

/// Errors that can occur in the serving layer.
#[derive(Debug, Error)]
pub enum ServingError {
    /// Model loading failed.
    #[error("Failed to load model: {0}")]
    ModelLoadError(String),

    /// Scaler loading failed.
    #[error("Failed to load scaler: {0}")]
    ScalerLoadError(String),

    /// Feature schema could not be read or parsed.
    #[error("Failed to load feature schema: {0}")]
    SchemaLoadError(String),

    /// Feature schema does not agree with the encoder or the model.
    #[error("Feature schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Prediction failed.
    #[error("Prediction failed: {0}")]
    PredictionError(String),

    /// An artifact could not be (de)serialized.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServingError {
    /// Create a model load error.
    pub fn model_load(msg: impl Into<String>) -> Self {
        Self::ModelLoadError(msg.into())
    }

    /// Create a scaler load error.
    pub fn scaler_load(msg: impl Into<String>) -> Self {
        Self::ScalerLoadError(msg.into())
    }

    /// Create a schema load error.
    pub fn schema_load(msg: impl Into<String>) -> Self {
        Self::SchemaLoadError(msg.into())
    }

    /// Create a schema mismatch error.
    pub fn schema_mismatch(msg: impl Into<String>) -> Self {
        Self::SchemaMismatch(msg.into())
    }

    /// Create a config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a prediction error.
    pub fn prediction(msg: impl Into<String>) -> Self {
        Self::PredictionError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Check if this error can only arise while loading artifacts.
    ///
    /// Startup errors are fatal: the process must not serve estimates.
    pub fn is_startup_error(&self) -> bool {
        matches!(
            self,
            Self::ModelLoadError(_)
                | Self::ScalerLoadError(_)
                | Self::SchemaLoadError(_)
                | Self::SchemaMismatch(_)
                | Self::ConfigError(_)
        )
    }
}

impl From<candle_core::Error> for ServingError {
    fn from(err: candle_core::Error) -> Self {
        ServingError::PredictionError(err.to_string())
    }
}
