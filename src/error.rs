//! Error types for the prediction pipeline.
//!
//! The `Display` strings of [`Error::Image`] and [`Error::WeightsNotFound`]
//! are part of the output contract: they are emitted verbatim inside the
//! `{"error": ...}` object on stdout.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the prediction pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image could not be opened or decoded
    #[error("Failed to open image: {0}")]
    Image(String),

    /// Weights artifact missing at the resolved path
    #[error("Model file not found at {}", .0.display())]
    WeightsNotFound(PathBuf),

    /// Weights artifact present but could not be deserialized
    #[error("Failed to load model weights: {0}")]
    Weights(String),

    /// Tensor data conversion error
    #[error("Tensor error: {0}")]
    Tensor(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

/// Specialized Result type for prediction operations.
pub type Result<T> = std::result::Result<T, Error>;
