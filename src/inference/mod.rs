//! Inference module for single-image prediction.
//!
//! [`predictor`] owns the model and the forward pass; [`runner`] implements
//! the command-line policy deciding which failures are reported in-band and
//! which abort the run.

pub mod predictor;
pub mod runner;

// Re-export main types for convenience
pub use predictor::{PredictionResult, Predictor, TOP_K};
pub use runner::{classify, run, RunOptions};
