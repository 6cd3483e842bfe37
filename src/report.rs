//! The stdout wire contract.
//!
//! Exactly one JSON object is printed per invocation: either an error object
//! or a predictions array. Nothing else may be written to stdout.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::inference::PredictionResult;

/// One ranked prediction entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Class label from the fixed 16-entry table
    pub class: String,
    /// Probability in [0,1]
    pub confidence: f64,
}

/// The single JSON object printed to stdout.
///
/// Serializes untagged, so the two variants produce exactly the
/// `{"error": ...}` and `{"predictions": [...]}` shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Report {
    /// Recoverable failure, reported in-band with a clean exit
    Error { error: String },
    /// Ranked predictions, at most three entries, descending confidence
    Predictions { predictions: Vec<Prediction> },
}

impl Report {
    /// Build an error report
    pub fn error(message: impl Into<String>) -> Self {
        Report::Error {
            error: message.into(),
        }
    }

    /// Build a predictions report from a ranked result
    pub fn from_result(result: &PredictionResult) -> Self {
        let predictions = result
            .top_k
            .iter()
            .map(|(_, name, prob)| Prediction {
                class: name.clone(),
                confidence: *prob as f64,
            })
            .collect();

        Report::Predictions { predictions }
    }

    /// Serialize to the compact JSON form printed on stdout
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
