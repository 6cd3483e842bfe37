//! Model-backed inference on single images.
//!
//! A [`Predictor`] owns a loaded network and turns decoded images into
//! probability distributions plus a ranked top-k.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use burn::tensor::{activation::softmax, backend::Backend, Tensor};
use image::DynamicImage;
use tracing::debug;

use crate::error::{Error, Result};
use crate::labels::class_name;
use crate::model::{load_from_pytorch, ResNet18};
use crate::preprocess::ImagePreprocessor;

/// Number of ranked entries kept in a prediction result
pub const TOP_K: usize = 3;

/// Result of a single prediction
#[derive(Debug, Clone)]
pub struct PredictionResult {
    /// Path to the input image (if applicable)
    pub image_path: Option<PathBuf>,

    /// Predicted class index
    pub predicted_class: usize,

    /// Predicted class name
    pub class_name: String,

    /// Confidence score (probability) for the predicted class
    pub confidence: f32,

    /// Full probability distribution over all classes
    pub probabilities: Vec<f32>,

    /// Top-k predictions with their probabilities, descending
    pub top_k: Vec<(usize, String, f32)>,

    /// Inference time in milliseconds
    pub inference_time_ms: f64,
}

impl PredictionResult {
    /// Rank a probability distribution into a prediction result.
    ///
    /// Equal probabilities keep their index order (stable sort); exact
    /// floating-point ties are practically unreachable with real inputs.
    pub fn new(
        probabilities: Vec<f32>,
        inference_time: Duration,
        image_path: Option<PathBuf>,
    ) -> Self {
        let mut indexed: Vec<(usize, f32)> = probabilities.iter().copied().enumerate().collect();
        indexed.sort_by(|a, b| b.1.total_cmp(&a.1));

        let top_k: Vec<(usize, String, f32)> = indexed
            .iter()
            .take(TOP_K)
            .map(|&(idx, prob)| {
                let name = class_name(idx).unwrap_or("Unknown").to_string();
                (idx, name, prob)
            })
            .collect();

        let (predicted_class, confidence) = indexed.first().copied().unwrap_or((0, 0.0));
        let class_name_str = class_name(predicted_class).unwrap_or("Unknown").to_string();

        Self {
            image_path,
            predicted_class,
            class_name: class_name_str,
            confidence,
            probabilities,
            top_k,
            inference_time_ms: inference_time.as_secs_f64() * 1000.0,
        }
    }
}

/// Predictor for running inference with a loaded model
pub struct Predictor<B: Backend> {
    model: ResNet18<B>,
    preprocessor: ImagePreprocessor,
    device: B::Device,
}

impl<B: Backend> Predictor<B> {
    /// Create a predictor around an already-loaded model
    pub fn new(model: ResNet18<B>, device: B::Device) -> Self {
        Self {
            model,
            preprocessor: ImagePreprocessor::default(),
            device,
        }
    }

    /// Load the checkpoint at `path` and build a predictor from it
    pub fn from_artifact(path: &Path, device: B::Device) -> Result<Self> {
        let model = load_from_pytorch(path, &device)?;
        Ok(Self::new(model, device))
    }

    /// Replace the preprocessing configuration
    pub fn with_preprocessor(mut self, preprocessor: ImagePreprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    /// Predict on an image from a file path
    pub fn predict_file(&self, path: &Path) -> Result<PredictionResult> {
        let pixels = self.preprocessor.preprocess_from_path(path)?;
        debug!(path = %path.display(), "image decoded and preprocessed");

        let mut result = self.predict_pixels(&pixels)?;
        result.image_path = Some(path.to_path_buf());
        Ok(result)
    }

    /// Predict on an already-decoded image
    pub fn predict_image(&self, image: &DynamicImage) -> Result<PredictionResult> {
        let pixels = self.preprocessor.preprocess(image);
        self.predict_pixels(&pixels)
    }

    /// Forward pass over a preprocessed CHW buffer
    fn predict_pixels(&self, pixels: &[f32]) -> Result<PredictionResult> {
        let [channels, height, width] = self.preprocessor.output_shape();
        let input: Tensor<B, 4> =
            Tensor::<B, 1>::from_floats(pixels, &self.device).reshape([1, channels, height, width]);

        let start = Instant::now();
        let logits = self.model.forward(input);
        let probabilities = softmax(logits, 1);
        let inference_time = start.elapsed();

        let probabilities: Vec<f32> = probabilities
            .into_data()
            .to_vec()
            .map_err(|e| Error::Tensor(format!("{e:?}")))?;

        debug!(
            time_ms = inference_time.as_secs_f64() * 1000.0,
            "forward pass complete"
        );

        Ok(PredictionResult::new(probabilities, inference_time, None))
    }
}
