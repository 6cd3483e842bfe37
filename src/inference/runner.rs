//! End-to-end run policy for the command-line surface.
//!
//! Three failures are recoverable and become `{"error": ...}` objects with a
//! clean exit: a missing image argument, a missing checkpoint, and an image
//! that cannot be decoded. Everything else (a checkpoint that exists but
//! fails to deserialize, device failures) propagates to the caller; those
//! runs produce no JSON at all.

use std::path::{Path, PathBuf};

use burn::tensor::backend::Backend;
use tracing::info;

use crate::error::{Error, Result};
use crate::inference::Predictor;
use crate::model::load_from_pytorch;
use crate::report::Report;

/// Inputs of one prediction run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Image path from the command line; `None` yields the usage error
    pub image: Option<PathBuf>,
    /// Resolved checkpoint path
    pub weights: PathBuf,
}

/// Run the pipeline end to end against the given device.
///
/// Checks run in a fixed order: the image argument first, the checkpoint's
/// existence second. An absent argument is reported even when the checkpoint
/// is missing too.
pub fn run<B: Backend>(options: &RunOptions, device: &B::Device) -> Result<Report> {
    let Some(image_path) = options.image.as_deref() else {
        return Ok(Report::error("No image path provided"));
    };

    if !options.weights.exists() {
        return Ok(Report::error(
            Error::WeightsNotFound(options.weights.clone()).to_string(),
        ));
    }

    let model = load_from_pytorch::<B>(&options.weights, device)?;
    let predictor = Predictor::new(model, device.clone());

    classify(&predictor, image_path)
}

/// Classify one image with an already-built predictor, mapping decode
/// failures onto the wire error shape
pub fn classify<B: Backend>(predictor: &Predictor<B>, image_path: &Path) -> Result<Report> {
    match predictor.predict_file(image_path) {
        Ok(result) => {
            info!(
                class = %result.class_name,
                confidence = result.confidence,
                time_ms = result.inference_time_ms,
                "prediction complete"
            );
            Ok(Report::from_result(&result))
        }
        Err(err @ Error::Image(_)) => Ok(Report::error(err.to_string())),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::NUM_CLASSES;
    use crate::model::ResNet18;
    use crate::preprocess::{ImagePreprocessor, PreprocessConfig};

    type TestBackend = crate::backend::DefaultBackend;

    fn device() -> <TestBackend as Backend>::Device {
        Default::default()
    }

    fn small_predictor() -> Predictor<TestBackend> {
        let device = device();
        let model = ResNet18::new(NUM_CLASSES, &device);
        Predictor::new(model, device)
            .with_preprocessor(ImagePreprocessor::new(PreprocessConfig { target_size: 64 }))
    }

    #[test]
    fn test_missing_argument_reports_usage_error() {
        let options = RunOptions {
            image: None,
            weights: PathBuf::from("/tmp/whatever.pth"),
        };

        let report = run::<TestBackend>(&options, &device()).unwrap();
        assert_eq!(
            report.to_json().unwrap(),
            r#"{"error":"No image path provided"}"#
        );
    }

    #[test]
    fn test_missing_checkpoint_reports_resolved_path() {
        let dir = tempfile::tempdir().unwrap();
        let weights = dir.path().join("best_resnet18_plantvillage.pth");
        let options = RunOptions {
            image: Some(PathBuf::from("leaf.jpg")),
            weights: weights.clone(),
        };

        let report = run::<TestBackend>(&options, &device()).unwrap();
        assert_eq!(
            report.to_json().unwrap(),
            format!(r#"{{"error":"Model file not found at {}"}}"#, weights.display())
        );
    }

    #[test]
    fn test_missing_argument_wins_over_missing_checkpoint() {
        let options = RunOptions {
            image: None,
            weights: PathBuf::from("/nonexistent/best_resnet18_plantvillage.pth"),
        };

        let report = run::<TestBackend>(&options, &device()).unwrap();
        assert!(matches!(report, Report::Error { error } if error == "No image path provided"));
    }

    #[test]
    fn test_undecodable_checkpoint_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let weights = dir.path().join("best_resnet18_plantvillage.pth");
        std::fs::write(&weights, b"junk bytes").unwrap();

        let options = RunOptions {
            image: Some(PathBuf::from("leaf.jpg")),
            weights,
        };

        let err = run::<TestBackend>(&options, &device()).unwrap_err();
        assert!(matches!(err, Error::Weights(_)));
    }

    #[test]
    fn test_classify_maps_decode_failure_in_band() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readme.txt");
        std::fs::write(&path, b"text, not pixels").unwrap();

        let report = classify(&small_predictor(), &path).unwrap();
        let Report::Error { error } = report else {
            panic!("expected in-band error");
        };
        assert!(error.starts_with("Failed to open image: "));
    }

    #[test]
    fn test_classify_produces_three_ranked_predictions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaf.png");
        image::RgbImage::from_pixel(16, 16, image::Rgb([40u8, 160u8, 60u8]))
            .save(&path)
            .unwrap();

        let report = classify(&small_predictor(), &path).unwrap();
        let Report::Predictions { predictions } = report else {
            panic!("expected predictions report");
        };

        assert_eq!(predictions.len(), 3);
        assert!(predictions[0].confidence >= predictions[1].confidence);
        assert!(predictions[1].confidence >= predictions[2].confidence);
        for prediction in &predictions {
            assert!((0.0..=1.0).contains(&prediction.confidence));
            assert!(crate::labels::class_index(&prediction.class).is_some());
        }
    }

    #[test]
    fn test_repeated_runs_emit_identical_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaf.png");
        image::RgbImage::from_fn(20, 20, |x, y| image::Rgb([x as u8 * 9, y as u8 * 9, 30]))
            .save(&path)
            .unwrap();

        let predictor = small_predictor();
        let first = classify(&predictor, &path).unwrap().to_json().unwrap();
        let second = classify(&predictor, &path).unwrap().to_json().unwrap();

        assert_eq!(first, second);
    }
}
