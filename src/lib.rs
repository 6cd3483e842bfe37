//! # PlantVillage Predict
//!
//! Single-shot plant disease classification from leaf images, built on the
//! Burn framework. Given an image path, the pipeline loads a fine-tuned
//! ResNet-18 checkpoint, runs one forward pass, and ranks the three most
//! likely of 16 PlantVillage classes.
//!
//! The `predict` binary wraps this library and prints exactly one JSON
//! object on stdout: `{"predictions": [...]}` on success, `{"error": ...}`
//! for the recoverable failures (missing argument, missing checkpoint,
//! undecodable image). All diagnostics go to stderr.
//!
//! ## Modules
//!
//! - `backend`: compile-time backend selection and accelerator detection
//! - `labels`: the fixed 16-class label table
//! - `preprocess`: RGB conversion, 224x224 resize, [0,1] scaling
//! - `model`: ResNet-18 architecture and PyTorch checkpoint loading
//! - `inference`: predictor and the command-line run policy
//! - `report`: the JSON wire contract
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use plantvillage_predict::{backend, Compute, Predictor};
//!
//! let device = backend::device_for(Compute::detect());
//! let predictor = Predictor::<backend::DefaultBackend>::from_artifact(
//!     "best_resnet18_plantvillage.pth".as_ref(),
//!     device,
//! )?;
//! let result = predictor.predict_file("leaf.jpg".as_ref())?;
//! println!("{} ({:.1}%)", result.class_name, result.confidence * 100.0);
//! ```

pub mod backend;
pub mod error;
pub mod inference;
pub mod labels;
pub mod model;
pub mod preprocess;
pub mod report;

// Re-export commonly used items for convenience
pub use backend::{backend_name, device_for, Compute, DefaultBackend};
pub use error::{Error, Result};
pub use inference::{PredictionResult, Predictor, RunOptions, TOP_K};
pub use labels::{class_name, CLASS_NAMES, NUM_CLASSES};
pub use model::{default_artifact_path, ResNet18, WEIGHTS_FILE_NAME};
pub use preprocess::{ImagePreprocessor, PreprocessConfig, IMAGE_SIZE};
pub use report::{Prediction, Report};
