//! Checkpoint resolution and loading.
//!
//! The artifact `best_resnet18_plantvillage.pth` is a torchvision ResNet-18
//! `state_dict` fine-tuned to the 16 PlantVillage classes. It is shipped
//! next to the installed binary and resolved from there, never from the
//! working directory.

use std::path::{Path, PathBuf};

use burn::module::Module;
use burn::record::{FullPrecisionSettings, Recorder};
use burn::tensor::backend::Backend;
use burn_import::pytorch::{LoadArgs, PyTorchFileRecorder};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::labels::NUM_CLASSES;
use crate::model::resnet::{ResNet18, ResNet18Record};

/// File name of the fine-tuned checkpoint, fixed at training time
pub const WEIGHTS_FILE_NAME: &str = "best_resnet18_plantvillage.pth";

/// Resolve the checkpoint path next to the running executable
pub fn default_artifact_path() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let dir = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(dir.join(WEIGHTS_FILE_NAME))
}

/// Load the fine-tuned parameters into a fresh ResNet-18.
///
/// Key remapping translates the torchvision parameter layout onto this
/// crate's module tree: `layerN.M.*` becomes `layerN.blocks.M.*` and the
/// anonymous `downsample.0`/`downsample.1` pair becomes
/// `downsample.conv`/`downsample.bn`. Linear weight transposition and batch
/// norm naming are handled by the recorder's PyTorch adapter.
///
/// Every parameter of the returned model comes from the checkpoint,
/// classification head included.
pub fn load_from_pytorch<B: Backend>(path: &Path, device: &B::Device) -> Result<ResNet18<B>> {
    info!(path = %path.display(), "loading checkpoint");

    let load_args = LoadArgs::new(path.to_path_buf())
        .with_key_remap(r"(.+)\.downsample\.0\.(.+)", "$1.downsample.conv.$2")
        .with_key_remap(r"(.+)\.downsample\.1\.(.+)", "$1.downsample.bn.$2")
        .with_key_remap(r"(layer[1-4])\.([0-9]+)\.(.+)", "$1.blocks.$2.$3");

    let record: ResNet18Record<B> = PyTorchFileRecorder::<FullPrecisionSettings>::default()
        .load(load_args, device)
        .map_err(|e| Error::Weights(e.to_string()))?;

    let model = ResNet18::new(NUM_CLASSES, device).load_record(record);
    debug!("checkpoint parameters applied");

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = crate::backend::DefaultBackend;

    #[test]
    fn test_artifact_path_sits_next_to_executable() {
        let path = default_artifact_path().unwrap();

        assert!(path.ends_with(WEIGHTS_FILE_NAME));
        let exe_dir = std::env::current_exe().unwrap().parent().unwrap().to_path_buf();
        assert_eq!(path.parent().unwrap(), exe_dir);
    }

    #[test]
    fn test_artifact_path_is_deterministic() {
        assert_eq!(
            default_artifact_path().unwrap(),
            default_artifact_path().unwrap()
        );
    }

    #[test]
    fn test_missing_checkpoint_is_a_weights_error() {
        let device = Default::default();
        let err = load_from_pytorch::<TestBackend>(Path::new("/nonexistent/model.pth"), &device)
            .unwrap_err();

        assert!(matches!(err, Error::Weights(_)));
    }

    #[test]
    fn test_corrupt_checkpoint_is_a_weights_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pth");
        std::fs::write(&path, b"definitely not a pickle").unwrap();

        let device = Default::default();
        let err = load_from_pytorch::<TestBackend>(&path, &device).unwrap_err();

        assert!(matches!(err, Error::Weights(_)));
    }
}
