//! Network architecture and checkpoint loading.

pub mod resnet;
pub mod weights;

pub use resnet::ResNet18;
pub use weights::{default_artifact_path, load_from_pytorch, WEIGHTS_FILE_NAME};
