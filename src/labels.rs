//! Class label table for the fine-tuned PlantVillage model.
//!
//! The order of [`CLASS_NAMES`] is the label-to-index assignment used when the
//! weights artifact was trained. Output index `i` of the network corresponds
//! to `CLASS_NAMES[i]`; reordering this table silently produces wrong (but
//! well-formed) predictions.

/// Total number of classes the classification head was trained on
pub const NUM_CLASSES: usize = 16;

/// Class names in training order.
///
/// The `PlantVillage` entry is a real class of this checkpoint: the dataset
/// root folder was picked up as a category during training.
pub const CLASS_NAMES: [&str; NUM_CLASSES] = [
    "Pepper__bell___Bacterial_spot",
    "Pepper__bell___healthy",
    "PlantVillage",
    "Potato___Early_blight",
    "Potato___Late_blight",
    "Potato___healthy",
    "Tomato_Bacterial_spot",
    "Tomato_Early_blight",
    "Tomato_Late_blight",
    "Tomato_Leaf_Mold",
    "Tomato_Septoria_leaf_spot",
    "Tomato_Spider_mites_Two_spotted_spider_mite",
    "Tomato__Target_Spot",
    "Tomato__Tomato_YellowLeaf__Curl_Virus",
    "Tomato__Tomato_mosaic_virus",
    "Tomato_healthy",
];

/// Get the class name for a given label index
pub fn class_name(label: usize) -> Option<&'static str> {
    CLASS_NAMES.get(label).copied()
}

/// Get the label index for a given class name
pub fn class_index(name: &str) -> Option<usize> {
    CLASS_NAMES.iter().position(|&n| n == name)
}

/// Check if a class represents a healthy plant (not diseased)
pub fn is_healthy_class(label: usize) -> bool {
    CLASS_NAMES
        .get(label)
        .map(|name| name.ends_with("healthy"))
        .unwrap_or(false)
}
