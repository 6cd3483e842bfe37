//! Image preprocessing for model input.
//!
//! The pipeline matches what the checkpoint was trained on: convert to RGB,
//! resize to 224x224 with bilinear resampling, scale channels to [0,1].
//! No mean/std normalization is applied; the network expects raw scaled
//! pixels.

use std::path::Path;

use image::{imageops::FilterType, DynamicImage, ImageBuffer, Rgb};

use crate::error::Result;

/// Input resolution expected by the network
pub const IMAGE_SIZE: u32 = 224;

/// Configuration for image preprocessing
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Target edge length; images are resized to a square of this size
    pub target_size: u32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            target_size: IMAGE_SIZE,
        }
    }
}

/// Image preprocessor producing CHW float buffers
#[derive(Debug, Clone, Default)]
pub struct ImagePreprocessor {
    config: PreprocessConfig,
}

impl ImagePreprocessor {
    /// Creates a new image preprocessor with the given configuration
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Preprocesses a decoded image into a CHW buffer scaled to [0,1]
    pub fn preprocess(&self, image: &DynamicImage) -> Vec<f32> {
        let rgb_image = image.to_rgb8();
        let resized = self.resize_image(&rgb_image);
        self.scale_image(&resized)
    }

    /// Preprocesses an image from a file path
    pub fn preprocess_from_path(&self, path: &Path) -> Result<Vec<f32>> {
        let image = image::open(path)?;
        Ok(self.preprocess(&image))
    }

    /// Resizes an image to the target square resolution.
    ///
    /// Bilinear resampling, matching the default policy of the training
    /// pipeline's resize transform.
    fn resize_image(&self, image: &ImageBuffer<Rgb<u8>, Vec<u8>>) -> ImageBuffer<Rgb<u8>, Vec<u8>> {
        let target = self.config.target_size;
        let (width, height) = image.dimensions();

        if width == target && height == target {
            return image.clone();
        }

        image::imageops::resize(image, target, target, FilterType::Triangle)
    }

    /// Scales pixel values to [0,1] in CHW layout
    fn scale_image(&self, image: &ImageBuffer<Rgb<u8>, Vec<u8>>) -> Vec<f32> {
        let (width, height) = image.dimensions();
        let num_pixels = (width * height) as usize;

        let mut scaled = Vec::with_capacity(num_pixels * 3);

        // Channel-major so the buffer reshapes directly to [1, 3, H, W]
        for channel in 0..3 {
            for y in 0..height {
                for x in 0..width {
                    let pixel = image.get_pixel(x, y);
                    scaled.push(pixel[channel] as f32 / 255.0);
                }
            }
        }

        scaled
    }

    /// Gets the expected output shape after preprocessing
    pub fn output_shape(&self) -> [usize; 3] {
        [
            3,
            self.config.target_size as usize,
            self.config.target_size as usize,
        ]
    }
}
