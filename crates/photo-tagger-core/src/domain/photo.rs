//! Decoded photo handle passed through the pipeline.

use image::{DynamicImage, GenericImageView, GrayImage, RgbImage};

/// A decoded photo with its source path and dimensions.
///
/// Owned transiently per analysis call; the pixel data is dropped before the
/// next photo is loaded so peak memory stays at roughly one decoded image.
#[derive(Debug, Clone)]
pub struct PhotoInfo {
    /// Path to the photo file.
    pub path: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Decoded image data.
    pub image: DynamicImage,
}

impl PhotoInfo {
    /// Creates a new photo handle, reading dimensions from the image.
    #[must_use]
    pub fn new(path: impl Into<String>, image: DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            path: path.into(),
            width,
            height,
            image,
        }
    }

    /// Returns the photo as an 8-bit grayscale buffer.
    #[must_use]
    pub fn to_luma8(&self) -> GrayImage {
        self.image.to_luma8()
    }

    /// Returns the photo as an 8-bit RGB buffer.
    #[must_use]
    pub fn to_rgb8(&self) -> RgbImage {
        self.image.to_rgb8()
    }
}
