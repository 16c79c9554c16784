//! Synthetic image builders for testing.

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use photo_tagger_core::PhotoInfo;

/// Builder for creating synthetic test photos.
///
/// Provides convenience methods for generating images with specific
/// characteristics (sharp, blurry, underexposed, concert-like, etc.).
pub struct SyntheticImageBuilder;

impl SyntheticImageBuilder {
    // === Sharp/High-Contrast Images ===

    /// Creates a high-contrast checkerboard pattern (very sharp edges).
    #[must_use]
    pub fn checkerboard(width: u32, height: u32) -> PhotoInfo {
        Self::checkerboard_with_cell_size(width, height, 8)
    }

    /// Creates a checkerboard with custom cell size.
    #[must_use]
    pub fn checkerboard_with_cell_size(width: u32, height: u32, cell_size: u32) -> PhotoInfo {
        let img = GrayImage::from_fn(width, height, |x, y| {
            if (x / cell_size + y / cell_size) % 2 == 0 {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });
        PhotoInfo::new("synthetic://checkerboard", DynamicImage::ImageLuma8(img))
    }

    /// Creates vertical bars (edge energy on the x axis only).
    #[must_use]
    pub fn vertical_bars(width: u32, height: u32, bar_width: u32) -> PhotoInfo {
        let img = GrayImage::from_fn(width, height, |x, _| {
            if (x / bar_width) % 2 == 0 {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });
        PhotoInfo::new("synthetic://vertical_bars", DynamicImage::ImageLuma8(img))
    }

    /// Creates horizontal bars (edge energy on the y axis only).
    #[must_use]
    pub fn horizontal_bars(width: u32, height: u32, bar_height: u32) -> PhotoInfo {
        let img = GrayImage::from_fn(width, height, |_, y| {
            if (y / bar_height) % 2 == 0 {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });
        PhotoInfo::new("synthetic://horizontal_bars", DynamicImage::ImageLuma8(img))
    }

    /// Sharp, well-exposed midrange noise: high Laplacian variance,
    /// wide histogram spread, no clipped samples.
    #[must_use]
    pub fn sharp_midrange_noise(width: u32, height: u32, seed: u32) -> PhotoInfo {
        let img = GrayImage::from_fn(width, height, |x, y| {
            // 20..=235 keeps both histogram ends clear of the clip bins.
            Luma([20 + (lcg(seed ^ (y * width + x)) % 216) as u8])
        });
        PhotoInfo::new("synthetic://midrange_noise", DynamicImage::ImageLuma8(img))
    }

    // === Blurry Images ===

    /// Creates a uniform gray image (no edges, simulates severe blur).
    #[must_use]
    pub fn uniform_gray(width: u32, height: u32, value: u8) -> PhotoInfo {
        let img = GrayImage::from_fn(width, height, |_, _| Luma([value]));
        PhotoInfo::new("synthetic://uniform_gray", DynamicImage::ImageLuma8(img))
    }

    /// Creates a smooth horizontal gradient (low variance, simulates defocus).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn horizontal_gradient(width: u32, height: u32) -> PhotoInfo {
        let img = GrayImage::from_fn(width, height, |x, _| {
            let val = ((u32::from(u8::MAX) * x) / width.max(1)) as u8;
            Luma([val])
        });
        PhotoInfo::new(
            "synthetic://horizontal_gradient",
            DynamicImage::ImageLuma8(img),
        )
    }

    // === Exposure Images ===

    /// Creates a completely black image (severely underexposed).
    #[must_use]
    pub fn underexposed(width: u32, height: u32) -> PhotoInfo {
        Self::uniform_gray(width, height, 0)
    }

    /// Creates a completely white image (severely overexposed).
    #[must_use]
    pub fn overexposed(width: u32, height: u32) -> PhotoInfo {
        Self::uniform_gray(width, height, 255)
    }

    /// Creates an image with good tonal range (50-200).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn good_tonal_range(width: u32, height: u32) -> PhotoInfo {
        let img = GrayImage::from_fn(width, height, |x, _| {
            let val = 50 + ((x * 150) / width.max(1)) as u8;
            Luma([val])
        });
        PhotoInfo::new(
            "synthetic://good_tonal_range",
            DynamicImage::ImageLuma8(img),
        )
    }

    // === Concert Images ===

    /// Dark frame well below the default low-light threshold.
    #[must_use]
    pub fn dim_stage(width: u32, height: u32) -> PhotoInfo {
        Self::uniform_gray(width, height, 10)
    }

    /// High-contrast midtone blocks: the stage-lighting signature
    /// (contrast above 60 at moderate mean brightness).
    #[must_use]
    pub fn stage_lit_blocks(width: u32, height: u32) -> PhotoInfo {
        let img = GrayImage::from_fn(width, height, |x, y| {
            if (x / 8 + y / 8) % 2 == 0 {
                Luma([10u8])
            } else {
                Luma([245u8])
            }
        });
        PhotoInfo::new("synthetic://stage_lit", DynamicImage::ImageLuma8(img))
    }

    // === Special Test Images ===

    /// Creates a 1x1 pixel image (edge case).
    #[must_use]
    pub fn single_pixel(value: u8) -> PhotoInfo {
        let img = GrayImage::from_fn(1, 1, |_, _| Luma([value]));
        PhotoInfo::new("synthetic://1x1", DynamicImage::ImageLuma8(img))
    }

    /// Creates an RGB color image.
    #[must_use]
    pub fn rgb_uniform(width: u32, height: u32, r: u8, g: u8, b: u8) -> PhotoInfo {
        let img = RgbImage::from_fn(width, height, |_, _| Rgb([r, g, b]));
        PhotoInfo::new("synthetic://rgb_uniform", DynamicImage::ImageRgb8(img))
    }
}

/// Tiny deterministic hash for reproducible noise.
fn lcg(state: u32) -> u32 {
    state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkerboard_dimensions() {
        let photo = SyntheticImageBuilder::checkerboard(64, 32);
        assert_eq!(photo.width, 64);
        assert_eq!(photo.height, 32);
    }

    #[test]
    fn test_midrange_noise_stays_in_band() {
        let photo = SyntheticImageBuilder::sharp_midrange_noise(32, 32, 7);
        for pixel in photo.to_luma8().pixels() {
            assert!((20..=235).contains(&pixel[0]));
        }
    }

    #[test]
    fn test_midrange_noise_is_deterministic() {
        let a = SyntheticImageBuilder::sharp_midrange_noise(16, 16, 42);
        let b = SyntheticImageBuilder::sharp_midrange_noise(16, 16, 42);
        assert_eq!(a.to_luma8().as_raw(), b.to_luma8().as_raw());
    }
}
