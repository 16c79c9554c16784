//! Exposure analysis from per-channel intensity histograms.

use image::{DynamicImage, RgbImage};

use crate::domain::{ExposureQuality, HistogramAssessment};

/// 256-bin histograms, one per RGB channel.
#[derive(Debug, Clone)]
pub struct ChannelHistograms {
    red: [u64; 256],
    green: [u64; 256],
    blue: [u64; 256],
    total: u64,
}

impl ChannelHistograms {
    /// Computes the three channel histograms from an RGB image.
    #[must_use]
    pub fn from_rgb(image: &RgbImage) -> Self {
        let mut red = [0u64; 256];
        let mut green = [0u64; 256];
        let mut blue = [0u64; 256];
        for pixel in image.pixels() {
            red[usize::from(pixel[0])] += 1;
            green[usize::from(pixel[1])] += 1;
            blue[usize::from(pixel[2])] += 1;
        }
        let total = red.iter().sum();
        Self {
            red,
            green,
            blue,
            total,
        }
    }

    /// Returns the pixel count (each channel holds one sample per pixel).
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Fraction of samples at bin 0 across all three channels.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn clipped_black_fraction(&self) -> f64 {
        let clipped = self.red[0] + self.green[0] + self.blue[0];
        clipped as f64 / (self.total as f64 * 3.0)
    }

    /// Fraction of samples at bin 255 across all three channels.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn clipped_white_fraction(&self) -> f64 {
        let clipped = self.red[255] + self.green[255] + self.blue[255];
        clipped as f64 / (self.total as f64 * 3.0)
    }

    /// Average spread of the three channels: the fraction of the 0-255
    /// range spanned by non-empty bins, measured from both ends.
    #[must_use]
    pub fn average_spread(&self) -> f64 {
        (spread(&self.red) + spread(&self.green) + spread(&self.blue)) / 3.0
    }
}

/// Fraction of the intensity range populated by one channel's histogram.
fn spread(bins: &[u64; 256]) -> f64 {
    let leading = bins.iter().position(|&c| c > 0).unwrap_or(0);
    let trailing = bins.iter().rev().position(|&c| c > 0).unwrap_or(0);
    (255.0 - trailing as f64 - leading as f64) / 255.0
}

/// Histogram-based exposure analyzer.
#[derive(Debug, Clone)]
pub struct HistogramAnalyzer {
    exposure_threshold: f64,
}

impl HistogramAnalyzer {
    /// Creates an analyzer with the given clip-fraction threshold
    /// (default 0.1 at the config layer).
    #[must_use]
    pub const fn new(exposure_threshold: f64) -> Self {
        Self { exposure_threshold }
    }

    /// Computes clip fractions and spread, then classifies exposure.
    ///
    /// First matching rule wins: underexposed, overexposed, low contrast,
    /// good. A degenerate empty image yields the zeroed `Error` record.
    #[must_use]
    pub fn analyze(&self, image: &DynamicImage) -> HistogramAssessment {
        let rgb = image.to_rgb8();
        let histograms = ChannelHistograms::from_rgb(&rgb);
        if histograms.total() == 0 {
            return HistogramAssessment::failed();
        }

        let underexposed = histograms.clipped_black_fraction();
        let overexposed = histograms.clipped_white_fraction();
        let spread = histograms.average_spread();

        let quality = if underexposed > self.exposure_threshold {
            ExposureQuality::Underexposed
        } else if overexposed > self.exposure_threshold {
            ExposureQuality::Overexposed
        } else if spread < 0.5 {
            ExposureQuality::LowContrast
        } else {
            ExposureQuality::Good
        };

        HistogramAssessment {
            underexposed,
            overexposed,
            spread,
            quality,
        }
    }
}
