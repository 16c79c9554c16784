//! Blur analysis via Laplacian variance.

use image::DynamicImage;

use super::stats::laplacian_variance;
use super::Capabilities;
use crate::domain::{BlurAssessment, BlurLevel};

/// Laplacian-variance blur analyzer.
///
/// The threshold partitions the score space into four levels with no gaps
/// or overlaps: `[0, t/4)` very blurry, `[t/4, t/2)` blurry, `[t/2, t)`
/// slightly blurry, `[t, inf)` sharp.
#[derive(Debug, Clone)]
pub struct BlurAnalyzer {
    threshold: f64,
    capabilities: Capabilities,
}

impl BlurAnalyzer {
    /// Creates an analyzer with the given threshold (default 100.0 at the
    /// config layer).
    #[must_use]
    pub const fn new(threshold: f64, capabilities: Capabilities) -> Self {
        Self {
            threshold,
            capabilities,
        }
    }

    /// Scores and classifies the image.
    ///
    /// Never fails: without derivative filters the result is
    /// `(0.0, Unknown)`; the score is otherwise always derived from the
    /// grayscale Laplacian response.
    #[must_use]
    pub fn analyze(&self, image: &DynamicImage) -> BlurAssessment {
        if !self.capabilities.derivative_filters {
            return BlurAssessment {
                score: 0.0,
                level: BlurLevel::Unknown,
            };
        }

        let gray = image.to_luma8();
        let score = laplacian_variance(&gray);

        BlurAssessment {
            score,
            level: self.classify(score),
        }
    }

    fn classify(&self, score: f64) -> BlurLevel {
        if score < self.threshold / 4.0 {
            BlurLevel::VeryBlurry
        } else if score < self.threshold / 2.0 {
            BlurLevel::Blurry
        } else if score < self.threshold {
            BlurLevel::SlightlyBlurry
        } else {
            BlurLevel::Sharp
        }
    }
}
