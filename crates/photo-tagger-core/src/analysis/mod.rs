//! Quality analysis pipeline.
//!
//! Each analyzer maps pixel statistics of a single photo to a discrete
//! quality label; no state crosses photos. Failures are localized into
//! sentinel values so quality analysis never aborts a batch.

mod blur;
mod concert;
mod histogram;
pub mod stats;

pub use blur::BlurAnalyzer;
pub use concert::{ConcertAnalyzer, ConcertConfig};
pub use histogram::{ChannelHistograms, HistogramAnalyzer};

use crate::domain::{PhotoInfo, QualityReport};

/// Optional-capability descriptor passed to analyzers at construction.
///
/// The derivative filters are compiled in, so production code uses
/// [`Capabilities::detect`]; the descriptor lets callers and tests model
/// an environment where they are absent, in which case the affected
/// checks report `unknown` instead of a score.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    /// Laplacian/Sobel derivative filters are usable.
    pub derivative_filters: bool,
}

impl Capabilities {
    /// Capabilities of the running process.
    #[must_use]
    pub const fn detect() -> Self {
        Self {
            derivative_filters: true,
        }
    }

    /// Descriptor with the derivative filters marked unavailable.
    #[must_use]
    pub const fn without_derivative_filters() -> Self {
        Self {
            derivative_filters: false,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::detect()
    }
}

/// Per-run quality check configuration.
///
/// Constructed once at startup and shared by reference for the run.
#[derive(Debug, Clone)]
pub struct QualityConfig {
    /// Run the blur check.
    pub check_blur: bool,
    /// Run the histogram check.
    pub check_histogram: bool,
    /// Laplacian-variance threshold; lower scores are blurrier.
    pub blur_threshold: f64,
    /// Clip-fraction threshold for under/overexposure.
    pub exposure_threshold: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            check_blur: true,
            check_histogram: true,
            blur_threshold: 100.0,
            exposure_threshold: 0.1,
        }
    }
}

/// Facade running the enabled checks over one photo.
pub struct QualityAnalyzer {
    blur: Option<BlurAnalyzer>,
    histogram: Option<HistogramAnalyzer>,
    concert: Option<ConcertAnalyzer>,
}

impl QualityAnalyzer {
    /// Builds the analyzer set from the run configuration.
    #[must_use]
    pub fn new(quality: &QualityConfig, concert: &ConcertConfig, capabilities: Capabilities) -> Self {
        Self {
            blur: quality
                .check_blur
                .then(|| BlurAnalyzer::new(quality.blur_threshold, capabilities)),
            histogram: quality
                .check_histogram
                .then(|| HistogramAnalyzer::new(quality.exposure_threshold)),
            concert: concert
                .enabled
                .then(|| ConcertAnalyzer::new(concert.clone(), capabilities)),
        }
    }

    /// Analyzes one photo, producing a sub-record per enabled check.
    #[must_use]
    pub fn analyze(&self, photo: &PhotoInfo) -> QualityReport {
        QualityReport {
            blur: self.blur.as_ref().map(|a| a.analyze(&photo.image)),
            histogram: self.histogram.as_ref().map(|a| a.analyze(&photo.image)),
            concert: self.concert.as_ref().map(|a| a.analyze(&photo.image)),
        }
    }
}
