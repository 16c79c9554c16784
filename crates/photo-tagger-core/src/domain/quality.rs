//! Quality assessment records produced by the analysis pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-photo quality analysis report.
///
/// A sub-record is present if and only if the corresponding check was
/// enabled for the run (or, for `concert`, concert mode was enabled).
/// Immutable once returned; consumed by tag synthesis and then embedded
/// in the sidecar metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityReport {
    /// Blur assessment, when the blur check ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur: Option<BlurAssessment>,
    /// Histogram assessment, when the histogram check ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram: Option<HistogramAssessment>,
    /// Concert-mode assessment, when concert mode was enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concert: Option<ConcertAssessment>,
}

impl QualityReport {
    /// Returns true when no check produced a record.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.blur.is_none() && self.histogram.is_none() && self.concert.is_none()
    }
}

/// Result of the Laplacian-variance blur check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BlurAssessment {
    /// Variance of the Laplacian response; lower means blurrier.
    pub score: f64,
    /// Discrete blur classification.
    pub level: BlurLevel,
}

/// Discrete blur classification.
///
/// `Error` and `Unknown` are sentinel outcomes: the check failed or the
/// derivative-filter capability was unavailable. Neither produces a tag.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlurLevel {
    /// Score below a quarter of the threshold.
    VeryBlurry,
    /// Score below half of the threshold.
    Blurry,
    /// Score below the threshold.
    SlightlyBlurry,
    /// Score at or above the threshold.
    Sharp,
    /// The check failed mid-analysis.
    Error,
    /// Derivative filters were unavailable.
    Unknown,
}

impl BlurLevel {
    /// Returns the snake_case label used in tags and serialized output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VeryBlurry => "very_blurry",
            Self::Blurry => "blurry",
            Self::SlightlyBlurry => "slightly_blurry",
            Self::Sharp => "sharp",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BlurLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of the per-channel histogram check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HistogramAssessment {
    /// Fraction of samples at bin 0 across all three channels.
    pub underexposed: f64,
    /// Fraction of samples at bin 255 across all three channels.
    pub overexposed: f64,
    /// Average fraction of the 0-255 range spanned by non-empty bins.
    pub spread: f64,
    /// Discrete exposure classification.
    pub quality: ExposureQuality,
}

impl HistogramAssessment {
    /// Zeroed record with the `Error` label, returned when the check fails.
    #[must_use]
    pub const fn failed() -> Self {
        Self {
            underexposed: 0.0,
            overexposed: 0.0,
            spread: 0.0,
            quality: ExposureQuality::Error,
        }
    }
}

/// Discrete exposure classification.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExposureQuality {
    /// No exposure issue detected.
    Good,
    /// Too many samples clipped to black.
    Underexposed,
    /// Too many samples clipped to white.
    Overexposed,
    /// Histogram spans less than half the intensity range.
    LowContrast,
    /// The check failed mid-analysis.
    Error,
}

impl ExposureQuality {
    /// Returns the snake_case label used in tags and serialized output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Underexposed => "underexposed",
            Self::Overexposed => "overexposed",
            Self::LowContrast => "low_contrast",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ExposureQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the concert-mode detectors.
///
/// Either the four-detector record or, on total failure (e.g. the image
/// could not be converted for analysis), an error message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConcertAssessment {
    /// All four detectors produced a result.
    Detections(ConcertDetections),
    /// The analysis failed as a whole.
    Failed(ConcertFailure),
}

impl ConcertAssessment {
    /// Returns the detections when the analysis succeeded.
    #[must_use]
    pub const fn detections(&self) -> Option<&ConcertDetections> {
        match self {
            Self::Detections(d) => Some(d),
            Self::Failed(_) => None,
        }
    }
}

/// Per-detector concert-mode results. Detectors are independent; one
/// failing does not suppress the others.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConcertDetections {
    /// High dynamic range at moderate average brightness.
    pub stage_lighting: bool,
    /// Directional-blur classification from Sobel variances.
    pub motion_blur: MotionKind,
    /// High irregular texture density, a coarse crowd proxy.
    pub crowd_detected: bool,
    /// Mean sample value below the configured low-light threshold.
    pub low_light: bool,
}

/// Error record replacing the detections on total failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcertFailure {
    /// Human-readable failure description.
    pub error: String,
}

/// Directional-blur classification.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionKind {
    /// No directional blur signature.
    Sharp,
    /// One gradient axis dominates the other.
    MotionBlur,
    /// Uniformly low high-frequency energy in both axes.
    CameraShake,
    /// Derivative filters were unavailable.
    Unknown,
}
