//! Concert-photography detectors.
//!
//! Four independent heuristics tuned for live-performance shots. The
//! numeric constants were tuned empirically on concert material; changing
//! them needs domain validation, not cleanup.

use image::DynamicImage;

use super::stats::{channel_mean_variance, luma_variance, sample_mean_stddev, sobel_variances};
use super::Capabilities;
use crate::domain::{ConcertAssessment, ConcertDetections, ConcertFailure, MotionKind};

/// Concert-mode configuration.
#[derive(Debug, Clone)]
pub struct ConcertConfig {
    /// Whether concert-mode analysis runs at all.
    pub enabled: bool,
    /// Mean sample value below which a frame counts as low light.
    pub low_light_threshold: f64,
}

impl Default for ConcertConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            low_light_threshold: 50.0,
        }
    }
}

/// Contrast above which lighting counts as stage-like.
const STAGE_CONTRAST_MIN: f64 = 60.0;
/// Brightness window for stage lighting (exclusive bounds).
const STAGE_BRIGHTNESS_RANGE: (f64, f64) = (30.0, 200.0);
/// Axis-variance ratio above which blur counts as directional.
const MOTION_RATIO_MIN: f64 = 2.0;
/// Both-axis variance ceiling for the camera-shake signature.
const SHAKE_VARIANCE_MAX: f64 = 100.0;
/// Grayscale variance above which texture counts as crowd-like.
const CROWD_VARIANCE_MIN: f64 = 1000.0;

/// Bundle of concert-photography detectors.
pub struct ConcertAnalyzer {
    config: ConcertConfig,
    capabilities: Capabilities,
}

impl ConcertAnalyzer {
    /// Creates an analyzer for the given concert configuration.
    #[must_use]
    pub const fn new(config: ConcertConfig, capabilities: Capabilities) -> Self {
        Self {
            config,
            capabilities,
        }
    }

    /// Runs the four detectors.
    ///
    /// Detectors are independent; only a degenerate input (nothing to
    /// measure) fails the analysis as a whole.
    #[must_use]
    pub fn analyze(&self, image: &DynamicImage) -> ConcertAssessment {
        let rgb = image.to_rgb8();
        if rgb.is_empty() {
            return ConcertAssessment::Failed(ConcertFailure {
                error: "image has no pixels".to_string(),
            });
        }

        let (brightness, contrast) = sample_mean_stddev(&rgb);

        let stage_lighting = contrast > STAGE_CONTRAST_MIN
            && brightness > STAGE_BRIGHTNESS_RANGE.0
            && brightness < STAGE_BRIGHTNESS_RANGE.1;

        let motion_blur = if self.capabilities.derivative_filters {
            classify_motion(image)
        } else {
            MotionKind::Unknown
        };

        let texture_variance = if self.capabilities.derivative_filters {
            luma_variance(&image.to_luma8())
        } else {
            channel_mean_variance(&rgb)
        };
        let crowd_detected = texture_variance > CROWD_VARIANCE_MIN;

        let low_light = brightness < self.config.low_light_threshold;

        ConcertAssessment::Detections(ConcertDetections {
            stage_lighting,
            motion_blur,
            crowd_detected,
            low_light,
        })
    }
}

/// Classifies directional blur from the Sobel axis variances.
fn classify_motion(image: &DynamicImage) -> MotionKind {
    let gray = image.to_luma8();
    let (x_var, y_var) = sobel_variances(&gray);

    let larger = x_var.max(y_var);
    let smaller = x_var.min(y_var);

    // A zero smaller variance with edge energy on the other axis is a
    // fully directional signature; zero on both axes falls through to
    // the low-energy branch.
    let directional = if smaller > 0.0 {
        larger / smaller > MOTION_RATIO_MIN
    } else {
        larger > 0.0
    };

    if directional {
        MotionKind::MotionBlur
    } else if x_var < SHAKE_VARIANCE_MAX && y_var < SHAKE_VARIANCE_MAX {
        MotionKind::CameraShake
    } else {
        MotionKind::Sharp
    }
}
