//! Quality tag synthesis.

use super::{BlurLevel, ConcertAssessment, ExposureQuality, MotionKind, QualityReport};

/// Derives the ordered quality tag list from a report.
///
/// Pure function; rules apply in a fixed order (blur, exposure, then the
/// concert detectors) and tags are not deduplicated. Truncation to a
/// maximum tag count is the caller's concern.
#[must_use]
pub fn synthesize_quality_tags(report: &QualityReport) -> Vec<String> {
    let mut tags = Vec::new();

    if let Some(blur) = &report.blur {
        if matches!(blur.level, BlurLevel::VeryBlurry | BlurLevel::Blurry) {
            tags.push(format!("quality:{}", blur.level));
        }
    }

    if let Some(histogram) = &report.histogram {
        if histogram.quality != ExposureQuality::Good {
            tags.push(format!("exposure:{}", histogram.quality));
        }
    }

    if let Some(ConcertAssessment::Detections(concert)) = &report.concert {
        if concert.stage_lighting {
            tags.push("stage_lighting".to_string());
        }
        if concert.motion_blur == MotionKind::MotionBlur {
            tags.push("motion_blur".to_string());
        }
        if concert.crowd_detected {
            tags.push("crowd".to_string());
        }
        if concert.low_light {
            tags.push("low_light".to_string());
        }
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BlurAssessment, ConcertDetections, ConcertFailure, HistogramAssessment};

    fn blur(score: f64, level: BlurLevel) -> Option<BlurAssessment> {
        Some(BlurAssessment { score, level })
    }

    fn histogram(quality: ExposureQuality) -> Option<HistogramAssessment> {
        Some(HistogramAssessment {
            underexposed: 0.0,
            overexposed: 0.0,
            spread: 1.0,
            quality,
        })
    }

    #[test]
    fn test_empty_report_yields_no_tags() {
        assert!(synthesize_quality_tags(&QualityReport::default()).is_empty());
    }

    #[test]
    fn test_blur_tag_only_for_blurry_levels() {
        for (level, expected) in [
            (BlurLevel::VeryBlurry, Some("quality:very_blurry")),
            (BlurLevel::Blurry, Some("quality:blurry")),
            (BlurLevel::SlightlyBlurry, None),
            (BlurLevel::Sharp, None),
            (BlurLevel::Error, None),
            (BlurLevel::Unknown, None),
        ] {
            let report = QualityReport {
                blur: blur(10.0, level),
                ..Default::default()
            };
            let tags = synthesize_quality_tags(&report);
            match expected {
                Some(tag) => assert_eq!(tags, vec![tag.to_string()], "level {level}"),
                None => assert!(tags.is_empty(), "level {level} should yield no tag"),
            }
        }
    }

    #[test]
    fn test_exposure_tag_for_every_non_good_label() {
        for quality in [
            ExposureQuality::Underexposed,
            ExposureQuality::Overexposed,
            ExposureQuality::LowContrast,
            ExposureQuality::Error,
        ] {
            let report = QualityReport {
                histogram: histogram(quality),
                ..Default::default()
            };
            let tags = synthesize_quality_tags(&report);
            assert_eq!(tags, vec![format!("exposure:{quality}")]);
        }

        let report = QualityReport {
            histogram: histogram(ExposureQuality::Good),
            ..Default::default()
        };
        assert!(synthesize_quality_tags(&report).is_empty());
    }

    #[test]
    fn test_blur_tag_precedes_exposure_tag() {
        let report = QualityReport {
            blur: blur(30.0, BlurLevel::Blurry),
            histogram: histogram(ExposureQuality::Underexposed),
            ..Default::default()
        };
        assert_eq!(
            synthesize_quality_tags(&report),
            vec!["quality:blurry", "exposure:underexposed"]
        );
    }

    #[test]
    fn test_concert_detectors_are_independent() {
        let report = QualityReport {
            concert: Some(ConcertAssessment::Detections(ConcertDetections {
                stage_lighting: false,
                motion_blur: MotionKind::Sharp,
                crowd_detected: true,
                low_light: false,
            })),
            ..Default::default()
        };
        assert_eq!(synthesize_quality_tags(&report), vec!["crowd"]);
    }

    #[test]
    fn test_all_concert_tags_in_fixed_order() {
        let report = QualityReport {
            concert: Some(ConcertAssessment::Detections(ConcertDetections {
                stage_lighting: true,
                motion_blur: MotionKind::MotionBlur,
                crowd_detected: true,
                low_light: true,
            })),
            ..Default::default()
        };
        assert_eq!(
            synthesize_quality_tags(&report),
            vec!["stage_lighting", "motion_blur", "crowd", "low_light"]
        );
    }

    #[test]
    fn test_camera_shake_produces_no_motion_tag() {
        let report = QualityReport {
            concert: Some(ConcertAssessment::Detections(ConcertDetections {
                stage_lighting: false,
                motion_blur: MotionKind::CameraShake,
                crowd_detected: false,
                low_light: false,
            })),
            ..Default::default()
        };
        assert!(synthesize_quality_tags(&report).is_empty());
    }

    #[test]
    fn test_failed_concert_record_yields_no_tags() {
        let report = QualityReport {
            concert: Some(ConcertAssessment::Failed(ConcertFailure {
                error: "boom".into(),
            })),
            ..Default::default()
        };
        assert!(synthesize_quality_tags(&report).is_empty());
    }

    #[test]
    fn test_synthesis_is_idempotent() {
        let report = QualityReport {
            blur: blur(30.0, BlurLevel::Blurry),
            histogram: histogram(ExposureQuality::LowContrast),
            concert: Some(ConcertAssessment::Detections(ConcertDetections {
                stage_lighting: true,
                motion_blur: MotionKind::Sharp,
                crowd_detected: false,
                low_light: true,
            })),
        };
        let first = synthesize_quality_tags(&report);
        let second = synthesize_quality_tags(&report);
        assert_eq!(first, second);
        assert_eq!(
            first,
            vec![
                "quality:blurry",
                "exposure:low_contrast",
                "stage_lighting",
                "low_light"
            ]
        );
    }
}
