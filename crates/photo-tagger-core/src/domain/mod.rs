//! Core domain types for photo tagging.

mod photo;
mod quality;
mod tags;

pub use photo::PhotoInfo;
pub use quality::{
    BlurAssessment, BlurLevel, ConcertAssessment, ConcertDetections, ConcertFailure,
    ExposureQuality, HistogramAssessment, MotionKind, QualityReport,
};
pub use tags::synthesize_quality_tags;
