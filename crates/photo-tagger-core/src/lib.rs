//! Photo Tagger Core - Domain logic and quality analysis.
//!
//! This crate contains the core domain types, the quality analysis pipeline
//! (blur, histogram, concert-photography heuristics), quality tag synthesis,
//! and the port traits the orchestrator drives adapters through.

pub mod analysis;
pub mod domain;
pub mod ports;

pub use analysis::{
    BlurAnalyzer, Capabilities, ConcertAnalyzer, ConcertConfig, HistogramAnalyzer, QualityAnalyzer,
    QualityConfig,
};
pub use domain::{
    synthesize_quality_tags, BlurAssessment, BlurLevel, ConcertAssessment, ConcertDetections,
    ConcertFailure, ExposureQuality, HistogramAssessment, MotionKind, PhotoInfo, QualityReport,
};
pub use ports::{
    ImageSource, KeywordProvider, ProgressEvent, ProgressJournal, ProgressSink, SessionStats,
    SidecarSink,
};
