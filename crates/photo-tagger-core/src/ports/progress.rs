//! Progress reporting port for UI integration.

use super::SessionStats;

/// Events emitted during a tagging run for progress tracking.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Processing started for a photo.
    Started {
        /// Path to the photo.
        path: String,
        /// Index in the batch (0-based).
        index: usize,
        /// Total photos in batch, if known.
        total: Option<usize>,
    },
    /// A photo was tagged and its sidecar written.
    Tagged {
        /// Path to the photo.
        path: String,
        /// The merged tag list written to the sidecar.
        tags: Vec<String>,
        /// How many of the tags came from quality analysis.
        quality_tags: usize,
    },
    /// A photo was skipped.
    Skipped {
        /// Path to the photo.
        path: String,
        /// Reason for skipping.
        reason: String,
    },
    /// All photos have been processed.
    Finished {
        /// Final session counters.
        stats: SessionStats,
    },
}

/// Port for receiving progress events.
pub trait ProgressSink: Send + Sync {
    /// Called when a progress event occurs.
    fn on_event(&self, event: ProgressEvent);
}
