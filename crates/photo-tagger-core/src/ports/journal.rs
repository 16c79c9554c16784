//! Progress journal port for cross-run bookkeeping.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Counters for one tagging session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStats {
    /// Photos fully processed (sidecar written).
    pub processed: usize,
    /// Photos skipped (already journaled, no keywords, unreadable).
    pub skipped: usize,
    /// Photos that hit an error mid-processing.
    pub errors: usize,
    /// Photos whose analysis produced at least one quality tag.
    pub quality_issues: usize,
    /// Session start, RFC 3339.
    pub session_start: String,
}

/// Port for tracking which photos have been processed across runs.
pub trait ProgressJournal: Send {
    /// Returns true when the photo was processed in this or an earlier run.
    fn is_processed(&self, path: &Path) -> bool;

    /// Records the photo as processed.
    fn mark_processed(&mut self, path: &Path);

    /// Persists the journal together with the session counters.
    ///
    /// # Errors
    ///
    /// Returns an error if the journal cannot be written.
    fn save(&self, stats: &SessionStats) -> anyhow::Result<()>;
}
