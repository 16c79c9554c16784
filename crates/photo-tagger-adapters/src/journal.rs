//! JSON progress journal.
//!
//! Persists the set of processed photos plus per-session counters so a
//! re-run of the same folder skips what earlier runs already tagged.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use photo_tagger_core::{ProgressJournal, SessionStats};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default journal filename, stored in the scanned folder.
pub const JOURNAL_FILENAME: &str = ".photo-tagger-progress.json";

/// On-disk journal shape.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct JournalFile {
    processed_files: Vec<String>,
    last_processed: Option<String>,
    session_stats: Option<SessionStats>,
}

/// File-backed progress journal.
pub struct JsonJournal {
    path: PathBuf,
    processed: HashSet<String>,
    last_processed: Option<String>,
}

impl JsonJournal {
    /// Loads the journal at `path`, starting fresh when the file is
    /// missing or unreadable (a corrupt journal only costs re-tagging).
    #[must_use]
    pub fn load(path: PathBuf) -> Self {
        let file = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<JournalFile>(&content) {
                Ok(file) => file,
                Err(e) => {
                    warn!("Corrupt journal {}, starting fresh: {e}", path.display());
                    JournalFile::default()
                }
            },
            Err(_) => {
                debug!("No journal at {}, starting fresh", path.display());
                JournalFile::default()
            }
        };

        Self {
            path,
            processed: file.processed_files.into_iter().collect(),
            last_processed: file.last_processed,
        }
    }

    /// Journal path inside the given folder.
    #[must_use]
    pub fn path_in(folder: &Path) -> PathBuf {
        folder.join(JOURNAL_FILENAME)
    }

    /// Number of photos recorded as processed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.processed.len()
    }

    /// Returns true when no photo has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processed.is_empty()
    }
}

impl ProgressJournal for JsonJournal {
    fn is_processed(&self, path: &Path) -> bool {
        self.processed.contains(&path.to_string_lossy().into_owned())
    }

    fn mark_processed(&mut self, path: &Path) {
        let key = path.to_string_lossy().into_owned();
        self.last_processed = Some(key.clone());
        self.processed.insert(key);
    }

    fn save(&self, stats: &SessionStats) -> Result<()> {
        let mut processed_files: Vec<String> = self.processed.iter().cloned().collect();
        processed_files.sort();

        let file = JournalFile {
            processed_files,
            last_processed: self.last_processed.clone(),
            session_stats: Some(stats.clone()),
        };

        let json = serde_json::to_string_pretty(&file).context("Failed to serialize journal")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write journal: {}", self.path.display()))?;
        Ok(())
    }
}
