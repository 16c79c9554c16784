//! Mock implementations of core port traits.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use photo_tagger_core::{
    ImageSource, KeywordProvider, PhotoInfo, ProgressEvent, ProgressJournal, ProgressSink,
    QualityReport, SessionStats, SidecarSink,
};

/// Mock implementation of `ImageSource` for testing.
///
/// Yields pre-built photos and tracks iteration for assertions.
pub struct MockImageSource {
    photos: Vec<PhotoInfo>,
    iteration_count: Arc<Mutex<usize>>,
}

impl MockImageSource {
    /// Creates a new mock source with the given photos.
    #[must_use]
    pub fn new(photos: Vec<PhotoInfo>) -> Self {
        Self {
            photos,
            iteration_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates an empty mock source.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Returns the number of times the source has been iterated.
    #[must_use]
    pub fn iteration_count(&self) -> usize {
        *self
            .iteration_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ImageSource for MockImageSource {
    fn photos(&self) -> Box<dyn Iterator<Item = anyhow::Result<PhotoInfo>> + Send + '_> {
        let count = Arc::clone(&self.iteration_count);
        if let Ok(mut c) = count.lock() {
            *c += 1;
        }
        Box::new(self.photos.iter().cloned().map(Ok))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.photos.len())
    }
}

/// Mock implementation of `KeywordProvider` for testing.
///
/// Returns a fixed keyword list, or errors when constructed as failing.
pub struct MockKeywordProvider {
    keywords: Vec<String>,
    fail: bool,
    call_count: Arc<Mutex<usize>>,
}

impl MockKeywordProvider {
    /// Creates a provider answering with the given keywords.
    #[must_use]
    pub fn new(keywords: Vec<&str>) -> Self {
        Self {
            keywords: keywords.into_iter().map(str::to_string).collect(),
            fail: false,
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates a provider that fails every call.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            keywords: vec![],
            fail: true,
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Returns the number of keyword calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        *self
            .call_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeywordProvider for MockKeywordProvider {
    fn keywords(&self, _photo: &PhotoInfo) -> anyhow::Result<Vec<String>> {
        if let Ok(mut c) = self.call_count.lock() {
            *c += 1;
        }
        if self.fail {
            anyhow::bail!("mock keyword provider failure");
        }
        Ok(self.keywords.clone())
    }
}

/// Mock implementation of `SidecarSink` for testing.
///
/// Captures writes for later assertions.
#[derive(Default)]
pub struct MockSidecarSink {
    writes: Arc<Mutex<Vec<(String, Vec<String>, QualityReport)>>>,
}

impl MockSidecarSink {
    /// Creates a new mock sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all captured writes as (photo path, tags, report).
    #[must_use]
    pub fn writes(&self) -> Vec<(String, Vec<String>, QualityReport)> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SidecarSink for MockSidecarSink {
    fn write(
        &self,
        photo: &PhotoInfo,
        tags: &[String],
        report: &QualityReport,
    ) -> anyhow::Result<PathBuf> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((photo.path.clone(), tags.to_vec(), report.clone()));
        Ok(PathBuf::from(format!("{}.xmp", photo.path)))
    }
}

/// Mock implementation of `ProgressJournal` for testing.
///
/// Keeps everything in memory and records save calls.
#[derive(Default)]
pub struct MockJournal {
    processed: Vec<String>,
    saves: Arc<Mutex<Vec<SessionStats>>>,
}

impl MockJournal {
    /// Creates an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a journal pre-seeded with processed paths.
    #[must_use]
    pub fn with_processed(paths: Vec<&str>) -> Self {
        Self {
            processed: paths.into_iter().map(str::to_string).collect(),
            saves: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns the stats from every save call.
    #[must_use]
    pub fn saves(&self) -> Vec<SessionStats> {
        self.saves
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ProgressJournal for MockJournal {
    fn is_processed(&self, path: &Path) -> bool {
        self.processed
            .iter()
            .any(|p| p == &path.to_string_lossy())
    }

    fn mark_processed(&mut self, path: &Path) {
        self.processed.push(path.to_string_lossy().into_owned());
    }

    fn save(&self, stats: &SessionStats) -> anyhow::Result<()> {
        self.saves
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(stats.clone());
        Ok(())
    }
}

/// Mock implementation of `ProgressSink` for testing.
///
/// Captures events for later assertions.
#[derive(Default)]
pub struct MockProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl MockProgressSink {
    /// Creates a new mock progress sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
