//! Keyword provider port for the vision-language model boundary.

use crate::domain::PhotoInfo;

/// Port for generating descriptive keywords for a photo.
///
/// Implementations are expected to be slow (model inference); the
/// orchestrator calls this once per photo and treats failures as
/// per-photo, never batch-fatal.
pub trait KeywordProvider: Send + Sync {
    /// Generates descriptive keywords for the photo.
    ///
    /// Keywords are short lowercase strings in model-preference order.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be reached or produces no
    /// usable response.
    fn keywords(&self, photo: &PhotoInfo) -> anyhow::Result<Vec<String>>;
}
