//! Sidecar output port for writing tags next to photos.

use std::path::PathBuf;

use crate::domain::{PhotoInfo, QualityReport};

/// Port for writing a photo's tags and quality report to a sidecar file.
pub trait SidecarSink: Send + Sync {
    /// Writes the sidecar for one photo and returns the path written.
    ///
    /// # Errors
    ///
    /// Returns an error if the sidecar cannot be written.
    fn write(
        &self,
        photo: &PhotoInfo,
        tags: &[String],
        report: &QualityReport,
    ) -> anyhow::Result<PathBuf>;
}
