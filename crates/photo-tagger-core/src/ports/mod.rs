//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the domain core and external
//! adapters: image loading, the vision-language model, sidecar output, the
//! cross-run progress journal, and progress reporting.

mod image_source;
mod journal;
mod keywords;
mod progress;
mod sidecar;

pub use image_source::ImageSource;
pub use journal::{ProgressJournal, SessionStats};
pub use keywords::KeywordProvider;
pub use progress::{ProgressEvent, ProgressSink};
pub use sidecar::SidecarSink;
