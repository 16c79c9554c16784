//! Photo Tagger Adapters - External adapters for photo-tagger.
//!
//! This crate provides adapters for:
//! - Filesystem image source (raster and RAW decode)
//! - Ollama keyword generation
//! - XMP sidecar output
//! - JSON progress journal

pub mod fs;
pub mod journal;
pub mod ollama;
pub mod xmp;

pub use fs::FsImageSource;
pub use journal::JsonJournal;
pub use ollama::OllamaClient;
pub use xmp::XmpSidecarWriter;
