//! Test support utilities for photo-tagger.
//!
//! Provides mocks and synthetic image builders for testing the tagging
//! pipeline.
//!
//! # Example
//!
//! ```
//! use photo_tagger_test_support::{MockImageSource, SyntheticImageBuilder};
//!
//! // Create synthetic test photos
//! let sharp = SyntheticImageBuilder::checkerboard(128, 128);
//! let blurry = SyntheticImageBuilder::uniform_gray(128, 128, 128);
//!
//! // Create mock image source
//! let source = MockImageSource::new(vec![sharp, blurry]);
//! ```

mod builders;
mod mocks;

pub use builders::SyntheticImageBuilder;
pub use mocks::{
    MockImageSource, MockJournal, MockKeywordProvider, MockProgressSink, MockSidecarSink,
};
