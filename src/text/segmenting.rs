//! Document segmentation for one-paragraph-at-a-time reading
//!
//! Recovers paragraph structure from extracted (often PDF) text using
//! heuristics only, then re-splits walls of text and folds short artifacts
//! such as running heads into the chunk before them.

pub mod config;
pub mod error;
pub mod segmenter;
pub mod types;

// Re-export main public interfaces
pub use config::{SegmentingConfig, SegmentingStatistics};
pub use error::{Result, SegmentingError};
pub use segmenter::{Segmenter, UNTITLED_DOCUMENT, segment_text};
pub use types::{Chunk, SegmentedDocument};
