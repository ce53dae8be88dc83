//! Focused-reading document segmentation.
//!
//! ```text
//! Extractor -> ExtractedText -> Segmenter -> Vec<Chunk> -> SessionController
//! ```
//!
//! The segmenter is a pure function over text; the reading session types wrap
//! its output with read position and quiz bookkeeping for an external store.

pub mod reading;
pub mod text;
pub mod util;

pub use reading::{ReadingError, SessionController};
pub use text::segmenting::{Chunk, SegmentedDocument, Segmenter, segment_text};
