//! Error types for extraction and reading sessions

use crate::text::segmenting::SegmentingError;
use uuid::Uuid;

/// Errors from the extractor contract helpers and the session controller
#[derive(thiserror::Error, Debug)]
pub enum ReadingError {
    #[error("Invalid page range {start}-{end} for a document of {page_count} pages")]
    InvalidPageRange {
        start: usize,
        end: usize,
        page_count: usize,
    },

    #[error("Chapter {index} not found ({available} chapters)")]
    ChapterNotFound { index: usize, available: usize },

    #[error("Text extraction failed: {0}")]
    Extraction(String),

    #[error("Text decoding failed: {0}")]
    Decoding(String),

    #[error("Library item not found: {0}")]
    SessionNotFound(Uuid),

    #[error("No active reading session")]
    NoActiveSession,

    #[error("Chunk {0} not found in the active session")]
    ChunkNotFound(usize),

    #[error("Segmenting error: {0}")]
    Segmenting(#[from] SegmentingError),
}

/// Result type for reading operations
pub type Result<T> = std::result::Result<T, ReadingError>;

impl ReadingError {
    /// Create an extraction error
    pub fn extraction<S: Into<String>>(msg: S) -> Self {
        Self::Extraction(msg.into())
    }

    /// Create a decoding error
    pub fn decoding<S: Into<String>>(msg: S) -> Self {
        Self::Decoding(msg.into())
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidPageRange { .. } => "invalid_page_range",
            Self::ChapterNotFound { .. } => "chapter_not_found",
            Self::Extraction(_) => "extraction",
            Self::Decoding(_) => "decoding",
            Self::SessionNotFound(_) => "session_not_found",
            Self::NoActiveSession => "no_active_session",
            Self::ChunkNotFound(_) => "chunk_not_found",
            Self::Segmenting(_) => "segmenting",
        }
    }
}
