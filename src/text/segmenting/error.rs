//! Error types for document segmenting

/// Errors raised while setting up a segmenter.
///
/// Segmenting text itself never fails; only an invalid policy is rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SegmentingError {
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type for segmenting operations
pub type Result<T> = std::result::Result<T, SegmentingError>;

impl SegmentingError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
        }
    }
}
