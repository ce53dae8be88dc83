//! Segmenting policy and per-call statistics

use serde::Deserialize;
use std::time::Duration;

/// Thresholds driving paragraph recovery, re-splitting and orphan merging.
///
/// Defaults are the compatibility values; documents segmented with other
/// values will not line up with previously stored chunk ids.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SegmentingConfig {
    /// Blank-line split yielding fewer segments than this may be a single-newline document
    pub fallback_max_segments: usize,
    /// ... but only when the normalized text is longer than this many characters
    pub fallback_min_chars: usize,
    /// Cleaned segments longer than this are re-split at sentence boundaries
    pub resplit_trigger_chars: usize,
    /// Target size of the sentence groups produced by re-splitting
    pub resplit_target_chars: usize,
    /// Segments shorter than this merge into the previous chunk
    pub orphan_threshold_chars: usize,
    /// Characters of the first chunk used for a derived title
    pub title_preview_chars: usize,
}

impl SegmentingConfig {
    pub const FALLBACK_MAX_SEGMENTS: usize = 3;
    pub const FALLBACK_MIN_CHARS: usize = 600;
    pub const RESPLIT_TRIGGER_CHARS: usize = 1000;
    pub const RESPLIT_TARGET_CHARS: usize = 600;
    pub const ORPHAN_THRESHOLD_CHARS: usize = 60;
    pub const TITLE_PREVIEW_CHARS: usize = 30;

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), String> {
        if self.resplit_target_chars == 0 {
            return Err("resplit_target_chars must be greater than 0".to_string());
        }

        if self.resplit_target_chars > self.resplit_trigger_chars {
            return Err(
                "resplit_target_chars must not be greater than resplit_trigger_chars".to_string(),
            );
        }

        if self.fallback_max_segments == 0 {
            return Err("fallback_max_segments must be greater than 0".to_string());
        }

        if self.title_preview_chars == 0 {
            return Err("title_preview_chars must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Default for SegmentingConfig {
    fn default() -> Self {
        Self {
            fallback_max_segments: Self::FALLBACK_MAX_SEGMENTS,
            fallback_min_chars: Self::FALLBACK_MIN_CHARS,
            resplit_trigger_chars: Self::RESPLIT_TRIGGER_CHARS,
            resplit_target_chars: Self::RESPLIT_TARGET_CHARS,
            orphan_threshold_chars: Self::ORPHAN_THRESHOLD_CHARS,
            title_preview_chars: Self::TITLE_PREVIEW_CHARS,
        }
    }
}

/// What happened during one segmenting call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentingStatistics {
    pub processing_time: Duration,

    /// Input text statistics
    pub input_char_count: usize,
    pub raw_segment_count: usize,
    pub used_sentence_newline_split: bool,

    /// Refinement
    pub empty_segments_dropped: usize,
    pub oversized_segments: usize,
    pub sentence_group_chunks: usize,
    pub orphans_merged: usize,
    pub used_whole_text_fallback: bool,

    /// Output
    pub total_chunks: usize,
}

impl SegmentingStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get summary as string for logging
    pub fn summary(&self) -> String {
        format!(
            "Segmenting Stats: {} chars -> {} raw segments{} -> {} chunks in {:.2}ms | \
            dropped: {}, oversized: {} ({} groups), orphans merged: {}{}",
            self.input_char_count,
            self.raw_segment_count,
            if self.used_sentence_newline_split {
                " (sentence-newline split)"
            } else {
                ""
            },
            self.total_chunks,
            self.processing_time.as_secs_f64() * 1000.0,
            self.empty_segments_dropped,
            self.oversized_segments,
            self.sentence_group_chunks,
            self.orphans_merged,
            if self.used_whole_text_fallback {
                ", whole-text fallback"
            } else {
                ""
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SegmentingConfig::default();
        assert_eq!(config.fallback_max_segments, 3);
        assert_eq!(config.fallback_min_chars, 600);
        assert_eq!(config.resplit_trigger_chars, 1000);
        assert_eq!(config.resplit_target_chars, 600);
        assert_eq!(config.orphan_threshold_chars, 60);
        assert_eq!(config.title_preview_chars, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let config = SegmentingConfig {
            resplit_target_chars: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SegmentingConfig {
            resplit_target_chars: 1200,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SegmentingConfig {
            fallback_max_segments: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SegmentingConfig {
            title_preview_chars: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        // merging can be switched off entirely
        let config = SegmentingConfig {
            orphan_threshold_chars: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        // any text with few paragraphs goes to the sentence-newline split
        let config = SegmentingConfig {
            fallback_min_chars: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_statistics_summary() {
        let stats = SegmentingStatistics {
            input_char_count: 1200,
            raw_segment_count: 2,
            used_sentence_newline_split: true,
            orphans_merged: 1,
            total_chunks: 3,
            ..Default::default()
        };
        let summary = stats.summary();
        assert!(summary.contains("1200 chars"));
        assert!(summary.contains("(sentence-newline split)"));
        assert!(summary.contains("orphans merged: 1"));
        assert!(!summary.contains("whole-text fallback"));
    }
}
