//! Paragraph recovery and chunk assembly for focused reading

use super::{
    config::{SegmentingConfig, SegmentingStatistics},
    error::{Result, SegmentingError},
    types::{Chunk, SegmentedDocument},
};
use crate::text::{
    char_len, clean_segment, normalize_line_endings, sentence_pieces, split_at_sentence_newlines,
    split_paragraphs,
};
use once_cell::sync::Lazy;
use std::time::Instant;
use tracing::{debug, info};

/// Title used when the caller gives none and there is no chunk to derive one from
pub const UNTITLED_DOCUMENT: &str = "New Doc";

const TITLE_ELLIPSIS: &str = "...";

static DEFAULT_SEGMENTER: Lazy<Segmenter> = Lazy::new(Segmenter::default);

/// Segment `text` with the default policy.
pub fn segment_text(text: &str, title: Option<&str>) -> SegmentedDocument {
    DEFAULT_SEGMENTER.segment(text, title)
}

/// Splits extracted document text into display-sized chunks.
///
/// Stateless after construction; `segment` is total over all inputs and
/// returns the same chunks for the same text.
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    config: SegmentingConfig,
}

impl Segmenter {
    /// Create a segmenter with a custom policy
    pub fn new(config: SegmentingConfig) -> Result<Self> {
        config.validate().map_err(SegmentingError::configuration)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SegmentingConfig {
        &self.config
    }

    /// Segment a document. Whitespace-only input yields no chunks.
    pub fn segment(&self, text: &str, title: Option<&str>) -> SegmentedDocument {
        let (document, statistics) = self.segment_with_statistics(text, title);
        info!(
            "Segmenting completed: {} chunks for {:?}",
            document.chunks.len(),
            document.title
        );
        debug!("{}", statistics.summary());
        document
    }

    /// Segment a document and report what each stage did
    pub fn segment_with_statistics(
        &self,
        text: &str,
        title: Option<&str>,
    ) -> (SegmentedDocument, SegmentingStatistics) {
        let started = Instant::now();
        let mut statistics = SegmentingStatistics::new();

        let normalized = normalize_line_endings(text);
        statistics.input_char_count = char_len(&normalized);

        let raw_segments = self.split_raw_segments(&normalized, &mut statistics);
        let refined = self.refine_segments(raw_segments, &mut statistics);
        let mut texts = self.merge_orphans(refined, &mut statistics);

        let trimmed = text.trim();
        if texts.is_empty() && !trimmed.is_empty() {
            debug!("No chunk survived refinement, keeping the whole text as one chunk");
            statistics.used_whole_text_fallback = true;
            texts.push(trimmed.to_string());
        }

        let chunks: Vec<Chunk> = texts
            .into_iter()
            .enumerate()
            .map(|(id, text)| Chunk::new(id, text))
            .collect();
        let title = self.derive_title(title, &chunks);

        statistics.total_chunks = chunks.len();
        statistics.processing_time = started.elapsed();
        (SegmentedDocument { title, chunks }, statistics)
    }

    /// Blank-line paragraphs, or sentence-terminated lines for single-newline text
    fn split_raw_segments<'a>(
        &self,
        normalized: &'a str,
        statistics: &mut SegmentingStatistics,
    ) -> Vec<&'a str> {
        let paragraphs = split_paragraphs(normalized);

        let segments = if paragraphs.len() < self.config.fallback_max_segments
            && statistics.input_char_count > self.config.fallback_min_chars
        {
            debug!(
                "Only {} blank-line paragraphs in {} chars, splitting at sentence-ending newlines",
                paragraphs.len(),
                statistics.input_char_count
            );
            statistics.used_sentence_newline_split = true;
            split_at_sentence_newlines(normalized)
        } else {
            paragraphs
        };

        statistics.raw_segment_count = segments.len();
        segments
    }

    /// Clean every segment, drop empties and break up walls of text
    fn refine_segments(
        &self,
        raw_segments: Vec<&str>,
        statistics: &mut SegmentingStatistics,
    ) -> Vec<String> {
        let mut refined = Vec::with_capacity(raw_segments.len());

        for segment in raw_segments {
            let cleaned = clean_segment(segment);
            if cleaned.is_empty() {
                statistics.empty_segments_dropped += 1;
                continue;
            }

            let length = char_len(&cleaned);
            if length > self.config.resplit_trigger_chars {
                debug!("Segment too large ({} chars), grouping sentences", length);
                statistics.oversized_segments += 1;
                let groups = self.group_sentences(&cleaned);
                statistics.sentence_group_chunks += groups.len();
                refined.extend(groups);
            } else {
                refined.push(cleaned);
            }
        }

        refined
    }

    /// Greedily pack sentences into groups of about `resplit_target_chars`.
    ///
    /// A sentence is never divided, so a group holding one long sentence may
    /// exceed the target.
    fn group_sentences(&self, segment: &str) -> Vec<String> {
        let mut groups = Vec::new();
        let mut buffer = String::new();
        let mut buffer_len = 0;

        for piece in sentence_pieces(segment) {
            let sentence = piece.trim();
            if sentence.is_empty() {
                continue;
            }
            let sentence_len = char_len(sentence);

            if !buffer.is_empty() {
                // the joining space counts toward the group length
                if buffer_len + 1 + sentence_len > self.config.resplit_target_chars {
                    groups.push(std::mem::take(&mut buffer));
                    buffer_len = 0;
                } else {
                    buffer.push(' ');
                    buffer_len += 1;
                }
            }
            buffer.push_str(sentence);
            buffer_len += sentence_len;
        }

        if !buffer.is_empty() {
            groups.push(buffer);
        }
        groups
    }

    /// Fold short segments into the chunk before them; the first segment always stands
    fn merge_orphans(
        &self,
        refined: Vec<String>,
        statistics: &mut SegmentingStatistics,
    ) -> Vec<String> {
        let mut merged: Vec<String> = Vec::with_capacity(refined.len());

        for segment in refined {
            let is_orphan = char_len(&segment) < self.config.orphan_threshold_chars;
            if let Some(previous) = merged.last_mut().filter(|_| is_orphan) {
                previous.push(' ');
                previous.push_str(&segment);
                statistics.orphans_merged += 1;
                continue;
            }
            merged.push(segment);
        }

        merged
    }

    fn derive_title(&self, title: Option<&str>, chunks: &[Chunk]) -> String {
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            return title.to_string();
        }
        chunks
            .first()
            .map(|chunk| {
                let preview: String = chunk
                    .text
                    .chars()
                    .take(self.config.title_preview_chars)
                    .collect();
                format!("{preview}{TITLE_ELLIPSIS}")
            })
            .unwrap_or_else(|| UNTITLED_DOCUMENT.to_string())
    }
}
