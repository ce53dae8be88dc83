//! Contract with the external text extractor and the page/chapter helpers around it

use super::error::{ReadingError, Result};
use crate::text::char_len;
use crate::util::encoding::decode_to_utf8_raw;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;
use tracing::debug;

pub const FULL_DOCUMENT_TITLE: &str = "Full Document";
pub const PASTED_CONTENT_TITLE: &str = "Pasted Content";

/// Source of page-ordered plain text (e.g. a PDF text layer).
///
/// Implemented outside this crate; pages are 1-based and items must already be
/// in reading order.
pub trait TextExtractor {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Number of pages in the document
    fn page_count(&self) -> usize;

    /// Text runs of one page, in reading order
    fn page_items(&self, page: usize) -> std::result::Result<Vec<String>, Self::Error>;
}

/// Outline entry pointing at the 0-based page where a chapter begins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub title: String,
    pub page_index: usize,
}

impl Chapter {
    pub fn new<S: Into<String>>(title: S, page_index: usize) -> Self {
        Self {
            title: title.into(),
            page_index,
        }
    }
}

/// Inclusive, 1-based range of pages known to lie within a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    start: usize,
    end: usize,
}

impl PageRange {
    pub fn new(start: usize, end: usize, page_count: usize) -> Result<Self> {
        if start < 1 || end > page_count || start > end {
            return Err(ReadingError::InvalidPageRange {
                start,
                end,
                page_count,
            });
        }
        Ok(Self { start, end })
    }

    /// Every page of a document
    pub fn full(page_count: usize) -> Result<Self> {
        Self::new(1, page_count, page_count)
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn pages(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }

    pub fn title(&self) -> String {
        format!("Pages {}-{}", self.start, self.end)
    }
}

/// Pages covered by chapter `index`: from the page after its outline target up to
/// the next chapter's target, or the last page for the final chapter.
pub fn chapter_page_range(chapters: &[Chapter], index: usize, page_count: usize) -> Result<PageRange> {
    let chapter = chapters.get(index).ok_or(ReadingError::ChapterNotFound {
        index,
        available: chapters.len(),
    })?;
    let start = chapter.page_index + 1;
    let end = chapters
        .get(index + 1)
        .map(|next| next.page_index)
        .unwrap_or(page_count)
        // chapters sharing a page still read that page
        .max(start);
    PageRange::new(start, end, page_count)
}

/// Assemble the text of a page range: one page per paragraph block, items
/// space-joined, every page followed by a blank line.
pub fn extract_pages<E: TextExtractor>(extractor: &E, range: PageRange) -> Result<String> {
    let page_count = extractor.page_count();
    if range.end() > page_count {
        return Err(ReadingError::InvalidPageRange {
            start: range.start(),
            end: range.end(),
            page_count,
        });
    }

    let mut text = String::new();
    for page in range.pages() {
        let items = extractor
            .page_items(page)
            .map_err(|e| ReadingError::extraction(format!("page {page}: {e}")))?;
        text.push_str(&items.iter().join(" "));
        text.push_str("\n\n");
    }
    debug!(
        "Extracted {} chars from pages {}-{}",
        char_len(&text),
        range.start(),
        range.end()
    );
    Ok(text)
}

/// Raw text handed to the segmenter with the title it should carry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub title: Option<String>,
}

impl ExtractedText {
    pub fn new(text: String, title: Option<String>) -> Self {
        Self { text, title }
    }

    pub fn full_document<E: TextExtractor>(extractor: &E) -> Result<Self> {
        let range = PageRange::full(extractor.page_count())?;
        let text = extract_pages(extractor, range)?;
        Ok(Self::new(text, Some(FULL_DOCUMENT_TITLE.to_string())))
    }

    pub fn page_range<E: TextExtractor>(extractor: &E, start: usize, end: usize) -> Result<Self> {
        let range = PageRange::new(start, end, extractor.page_count())?;
        let text = extract_pages(extractor, range)?;
        Ok(Self::new(text, Some(range.title())))
    }

    pub fn chapter<E: TextExtractor>(extractor: &E, chapters: &[Chapter], index: usize) -> Result<Self> {
        let range = chapter_page_range(chapters, index, extractor.page_count())?;
        let text = extract_pages(extractor, range)?;
        Ok(Self::new(text, Some(chapters[index].title.clone())))
    }

    pub fn pasted<S: Into<String>>(text: S) -> Self {
        Self::new(text.into(), Some(PASTED_CONTENT_TITLE.to_string()))
    }

    /// Decode an uploaded plain-text file; the file stem becomes the title
    pub fn from_text_upload(bytes: &[u8], file_name: &str) -> Result<Self> {
        let text = decode_to_utf8_raw(bytes)
            .map_err(|e| ReadingError::decoding(format!("{file_name}: {e}")))?;
        let title = Path::new(file_name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .filter(|stem| !stem.is_empty());
        Ok(Self::new(text, title))
    }
}
