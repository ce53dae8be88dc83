//! Reading sessions over segmented documents
//!
//! All session state lives in [`SessionController`] and every time-dependent
//! operation takes `now` from the caller, so the controller can be driven and
//! tested without a clock. Persisting the library is left to the caller.

use super::error::{ReadingError, Result};
use super::extract::ExtractedText;
use crate::text::segmenting::{Chunk, SegmentedDocument, Segmenter};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

/// Quiz and reading counters of one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub correct_answers: u32,
    pub total_questions: u32,
    pub start_time: DateTime<Utc>,
    pub word_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl SessionStats {
    pub fn new(title: &str, now: DateTime<Utc>) -> Self {
        Self {
            correct_answers: 0,
            total_questions: 0,
            start_time: now,
            word_count: 0,
            end_time: None,
            title: Some(title.to_string()),
        }
    }

    /// Share of correct answers in percent, 0 before the first question
    pub fn accuracy_percent(&self) -> f64 {
        if self.total_questions == 0 {
            0.0
        } else {
            self.correct_answers as f64 / self.total_questions as f64 * 100.0
        }
    }
}

/// A segmented document in the reader's library with its read position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryItem {
    pub id: Uuid,
    pub title: String,
    pub chunks: Vec<Chunk>,
    pub current_index: usize,
    pub stats: SessionStats,
    /// Seconds spent reading
    pub elapsed_time: u64,
    pub last_read: DateTime<Utc>,
    pub is_complete: bool,
}

impl LibraryItem {
    pub fn new(document: SegmentedDocument, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            stats: SessionStats::new(&document.title, now),
            title: document.title,
            chunks: document.chunks,
            current_index: 0,
            elapsed_time: 0,
            last_read: now,
            is_complete: false,
        }
    }

    pub fn current_chunk(&self) -> Option<&Chunk> {
        self.chunks.get(self.current_index)
    }

    /// Position through the document in whole percent, counting the current chunk as read
    pub fn progress_percent(&self) -> u32 {
        if self.chunks.is_empty() {
            return 0;
        }
        ((self.current_index + 1) as f64 / self.chunks.len() as f64 * 100.0).round() as u32
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.elapsed_time = (now - self.stats.start_time).num_seconds().max(0) as u64;
        self.last_read = now;
    }
}

/// Result of answering the comprehension question of the current chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Wrong answer, the reader stays on the chunk
    Retry,
    /// Moved on to the chunk at this index
    Advanced(usize),
    /// The last chunk was answered correctly
    Completed,
}

/// Totals across the whole library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LifetimeStats {
    pub total_words: usize,
    /// Mean of per-document accuracy, rounded to whole percent
    pub average_accuracy: u32,
}

/// Owns the library and the active session
#[derive(Debug, Default)]
pub struct SessionController {
    segmenter: Segmenter,
    library: Vec<LibraryItem>,
    active_id: Option<Uuid>,
}

impl SessionController {
    pub fn new(segmenter: Segmenter) -> Self {
        Self::with_library(segmenter, Vec::new())
    }

    /// Resume from a library loaded by the caller; no session is active
    pub fn with_library(segmenter: Segmenter, library: Vec<LibraryItem>) -> Self {
        Self {
            segmenter,
            library,
            active_id: None,
        }
    }

    pub fn library(&self) -> &[LibraryItem] {
        &self.library
    }

    pub fn into_library(self) -> Vec<LibraryItem> {
        self.library
    }

    pub fn active_id(&self) -> Option<Uuid> {
        self.active_id
    }

    /// Segment a document, put it at the front of the library and start reading it.
    ///
    /// Returns `None` without touching the library when the text has no content.
    pub fn open_document(
        &mut self,
        text: &str,
        title: Option<&str>,
        now: DateTime<Utc>,
    ) -> Option<Uuid> {
        let document = self.segmenter.segment(text, title);
        if document.is_empty() {
            debug!("Nothing to read in {} chars of text", text.len());
            return None;
        }

        let item = LibraryItem::new(document, now);
        let id = item.id;
        info!(
            "Opened {:?} with {} chunks as {}",
            item.title,
            item.chunks.len(),
            id
        );
        self.library.insert(0, item);
        self.active_id = Some(id);
        Some(id)
    }

    pub fn open_extracted(&mut self, extracted: &ExtractedText, now: DateTime<Utc>) -> Option<Uuid> {
        self.open_document(&extracted.text, extracted.title.as_deref(), now)
    }

    /// Make a library item the active session, continuing its reading clock
    pub fn start_session(&mut self, id: Uuid, now: DateTime<Utc>) -> Result<&LibraryItem> {
        let item = self
            .library
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(ReadingError::SessionNotFound(id))?;
        item.stats.start_time = now - Duration::seconds(item.elapsed_time as i64);
        self.active_id = Some(id);
        debug!("Resumed {} at chunk {}", id, item.current_index);
        Ok(item)
    }

    pub fn active_item(&self) -> Option<&LibraryItem> {
        let id = self.active_id?;
        self.library.iter().find(|item| item.id == id)
    }

    fn active_item_mut(&mut self) -> Result<&mut LibraryItem> {
        let id = self.active_id.ok_or(ReadingError::NoActiveSession)?;
        self.library
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(ReadingError::SessionNotFound(id))
    }

    pub fn current_chunk(&self) -> Option<&Chunk> {
        self.active_item().and_then(LibraryItem::current_chunk)
    }

    /// Record the answer to the current chunk's question and move on when correct
    pub fn record_answer(&mut self, correct: bool, now: DateTime<Utc>) -> Result<AnswerOutcome> {
        let item = self.active_item_mut()?;
        let words = item.current_chunk().map(Chunk::word_count).unwrap_or(0);

        item.stats.total_questions += 1;
        item.stats.word_count += words;
        if correct {
            item.stats.correct_answers += 1;
        }

        let outcome = if !correct {
            AnswerOutcome::Retry
        } else if item.current_index + 1 < item.chunks.len() {
            item.current_index += 1;
            AnswerOutcome::Advanced(item.current_index)
        } else {
            item.is_complete = true;
            item.stats.end_time = Some(now);
            info!("Completed {:?}", item.title);
            AnswerOutcome::Completed
        };
        item.touch(now);
        Ok(outcome)
    }

    /// Cache a formatted rendering on a chunk of the active session
    pub fn attach_formatted_text(&mut self, chunk_id: usize, formatted: String) -> Result<()> {
        let item = self.active_item_mut()?;
        let chunk = item
            .chunks
            .iter_mut()
            .find(|chunk| chunk.id == chunk_id)
            .ok_or(ReadingError::ChunkNotFound(chunk_id))?;
        chunk.formatted_text = Some(formatted);
        Ok(())
    }

    /// Remove a document and its history; ends the session if it was active
    pub fn delete_item(&mut self, id: Uuid) -> Result<LibraryItem> {
        let position = self
            .library
            .iter()
            .position(|item| item.id == id)
            .ok_or(ReadingError::SessionNotFound(id))?;
        if self.active_id == Some(id) {
            self.active_id = None;
        }
        Ok(self.library.remove(position))
    }

    pub fn lifetime_stats(&self) -> LifetimeStats {
        if self.library.is_empty() {
            return LifetimeStats::default();
        }
        let total_words = self.library.iter().map(|item| item.stats.word_count).sum();
        let accuracy_sum: f64 = self
            .library
            .iter()
            .map(|item| item.stats.accuracy_percent())
            .sum();
        LifetimeStats {
            total_words,
            average_accuracy: (accuracy_sum / self.library.len() as f64).round() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const FIRST: &str = "The opening paragraph introduces the topic and is long enough to stand.";
    const SECOND: &str = "A second paragraph develops the idea further with a few more words here.";
    const THIRD: &str = "The closing paragraph wraps everything up and ends the short document.";

    fn at(minutes: u32, seconds: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, minutes, seconds).unwrap()
    }

    fn controller_with_document() -> (SessionController, Uuid) {
        let mut controller = SessionController::default();
        let text = format!("{FIRST}\n\n{SECOND}\n\n{THIRD}");
        let id = controller
            .open_document(&text, Some("Essay"), at(0, 0))
            .expect("document has content");
        (controller, id)
    }

    #[test]
    fn test_open_document() {
        let (controller, id) = controller_with_document();
        let item = controller.active_item().unwrap();

        assert_eq!(item.id, id);
        assert_eq!(item.title, "Essay");
        assert_eq!(item.chunks.len(), 3);
        assert_eq!(item.current_index, 0);
        assert_eq!(item.stats.title.as_deref(), Some("Essay"));
        assert_eq!(controller.current_chunk().unwrap().text, FIRST);
    }

    #[test]
    fn test_open_empty_document_is_noop() {
        let mut controller = SessionController::default();
        assert_eq!(controller.open_document("  \n\n ", None, at(0, 0)), None);
        assert!(controller.library().is_empty());
        assert_eq!(controller.active_id(), None);
    }

    #[test]
    fn test_new_documents_go_first() {
        let (mut controller, first_id) = controller_with_document();
        let second_id = controller
            .open_extracted(&ExtractedText::pasted(SECOND), at(1, 0))
            .unwrap();

        let ids: Vec<Uuid> = controller.library().iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![second_id, first_id]);
        assert_eq!(controller.active_id(), Some(second_id));
        assert_eq!(controller.active_item().unwrap().title, "Pasted Content");
    }

    #[test]
    fn test_answer_flow() -> anyhow::Result<()> {
        let (mut controller, _) = controller_with_document();
        let first_words = FIRST.split_whitespace().count();

        assert_eq!(controller.record_answer(false, at(0, 30))?, AnswerOutcome::Retry);
        let item = controller.active_item().unwrap();
        assert_eq!(item.current_index, 0);
        assert_eq!(item.stats.total_questions, 1);
        assert_eq!(item.stats.correct_answers, 0);
        assert_eq!(item.stats.word_count, first_words);
        assert_eq!(item.elapsed_time, 30);

        assert_eq!(
            controller.record_answer(true, at(1, 0))?,
            AnswerOutcome::Advanced(1)
        );
        assert_eq!(controller.current_chunk().unwrap().text, SECOND);

        assert_eq!(
            controller.record_answer(true, at(2, 0))?,
            AnswerOutcome::Advanced(2)
        );
        assert_eq!(controller.record_answer(true, at(3, 0))?, AnswerOutcome::Completed);

        let item = controller.active_item().unwrap();
        assert!(item.is_complete);
        assert_eq!(item.current_index, 2);
        assert_eq!(item.stats.end_time, Some(at(3, 0)));
        assert_eq!(item.stats.total_questions, 4);
        assert_eq!(item.stats.correct_answers, 3);
        assert_eq!(item.elapsed_time, 180);
        assert_eq!(item.last_read, at(3, 0));
        assert_eq!(item.progress_percent(), 100);
        Ok(())
    }

    #[test]
    fn test_answer_without_session() {
        let mut controller = SessionController::default();
        assert!(matches!(
            controller.record_answer(true, at(0, 0)),
            Err(ReadingError::NoActiveSession)
        ));
    }

    #[test]
    fn test_resume_keeps_reading_clock() -> anyhow::Result<()> {
        let (mut controller, id) = controller_with_document();
        controller.record_answer(true, at(0, 40))?;

        let library = controller.into_library();
        let mut controller = SessionController::with_library(Segmenter::default(), library);
        assert!(controller.active_item().is_none());

        let item = controller.start_session(id, at(30, 0))?;
        assert_eq!(item.current_index, 1);
        assert_eq!(item.stats.start_time, at(29, 20));

        controller.record_answer(true, at(30, 20))?;
        assert_eq!(controller.active_item().unwrap().elapsed_time, 60);
        Ok(())
    }

    #[test]
    fn test_start_unknown_session() {
        let mut controller = SessionController::default();
        let id = Uuid::new_v4();
        assert!(matches!(
            controller.start_session(id, at(0, 0)),
            Err(ReadingError::SessionNotFound(missing)) if missing == id
        ));
    }

    #[test]
    fn test_attach_formatted_text() -> anyhow::Result<()> {
        let (mut controller, _) = controller_with_document();
        controller.attach_formatted_text(1, "**A second paragraph**".to_string())?;

        let item = controller.active_item().unwrap();
        assert_eq!(item.chunks[1].display_text(), "**A second paragraph**");
        assert_eq!(item.chunks[0].formatted_text, None);

        assert!(matches!(
            controller.attach_formatted_text(7, String::new()),
            Err(ReadingError::ChunkNotFound(7))
        ));
        Ok(())
    }

    #[test]
    fn test_delete_item() -> anyhow::Result<()> {
        let (mut controller, id) = controller_with_document();
        let removed = controller.delete_item(id)?;
        assert_eq!(removed.id, id);
        assert!(controller.library().is_empty());
        assert_eq!(controller.active_id(), None);
        assert!(controller.delete_item(id).is_err());
        Ok(())
    }

    #[test]
    fn test_lifetime_stats() -> anyhow::Result<()> {
        let mut controller = SessionController::default();
        assert_eq!(controller.lifetime_stats(), LifetimeStats::default());

        controller.open_document(FIRST, None, at(0, 0));
        controller.record_answer(true, at(0, 10))?;
        controller.open_document(SECOND, None, at(1, 0));
        controller.record_answer(false, at(1, 10))?;
        controller.record_answer(true, at(1, 20))?;
        controller.open_document(THIRD, None, at(2, 0));

        let stats = controller.lifetime_stats();
        assert_eq!(
            stats.total_words,
            FIRST.split_whitespace().count() + 2 * SECOND.split_whitespace().count()
        );
        // (100 + 50 + 0) / 3
        assert_eq!(stats.average_accuracy, 50);
        Ok(())
    }

    #[test]
    fn test_library_item_serialization_shape() -> anyhow::Result<()> {
        let (controller, _) = controller_with_document();
        let value = serde_json::to_value(&controller.library()[0])?;

        for key in [
            "id",
            "title",
            "chunks",
            "currentIndex",
            "stats",
            "elapsedTime",
            "lastRead",
            "isComplete",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert!(value["stats"].get("correctAnswers").is_some());
        assert!(value["stats"].get("endTime").is_none());

        let parsed: LibraryItem = serde_json::from_value(value)?;
        assert_eq!(&parsed, &controller.library()[0]);
        Ok(())
    }
}
