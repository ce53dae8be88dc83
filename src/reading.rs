//! Reading sessions around the segmenter: what comes in from the extractor and
//! what is tracked while a document is read.

pub mod error;
pub mod extract;
pub mod session;

pub use error::{ReadingError, Result};
pub use extract::{Chapter, ExtractedText, PageRange, TextExtractor, chapter_page_range, extract_pages};
pub use session::{AnswerOutcome, LibraryItem, LifetimeStats, SessionController, SessionStats};
