//! Output records of the segmenter

use serde::{Deserialize, Serialize};

/// One display-sized unit of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    /// Position in the document, contiguous from 0
    pub id: usize,
    /// Cleaned text: trimmed, single-spaced, never empty
    pub text: String,
    /// Rendering attached later by a formatting service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_text: Option<String>,
}

impl Chunk {
    pub fn new(id: usize, text: String) -> Self {
        Self {
            id,
            text,
            formatted_text: None,
        }
    }

    /// Formatted rendering when one is cached, the plain text otherwise
    pub fn display_text(&self) -> &str {
        self.formatted_text.as_deref().unwrap_or(&self.text)
    }

    /// Number of whitespace-separated words
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// A segmented document: its title and chunks in reading order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentedDocument {
    pub title: String,
    pub chunks: Vec<Chunk>,
}

impl SegmentedDocument {
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Chunk texts in order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.chunks.iter().map(|c| c.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_display_text() {
        let mut chunk = Chunk::new(0, "plain words here".to_string());
        assert_eq!(chunk.display_text(), "plain words here");
        assert_eq!(chunk.word_count(), 3);

        chunk.formatted_text = Some("**plain** words here".to_string());
        assert_eq!(chunk.display_text(), "**plain** words here");
    }

    #[test]
    fn test_chunk_serialization_shape() -> anyhow::Result<()> {
        let chunk = Chunk::new(2, "text".to_string());
        assert_eq!(
            serde_json::to_value(&chunk)?,
            serde_json::json!({ "id": 2, "text": "text" })
        );

        let parsed: Chunk =
            serde_json::from_str(r#"{"id":0,"text":"a","formattedText":"*a*"}"#)?;
        assert_eq!(parsed.formatted_text.as_deref(), Some("*a*"));
        Ok(())
    }
}
