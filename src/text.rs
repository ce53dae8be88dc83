pub mod segmenting;

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Characters that end a sentence for boundary detection.
pub const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Quote characters allowed to trail a terminator and still belong to the sentence.
pub const CLOSING_QUOTES: [char; 2] = ['"', '\''];

// a blank line: any whitespace run holding at least two newlines
static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("paragraph break pattern"));
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern"));
// "under- standing" -> "understanding" (PDF line-wrap artifacts)
static WRAP_HYPHEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([a-z])-\s+([a-z])").expect("hyphenation pattern"));
// runs of non-terminators closed by terminators (+ optional quote), or the unterminated rest
static SENTENCE_PIECE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[^.!?]+[.!?]+["']?|.+$"#).expect("sentence pattern"));

fn is_terminator(c: char) -> bool {
    SENTENCE_TERMINATORS.contains(&c)
}

fn is_closing_quote(c: char) -> bool {
    CLOSING_QUOTES.contains(&c)
}

/// Convert `CR LF` pairs to a single `LF`. Borrows when there is nothing to replace.
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains("\r\n") {
        Cow::Owned(text.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Split on blank lines (whitespace runs containing two or more newlines).
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    PARAGRAPH_BREAK.split(text).collect()
}

/// Split on newlines that directly follow sentence-ending punctuation.
///
/// Equivalent to splitting on `(?<=[.!?]["']?)\s*\n`: the terminator (and an
/// optional closing quote) stays with the preceding piece, and the whitespace
/// up to and including the last newline of the run is consumed. Newlines that
/// follow anything else are continuation lines and are left in place.
pub fn split_at_sentence_newlines(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_terminator(c) {
            continue;
        }
        let mut boundary = i + c.len_utf8();
        if let Some(&(j, q)) = chars.peek() {
            if is_closing_quote(q) {
                chars.next();
                boundary = j + q.len_utf8();
            }
        }

        let mut last_newline = None;
        while let Some(&(j, w)) = chars.peek() {
            if !w.is_whitespace() {
                break;
            }
            if w == '\n' {
                last_newline = Some(j);
            }
            chars.next();
        }

        if let Some(newline) = last_newline {
            pieces.push(&text[start..boundary]);
            start = newline + 1;
        }
    }
    pieces.push(&text[start..]);
    pieces
}

/// Collapse whitespace, repair wrap hyphenation and trim.
///
/// Applying it to its own output returns the same string.
pub fn clean_segment(segment: &str) -> String {
    let mut joined = WHITESPACE_RUN.replace_all(segment, " ").into_owned();
    // a rejoined letter can open the next match, as in "word- a- b"
    while WRAP_HYPHEN.is_match(&joined) {
        joined = WRAP_HYPHEN.replace_all(&joined, "${1}${2}").into_owned();
    }
    joined.trim().to_string()
}

/// Tokenize cleaned text into sentence-like pieces.
///
/// Pieces keep their leading whitespace and together cover the whole input.
pub fn sentence_pieces(text: &str) -> Vec<&str> {
    let pieces: Vec<&str> = SENTENCE_PIECE.find_iter(text).map(|m| m.as_str()).collect();
    if pieces.is_empty() && !text.is_empty() {
        vec![text]
    } else {
        pieces
    }
}

/// Length in characters, the unit every segmenting threshold is expressed in.
#[inline]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
