//! Whitespace segmenter implementation.

use super::{Segment, Segmenter};

use crate::analysis::token::TokenType;
use crate::error::Result;

/// A segmenter that splits text on whitespace.
#[derive(Clone, Debug, Default)]
pub struct WhitespaceSegmenter;

impl WhitespaceSegmenter {
    /// Create a new whitespace segmenter.
    pub fn new() -> Self {
        WhitespaceSegmenter
    }
}

impl Segmenter for WhitespaceSegmenter {
    fn segment(&self, text: &str) -> Result<Vec<Segment>> {
        let mut segments = Vec::new();
        let mut start = None;

        for (offset, c) in text.char_indices() {
            match (c.is_whitespace(), start) {
                (true, Some(word_start)) => {
                    segments.push(word_segment(text, word_start, offset));
                    start = None;
                }
                (false, None) => start = Some(offset),
                _ => {}
            }
        }

        if let Some(word_start) = start {
            segments.push(word_segment(text, word_start, text.len()));
        }

        Ok(segments)
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }
}

fn word_segment(text: &str, start: usize, end: usize) -> Segment {
    Segment::new(start, end).with_token_type(TokenType::detect(&text[start..end]))
}
