//! Segmentation strategies.
//!
//! A [`Segmenter`] decides where tokens start and end. It is a pure function
//! from input text to an ordered list of [`Segment`]s; the
//! [`TokenizerStream`](crate::analysis::tokenizer::TokenizerStream) turns those
//! segments into attribute updates.
//!
//! # Available Segmenters
//!
//! - [`whitespace::WhitespaceSegmenter`] - Splits on whitespace characters
//! - [`unicode_word::UnicodeWordSegmenter`] - Uses Unicode word boundaries
//! - [`regex::RegexSegmenter`] - Regex matches, or the gaps between them
//! - [`whole::WholeSegmenter`] - Treats the entire text as a single token
//! - [`dictionary::DictionarySegmenter`] - Dictionary-driven segmentation of
//!   Han text
//!
//! # Examples
//!
//! ```
//! use tokenflow::analysis::segmenter::Segmenter;
//! use tokenflow::analysis::segmenter::whitespace::WhitespaceSegmenter;
//!
//! let text = "Hello world";
//! let segments = WhitespaceSegmenter::new().segment(text).unwrap();
//! assert_eq!(segments.len(), 2);
//! assert_eq!(segments[1].text(text), "world");
//! ```

use crate::analysis::token::TokenType;
use crate::error::Result;

/// One token span produced by a [`Segmenter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    /// Byte offset where the span starts
    pub start: usize,
    /// Byte offset where the span ends
    pub end: usize,
    /// Distance from the previous segment's position
    pub position_increment: usize,
    /// Lexical type of the span
    pub token_type: TokenType,
}

impl Segment {
    /// A span at the next position, typed [`TokenType::Word`].
    pub fn new(start: usize, end: usize) -> Self {
        Segment {
            start,
            end,
            position_increment: 1,
            token_type: TokenType::Word,
        }
    }

    pub fn with_position_increment(mut self, increment: usize) -> Self {
        self.position_increment = increment;
        self
    }

    pub fn with_token_type(mut self, token_type: TokenType) -> Self {
        self.token_type = token_type;
        self
    }

    /// The covered slice of `input`.
    pub fn text<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start..self.end]
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A pluggable segmentation policy.
///
/// Implementations are shared between many streams and must be `Send + Sync`.
pub trait Segmenter: Send + Sync {
    /// Split `text` into ordered spans.
    ///
    /// Spans must lie on char boundaries inside `text` and their start
    /// offsets must not decrease.
    fn segment(&self, text: &str) -> Result<Vec<Segment>>;

    /// Get the name of this segmenter (for debugging and configuration).
    fn name(&self) -> &'static str;

    /// Called when a stream using this segmenter is closed.
    fn release(&self) -> Result<()> {
        Ok(())
    }
}

pub mod dictionary;
pub mod regex;
pub mod unicode_word;
pub mod whitespace;
pub mod whole;
