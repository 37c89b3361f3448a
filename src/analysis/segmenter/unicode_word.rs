//! Unicode word segmenter implementation.
//!
//! Splits text using Unicode word boundary rules (UAX #29) and drops segments
//! without any alphanumeric character, such as punctuation and whitespace.
//! Han ideographs fall into one segment per character under these rules.
//!
//! # Examples
//!
//! ```
//! use tokenflow::analysis::segmenter::Segmenter;
//! use tokenflow::analysis::segmenter::unicode_word::UnicodeWordSegmenter;
//!
//! let text = "Hello, world!";
//! let segments = UnicodeWordSegmenter::new().segment(text).unwrap();
//! assert_eq!(segments[0].text(text), "Hello");
//! assert_eq!(segments[1].text(text), "world");
//! ```

use unicode_segmentation::UnicodeSegmentation;

use super::{Segment, Segmenter};

use crate::analysis::token::TokenType;
use crate::error::Result;

#[derive(Clone, Debug, Default)]
pub struct UnicodeWordSegmenter;

impl UnicodeWordSegmenter {
    pub fn new() -> Self {
        UnicodeWordSegmenter
    }
}

impl Segmenter for UnicodeWordSegmenter {
    fn segment(&self, text: &str) -> Result<Vec<Segment>> {
        Ok(word_segments(text, 0).collect())
    }

    fn name(&self) -> &'static str {
        "unicode_word"
    }
}

/// Word segments of `text`, with offsets shifted by `base`.
pub(crate) fn word_segments(text: &str, base: usize) -> impl Iterator<Item = Segment> + '_ {
    text.split_word_bound_indices()
        .filter(|(_, word)| word.chars().any(|c| c.is_alphanumeric()))
        .map(move |(start, word)| {
            Segment::new(base + start, base + start + word.len())
                .with_token_type(TokenType::detect(word))
        })
}
