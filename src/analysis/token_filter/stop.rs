//! Stop word filter implementation.
//!
//! Removes common words that carry little meaning for search. The position
//! increments of removed tokens are added to the next surviving token, so
//! phrase positions stay correct.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use tokenflow::analysis::analyzer::Analyzer;
//! use tokenflow::analysis::analyzer::pipeline::PipelineAnalyzer;
//! use tokenflow::analysis::segmenter::whitespace::WhitespaceSegmenter;
//! use tokenflow::analysis::token_filter::stop::StopFilter;
//! use tokenflow::analysis::tokenizer::SegmentingTokenizer;
//!
//! let analyzer = PipelineAnalyzer::new(Arc::new(SegmentingTokenizer::new(Arc::new(
//!     WhitespaceSegmenter::new(),
//! ))))
//! .add_filter(Arc::new(StopFilter::new()));
//!
//! let tokens = analyzer.analyze("body", "this is a test").unwrap();
//! assert_eq!(tokens.len(), 1);
//! assert_eq!(tokens[0].text, "test");
//! assert_eq!(tokens[0].position, 3);
//! ```

use std::sync::{Arc, LazyLock};

use ahash::AHashSet;

use crate::analysis::attribute::{
    AttributeHandle, AttributeSet, CharTermAttribute, PositionIncrementAttribute,
};
use crate::analysis::stream::{BoxTokenStream, StreamState, TokenStream};
use crate::analysis::token_filter::{Filter, FilterInput};
use crate::error::Result;

const DEFAULT_ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

/// Default English stop words as a set.
pub static DEFAULT_ENGLISH_STOP_WORDS_SET: LazyLock<Arc<AHashSet<String>>> = LazyLock::new(|| {
    Arc::new(
        DEFAULT_ENGLISH_STOP_WORDS
            .iter()
            .map(|&s| s.to_string())
            .collect(),
    )
});

/// A filter that removes stop words from the token stream.
#[derive(Clone, Debug)]
pub struct StopFilter {
    stop_words: Arc<AHashSet<String>>,
    ignore_case: bool,
}

impl StopFilter {
    /// Create a new stop filter with the default English stop words.
    pub fn new() -> Self {
        StopFilter {
            stop_words: Arc::clone(&DEFAULT_ENGLISH_STOP_WORDS_SET),
            ignore_case: false,
        }
    }

    /// Create a stop filter from a custom word list.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StopFilter {
            stop_words: Arc::new(words.into_iter().map(Into::into).collect()),
            ignore_case: false,
        }
    }

    /// Match stop words regardless of case.
    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        if ignore_case {
            self.stop_words = Arc::new(self.stop_words.iter().map(|w| w.to_lowercase()).collect());
        }
        self.ignore_case = ignore_case;
        self
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        if self.ignore_case {
            self.stop_words.contains(&word.to_lowercase())
        } else {
            self.stop_words.contains(word)
        }
    }

    pub fn len(&self) -> usize {
        self.stop_words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stop_words.is_empty()
    }
}

impl Default for StopFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for StopFilter {
    fn filter(&self, input: BoxTokenStream) -> Result<BoxTokenStream> {
        let input = FilterInput::new(input);
        Ok(Box::new(StopStream {
            term: input.attributes().add_attribute(),
            position_increment: input.attributes().add_attribute(),
            filter: self.clone(),
            skipped_positions: 0,
            input,
        }))
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}

pub struct StopStream {
    input: FilterInput,
    term: AttributeHandle<CharTermAttribute>,
    position_increment: AttributeHandle<PositionIncrementAttribute>,
    filter: StopFilter,
    skipped_positions: usize,
}

impl TokenStream for StopStream {
    fn attributes(&self) -> &AttributeSet {
        self.input.attributes()
    }

    fn reset(&mut self) -> Result<()> {
        self.input.reset()?;
        self.skipped_positions = 0;
        Ok(())
    }

    fn increment_token(&mut self) -> Result<bool> {
        if !self.input.can_advance()? {
            return Ok(false);
        }

        while self.input.next()? {
            let increment = self.position_increment.borrow().increment();
            if self.filter.is_stop_word(self.term.borrow().as_str()) {
                self.skipped_positions += increment;
                continue;
            }
            if self.skipped_positions > 0 {
                self.position_increment
                    .borrow_mut()
                    .set_increment(increment + self.skipped_positions);
                self.skipped_positions = 0;
            }
            return Ok(self.input.advanced(true));
        }

        Ok(self.input.advanced(false))
    }

    fn end(&mut self) -> Result<()> {
        self.input.end()?;
        if self.skipped_positions > 0 {
            let mut increment = self.position_increment.borrow_mut();
            let trailing = increment.increment() + self.skipped_positions;
            increment.set_increment(trailing);
            self.skipped_positions = 0;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.input.close()
    }

    fn state(&self) -> StreamState {
        self.input.state()
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}
