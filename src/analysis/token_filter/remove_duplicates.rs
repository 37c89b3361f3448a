//! Remove duplicates filter implementation.
//!
//! Drops a token when a token with the same text was already emitted at the
//! same position. The window of seen texts is cleared whenever a token with a
//! position increment above zero arrives, so repeated words at different
//! positions are kept. Surviving tokens keep their upstream order.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use tokenflow::analysis::analyzer::Analyzer;
//! use tokenflow::analysis::analyzer::pipeline::PipelineAnalyzer;
//! use tokenflow::analysis::segmenter::whitespace::WhitespaceSegmenter;
//! use tokenflow::analysis::token_filter::remove_duplicates::RemoveDuplicatesFilter;
//! use tokenflow::analysis::token_filter::synonym::SynonymFilter;
//! use tokenflow::analysis::tokenizer::SegmentingTokenizer;
//!
//! let synonyms = SynonymFilter::new().add_synonyms("quick", ["fast", "quick"]);
//! let analyzer = PipelineAnalyzer::new(Arc::new(SegmentingTokenizer::new(Arc::new(
//!     WhitespaceSegmenter::new(),
//! ))))
//! .add_filter(Arc::new(synonyms))
//! .add_filter(Arc::new(RemoveDuplicatesFilter::new()));
//!
//! let tokens = analyzer.analyze("body", "quick quick").unwrap();
//! let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(texts, vec!["quick", "fast", "quick", "fast"]);
//! ```

use ahash::AHashSet;

use crate::analysis::attribute::{
    AttributeHandle, AttributeSet, CharTermAttribute, PositionIncrementAttribute,
};
use crate::analysis::stream::{BoxTokenStream, StreamState, TokenStream};
use crate::analysis::token_filter::{Filter, FilterInput};
use crate::error::Result;

/// A filter that removes duplicate tokens stacked on one position.
#[derive(Clone, Debug, Default)]
pub struct RemoveDuplicatesFilter;

impl RemoveDuplicatesFilter {
    pub fn new() -> Self {
        RemoveDuplicatesFilter
    }
}

impl Filter for RemoveDuplicatesFilter {
    fn filter(&self, input: BoxTokenStream) -> Result<BoxTokenStream> {
        Ok(Box::new(RemoveDuplicatesStream::new(input)))
    }

    fn name(&self) -> &'static str {
        "remove_duplicates"
    }
}

pub struct RemoveDuplicatesStream {
    input: FilterInput,
    term: AttributeHandle<CharTermAttribute>,
    position_increment: AttributeHandle<PositionIncrementAttribute>,
    seen: AHashSet<String>,
}

impl RemoveDuplicatesStream {
    pub fn new(input: BoxTokenStream) -> Self {
        let input = FilterInput::new(input);
        RemoveDuplicatesStream {
            term: input.attributes().add_attribute(),
            position_increment: input.attributes().add_attribute(),
            input,
            seen: AHashSet::new(),
        }
    }
}

impl TokenStream for RemoveDuplicatesStream {
    fn attributes(&self) -> &AttributeSet {
        self.input.attributes()
    }

    fn reset(&mut self) -> Result<()> {
        self.input.reset()?;
        self.seen.clear();
        Ok(())
    }

    fn increment_token(&mut self) -> Result<bool> {
        if !self.input.can_advance()? {
            return Ok(false);
        }

        while self.input.next()? {
            if self.position_increment.borrow().increment() > 0 {
                self.seen.clear();
            }
            let term = self.term.borrow();
            if !self.seen.contains(term.as_str()) {
                self.seen.insert(term.as_str().to_string());
                drop(term);
                return Ok(self.input.advanced(true));
            }
        }

        Ok(self.input.advanced(false))
    }

    fn end(&mut self) -> Result<()> {
        self.input.end()
    }

    fn close(&mut self) -> Result<()> {
        self.seen = AHashSet::new();
        self.input.close()
    }

    fn state(&self) -> StreamState {
        self.input.state()
    }

    fn name(&self) -> &'static str {
        "remove_duplicates"
    }
}
