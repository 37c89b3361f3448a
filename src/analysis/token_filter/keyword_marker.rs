//! Keyword marker filter implementation.
//!
//! Sets the keyword attribute on tokens from a protected word list, so that
//! normalizing filters further down the chain leave them unchanged.

use std::sync::Arc;

use ahash::AHashSet;

use crate::analysis::attribute::{
    AttributeHandle, AttributeSet, CharTermAttribute, KeywordAttribute,
};
use crate::analysis::stream::{BoxTokenStream, StreamState, TokenStream};
use crate::analysis::token_filter::{Filter, FilterInput};
use crate::error::Result;

/// A filter that marks protected words as keywords.
#[derive(Clone, Debug)]
pub struct KeywordMarkerFilter {
    keywords: Arc<AHashSet<String>>,
}

impl KeywordMarkerFilter {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KeywordMarkerFilter {
            keywords: Arc::new(keywords.into_iter().map(Into::into).collect()),
        }
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.contains(word)
    }
}

impl Filter for KeywordMarkerFilter {
    fn filter(&self, input: BoxTokenStream) -> Result<BoxTokenStream> {
        let input = FilterInput::new(input);
        Ok(Box::new(KeywordMarkerStream {
            term: input.attributes().add_attribute(),
            keyword: input.attributes().add_attribute(),
            keywords: Arc::clone(&self.keywords),
            input,
        }))
    }

    fn name(&self) -> &'static str {
        "keyword_marker"
    }
}

pub struct KeywordMarkerStream {
    input: FilterInput,
    term: AttributeHandle<CharTermAttribute>,
    keyword: AttributeHandle<KeywordAttribute>,
    keywords: Arc<AHashSet<String>>,
}

impl TokenStream for KeywordMarkerStream {
    fn attributes(&self) -> &AttributeSet {
        self.input.attributes()
    }

    fn reset(&mut self) -> Result<()> {
        self.input.reset()
    }

    fn increment_token(&mut self) -> Result<bool> {
        if !self.input.can_advance()? {
            return Ok(false);
        }
        if !self.input.next()? {
            return Ok(self.input.advanced(false));
        }

        if self.keywords.contains(self.term.borrow().as_str()) {
            self.keyword.borrow_mut().set_keyword(true);
        }
        Ok(self.input.advanced(true))
    }

    fn end(&mut self) -> Result<()> {
        self.input.end()
    }

    fn close(&mut self) -> Result<()> {
        self.input.close()
    }

    fn state(&self) -> StreamState {
        self.input.state()
    }

    fn name(&self) -> &'static str {
        "keyword_marker"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token_filter::testing::ScriptedStream;

    #[test]
    fn test_marks_only_listed_words() {
        let mut stream = KeywordMarkerFilter::new(["Rust"])
            .filter(ScriptedStream::boxed(&[("Rust", 1), ("Go", 1)]))
            .unwrap();
        let keyword = stream.attributes().add_attribute::<KeywordAttribute>();

        stream.reset().unwrap();
        assert!(stream.increment_token().unwrap());
        assert!(keyword.borrow().is_keyword());
        assert!(stream.increment_token().unwrap());
        assert!(!keyword.borrow().is_keyword());
        assert!(!stream.increment_token().unwrap());
    }

    #[test]
    fn test_filter_name() {
        let filter = KeywordMarkerFilter::new(Vec::<String>::new());
        assert_eq!(filter.name(), "keyword_marker");
        assert!(!filter.is_keyword("anything"));
    }
}
