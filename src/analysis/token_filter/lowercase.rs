//! Lowercase filter implementation.
//!
//! Converts token text to lowercase for case-insensitive matching. Tokens
//! marked with the keyword attribute are left untouched.

use crate::analysis::attribute::{
    AttributeHandle, AttributeSet, CharTermAttribute, KeywordAttribute,
};
use crate::analysis::stream::{BoxTokenStream, StreamState, TokenStream};
use crate::analysis::token_filter::{Filter, FilterInput};
use crate::error::Result;

/// A filter that converts tokens to lowercase.
#[derive(Clone, Debug, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    /// Create a new lowercase filter.
    pub fn new() -> Self {
        LowercaseFilter
    }
}

impl Filter for LowercaseFilter {
    fn filter(&self, input: BoxTokenStream) -> Result<BoxTokenStream> {
        Ok(Box::new(LowercaseStream::new(input)))
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}

pub struct LowercaseStream {
    input: FilterInput,
    term: AttributeHandle<CharTermAttribute>,
    keyword: AttributeHandle<KeywordAttribute>,
}

impl LowercaseStream {
    pub fn new(input: BoxTokenStream) -> Self {
        let input = FilterInput::new(input);
        LowercaseStream {
            term: input.attributes().add_attribute(),
            keyword: input.attributes().add_attribute(),
            input,
        }
    }
}

impl TokenStream for LowercaseStream {
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

        if !self.keyword.borrow().is_keyword() {
            let mut term = self.term.borrow_mut();
            if term.as_str().chars().any(char::is_uppercase) {
                let lowered = term.as_str().to_lowercase();
                term.set(&lowered);
            }
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
        "lowercase"
    }
}
