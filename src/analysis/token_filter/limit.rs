//! Limit filter implementation.

use crate::analysis::attribute::AttributeSet;
use crate::analysis::stream::{BoxTokenStream, StreamState, TokenStream};
use crate::analysis::token_filter::{Filter, FilterInput};
use crate::error::Result;

/// A filter that limits the number of tokens in the stream.
#[derive(Clone, Debug)]
pub struct LimitFilter {
    limit: usize,
    consume_all_tokens: bool,
}

impl LimitFilter {
    /// Create a new limit filter with the given limit.
    pub fn new(limit: usize) -> Self {
        LimitFilter {
            limit,
            consume_all_tokens: false,
        }
    }

    /// Keep pulling upstream tokens after the limit is hit, so the upstream
    /// reaches its natural end before `end` is called.
    pub fn consume_all_tokens(mut self, consume_all_tokens: bool) -> Self {
        self.consume_all_tokens = consume_all_tokens;
        self
    }

    /// Get the limit.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Filter for LimitFilter {
    fn filter(&self, input: BoxTokenStream) -> Result<BoxTokenStream> {
        Ok(Box::new(LimitStream {
            input: FilterInput::new(input),
            limit: self.limit,
            consume_all_tokens: self.consume_all_tokens,
            emitted: 0,
            exhausted: false,
        }))
    }

    fn name(&self) -> &'static str {
        "limit"
    }
}

pub struct LimitStream {
    input: FilterInput,
    limit: usize,
    consume_all_tokens: bool,
    emitted: usize,
    exhausted: bool,
}

impl TokenStream for LimitStream {
    fn attributes(&self) -> &AttributeSet {
        self.input.attributes()
    }

    fn reset(&mut self) -> Result<()> {
        self.input.reset()?;
        self.emitted = 0;
        self.exhausted = false;
        Ok(())
    }

    fn increment_token(&mut self) -> Result<bool> {
        if !self.input.can_advance()? {
            return Ok(false);
        }

        if self.emitted < self.limit && self.input.next()? {
            self.emitted += 1;
            return Ok(self.input.advanced(true));
        }

        if self.consume_all_tokens && !self.exhausted {
            while self.input.next()? {}
        }
        self.exhausted = true;
        Ok(self.input.advanced(false))
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
        "limit"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token_filter::testing::{ScriptedStream, drain, pairs};

    fn script() -> BoxTokenStream {
        ScriptedStream::boxed(&[("hello", 1), ("world", 1), ("test", 1), ("limit", 1)])
    }

    #[test]
    fn test_limit_filter() {
        let stream = LimitFilter::new(2).filter(script()).unwrap();
        assert_eq!(drain(stream), pairs(&[("hello", 1), ("world", 1)]));
    }

    #[test]
    fn test_limit_above_token_count() {
        let stream = LimitFilter::new(10).filter(script()).unwrap();
        assert_eq!(drain(stream).len(), 4);
    }

    #[test]
    fn test_zero_limit() {
        let stream = LimitFilter::new(0).filter(script()).unwrap();
        assert!(drain(stream).is_empty());
    }

    #[test]
    fn test_consume_all_tokens() {
        let filter = LimitFilter::new(1).consume_all_tokens(true);
        let mut stream = filter.filter(script()).unwrap();

        stream.reset().unwrap();
        assert!(stream.increment_token().unwrap());
        assert!(!stream.increment_token().unwrap());
        assert!(!stream.increment_token().unwrap());
        assert_eq!(stream.state(), StreamState::Ended);
        stream.end().unwrap();
        stream.close().unwrap();
    }

    #[test]
    fn test_filter_name() {
        let filter = LimitFilter::new(10);
        assert_eq!(filter.name(), "limit");
        assert_eq!(filter.limit(), 10);
    }
}
