//! Tokenizers: the leaf stage of every analysis pipeline.
//!
//! A [`Tokenizer`] is a shareable factory. For each input it creates a
//! [`TokenizerStream`], which owns the pipeline's [`AttributeSet`], runs a
//! [`Segmenter`] over the input on [`reset`](TokenStream::reset) and writes one
//! segment into the attribute slots per
//! [`increment_token`](TokenStream::increment_token).
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use tokenflow::analysis::attribute::CharTermAttribute;
//! use tokenflow::analysis::segmenter::whitespace::WhitespaceSegmenter;
//! use tokenflow::analysis::stream::TokenStream;
//! use tokenflow::analysis::tokenizer::{SegmentingTokenizer, Tokenizer};
//!
//! let tokenizer = SegmentingTokenizer::new(Arc::new(WhitespaceSegmenter::new()));
//! let mut stream = tokenizer.tokenize("Hello world").unwrap();
//! let term = stream.attributes().add_attribute::<CharTermAttribute>();
//!
//! stream.reset().unwrap();
//! assert!(stream.increment_token().unwrap());
//! assert_eq!(term.borrow().as_str(), "Hello");
//! ```

use std::sync::Arc;

use log::trace;

use crate::analysis::attribute::{
    AttributeHandle, AttributeSet, CharTermAttribute, OffsetAttribute,
    PositionIncrementAttribute, PositionLengthAttribute, TypeAttribute,
};
use crate::analysis::segmenter::{Segment, Segmenter};
use crate::analysis::stream::{BoxTokenStream, Lifecycle, StreamState, TokenStream};
use crate::error::{Result, TokenflowError};

/// Trait for tokenizers that turn text into a token stream.
///
/// The trait requires `Send + Sync` so one tokenizer can serve many threads;
/// the streams it creates are single-threaded.
pub trait Tokenizer: Send + Sync {
    /// Create a leaf stream over `text`.
    fn tokenize(&self, text: &str) -> Result<BoxTokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// A tokenizer driven by a [`Segmenter`] strategy.
#[derive(Clone)]
pub struct SegmentingTokenizer {
    segmenter: Arc<dyn Segmenter>,
}

impl SegmentingTokenizer {
    pub fn new(segmenter: Arc<dyn Segmenter>) -> Self {
        SegmentingTokenizer { segmenter }
    }

    pub fn segmenter(&self) -> &Arc<dyn Segmenter> {
        &self.segmenter
    }
}

impl Tokenizer for SegmentingTokenizer {
    fn tokenize(&self, text: &str) -> Result<BoxTokenStream> {
        Ok(Box::new(TokenizerStream::new(
            Arc::clone(&self.segmenter),
            text,
        )))
    }

    fn name(&self) -> &'static str {
        self.segmenter.name()
    }
}

impl std::fmt::Debug for SegmentingTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SegmentingTokenizer")
            .field("segmenter", &self.segmenter.name())
            .finish()
    }
}

/// The leaf stream of a pipeline.
pub struct TokenizerStream {
    segmenter: Arc<dyn Segmenter>,
    attributes: AttributeSet,
    term: AttributeHandle<CharTermAttribute>,
    offset: AttributeHandle<OffsetAttribute>,
    position_increment: AttributeHandle<PositionIncrementAttribute>,
    position_length: AttributeHandle<PositionLengthAttribute>,
    token_type: AttributeHandle<TypeAttribute>,
    input: String,
    segments: Vec<Segment>,
    cursor: usize,
    lifecycle: Lifecycle,
}

impl TokenizerStream {
    pub fn new<S: Into<String>>(segmenter: Arc<dyn Segmenter>, input: S) -> Self {
        let attributes = AttributeSet::new();
        TokenizerStream {
            term: attributes.add_attribute(),
            offset: attributes.add_attribute(),
            position_increment: attributes.add_attribute(),
            position_length: attributes.add_attribute(),
            token_type: attributes.add_attribute(),
            attributes,
            segmenter,
            input: input.into(),
            segments: Vec::new(),
            cursor: 0,
            lifecycle: Lifecycle::new(),
        }
    }

    /// Bind new input. The stream must be reset again before use.
    pub fn set_input<S: Into<String>>(&mut self, input: S) -> Result<()> {
        self.lifecycle.ensure_can_bind()?;
        self.input = input.into();
        self.segments.clear();
        self.cursor = 0;
        self.lifecycle.transition(StreamState::Created);
        Ok(())
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    fn validate(&self, segments: &[Segment]) -> Result<()> {
        let mut last_start = 0;
        for segment in segments {
            if segment.start > segment.end
                || segment.end > self.input.len()
                || !self.input.is_char_boundary(segment.start)
                || !self.input.is_char_boundary(segment.end)
            {
                return Err(TokenflowError::analysis(format!(
                    "segmenter '{}' produced invalid span {}..{} for input of {} bytes",
                    self.segmenter.name(),
                    segment.start,
                    segment.end,
                    self.input.len()
                )));
            }
            if segment.start < last_start {
                return Err(TokenflowError::analysis(format!(
                    "segmenter '{}' produced span {}..{} before offset {last_start}",
                    self.segmenter.name(),
                    segment.start,
                    segment.end
                )));
            }
            last_start = segment.start;
        }
        Ok(())
    }
}

impl TokenStream for TokenizerStream {
    fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    fn reset(&mut self) -> Result<()> {
        self.lifecycle.ensure_can_reset()?;
        let segments = self.segmenter.segment(&self.input)?;
        self.validate(&segments)?;
        trace!(
            "segmenter '{}' produced {} segments",
            self.segmenter.name(),
            segments.len()
        );
        self.segments = segments;
        self.cursor = 0;
        self.attributes.clear_attributes();
        self.lifecycle.transition(StreamState::Reset);
        Ok(())
    }

    fn increment_token(&mut self) -> Result<bool> {
        if !self.lifecycle.ensure_can_increment()? {
            return Ok(false);
        }
        self.attributes.clear_attributes();

        let Some(segment) = self.segments.get(self.cursor) else {
            return Ok(self.lifecycle.advanced(false));
        };
        self.cursor += 1;

        self.term.borrow_mut().set(segment.text(&self.input));
        self.offset
            .borrow_mut()
            .set_offset(segment.start, segment.end);
        self.position_increment
            .borrow_mut()
            .set_increment(segment.position_increment);
        self.token_type
            .borrow_mut()
            .set_token_type(segment.token_type);

        Ok(self.lifecycle.advanced(true))
    }

    fn end(&mut self) -> Result<()> {
        self.lifecycle.ensure_can_end()?;
        self.attributes.clear_attributes();
        let final_offset = self.input.len();
        self.offset
            .borrow_mut()
            .set_offset(final_offset, final_offset);
        self.position_increment.borrow_mut().set_increment(0);
        self.position_length.borrow_mut().set_length(1);
        self.lifecycle.transition(StreamState::Ended);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if !self.lifecycle.mark_closed() {
            return Ok(());
        }
        self.segments = Vec::new();
        self.input = String::new();
        self.cursor = 0;
        self.segmenter.release()
    }

    fn state(&self) -> StreamState {
        self.lifecycle.state()
    }

    fn name(&self) -> &'static str {
        self.segmenter.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::segmenter::dictionary::DictionarySegmenter;
    use crate::analysis::segmenter::whitespace::WhitespaceSegmenter;
    use crate::analysis::token::TokenType;

    fn whitespace_stream(text: &str) -> TokenizerStream {
        TokenizerStream::new(Arc::new(WhitespaceSegmenter::new()), text)
    }

    struct BrokenSegmenter;

    impl Segmenter for BrokenSegmenter {
        fn segment(&self, _text: &str) -> Result<Vec<Segment>> {
            Ok(vec![Segment::new(0, 100)])
        }

        fn name(&self) -> &'static str {
            "broken"
        }

        fn release(&self) -> Result<()> {
            Err(TokenflowError::resource_release("buffer still mapped"))
        }
    }

    #[test]
    fn test_offsets_bound_each_word() {
        let text = "some text goes here";
        let mut stream = whitespace_stream(text);
        let term = stream.attributes().add_attribute::<CharTermAttribute>();
        let offset = stream.attributes().add_attribute::<OffsetAttribute>();

        stream.reset().unwrap();
        let mut count = 0;
        while stream.increment_token().unwrap() {
            let offset = offset.borrow();
            assert_eq!(
                &text[offset.start_offset()..offset.end_offset()],
                term.borrow().as_str()
            );
            count += 1;
        }
        stream.end().unwrap();
        stream.close().unwrap();

        assert_eq!(count, 4);
    }

    #[test]
    fn test_end_sets_final_offset() {
        let mut stream = whitespace_stream("trailing space   ");
        let offset = stream.attributes().add_attribute::<OffsetAttribute>();
        let increment = stream
            .attributes()
            .add_attribute::<PositionIncrementAttribute>();

        stream.reset().unwrap();
        while stream.increment_token().unwrap() {}
        stream.end().unwrap();

        assert_eq!(offset.borrow().start_offset(), 17);
        assert_eq!(offset.borrow().end_offset(), 17);
        assert_eq!(increment.borrow().increment(), 0);
        assert_eq!(stream.state(), StreamState::Ended);
    }

    #[test]
    fn test_increment_before_reset_fails() {
        let mut stream = whitespace_stream("a b");
        let err = stream.increment_token().unwrap_err();
        assert!(err.is_invalid_state());
    }

    #[test]
    fn test_reset_while_iterating_fails() {
        let mut stream = whitespace_stream("a b");
        stream.reset().unwrap();
        stream.reset().unwrap();
        assert!(stream.increment_token().unwrap());
        assert!(stream.reset().unwrap_err().is_invalid_state());
    }

    #[test]
    fn test_exhausted_stream_keeps_returning_false() {
        let mut stream = whitespace_stream("a");
        stream.reset().unwrap();
        assert!(stream.increment_token().unwrap());
        assert!(!stream.increment_token().unwrap());
        assert!(!stream.increment_token().unwrap());
    }

    #[test]
    fn test_set_input_rebinds() {
        let mut stream = whitespace_stream("first input");
        let term = stream.attributes().add_attribute::<CharTermAttribute>();
        stream.reset().unwrap();
        assert!(stream.increment_token().unwrap());
        assert!(stream.set_input("second").unwrap_err().is_invalid_state());

        while stream.increment_token().unwrap() {}
        stream.set_input("second").unwrap();
        assert_eq!(stream.state(), StreamState::Created);
        stream.reset().unwrap();
        assert!(stream.increment_token().unwrap());
        assert_eq!(term.borrow().as_str(), "second");
    }

    #[test]
    fn test_close_twice_and_use_after_close() {
        let mut stream = whitespace_stream("a");
        stream.reset().unwrap();
        stream.close().unwrap();
        stream.close().unwrap();
        assert!(stream.increment_token().unwrap_err().is_invalid_state());
        assert!(stream.end().unwrap_err().is_invalid_state());
    }

    #[test]
    fn test_invalid_segment_is_rejected() {
        let mut stream = TokenizerStream::new(Arc::new(BrokenSegmenter), "short");
        let err = stream.reset().unwrap_err();
        assert!(matches!(err, TokenflowError::Analysis(_)));
        assert_eq!(stream.state(), StreamState::Created);
    }

    #[test]
    fn test_release_error_still_closes() {
        let mut stream = TokenizerStream::new(Arc::new(BrokenSegmenter), "short");
        let err = stream.close().unwrap_err();
        assert!(matches!(err, TokenflowError::ResourceRelease(_)));
        assert_eq!(stream.state(), StreamState::Closed);
        stream.close().unwrap();
    }

    #[test]
    fn test_token_type_and_increment_from_segments() {
        let text = "我是中国人";
        let mut stream = TokenizerStream::new(Arc::new(DictionarySegmenter::new()), text);
        let token_type = stream.attributes().add_attribute::<TypeAttribute>();
        stream.reset().unwrap();
        assert!(stream.increment_token().unwrap());
        assert_eq!(token_type.borrow().token_type(), TokenType::Cjk);
    }

    #[test]
    fn test_tokenizer_name() {
        let tokenizer = SegmentingTokenizer::new(Arc::new(WhitespaceSegmenter::new()));
        assert_eq!(tokenizer.name(), "whitespace");
    }
}
