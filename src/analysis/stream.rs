//! The token stream protocol.
//!
//! Every pipeline stage implements [`TokenStream`]. A consumer drives a stream
//! through a fixed lifecycle:
//!
//! 1. Obtain attribute handles from the stream's [`AttributeSet`].
//! 2. Call [`reset`](TokenStream::reset).
//! 3. Call [`increment_token`](TokenStream::increment_token) until it returns
//!    `false`, reading the handles after each `true`.
//! 4. Call [`end`](TokenStream::end) for end-of-stream bookkeeping.
//! 5. Call [`close`](TokenStream::close) to release resources.
//!
//! ```text
//! Created --reset--> Reset --increment(true)--> Iterating --increment(false)--> Ended
//!    \________________________\______________________\___________close___________\--> Closed
//! ```
//!
//! [`AnalyzedStream`] wraps the outermost stage and guarantees that `close`
//! runs on every exit path.
//!
//! # Examples
//!
//! ```
//! use tokenflow::analysis::analyzer::Analyzer;
//! use tokenflow::analysis::analyzer::whitespace::WhitespaceAnalyzer;
//! use tokenflow::analysis::attribute::OffsetAttribute;
//!
//! let analyzer = WhitespaceAnalyzer::new();
//! let mut stream = analyzer.token_stream("body", "some text goes here").unwrap();
//! let offset = stream.add_attribute::<OffsetAttribute>();
//!
//! stream.reset().unwrap();
//! let mut spans = Vec::new();
//! while stream.increment_token().unwrap() {
//!     let offset = offset.borrow();
//!     spans.push((offset.start_offset(), offset.end_offset()));
//! }
//! stream.end().unwrap();
//! stream.close().unwrap();
//!
//! assert_eq!(spans, vec![(0, 4), (5, 9), (10, 14), (15, 19)]);
//! ```

use std::fmt;

use log::{debug, warn};
use serde::Serialize;

use crate::analysis::attribute::{
    Attribute, AttributeHandle, AttributeSet, PositionIncrementAttribute,
};
use crate::analysis::token::{PositionTracker, Token};
use crate::error::{Result, TokenflowError};

/// Lifecycle state of a token stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamState {
    #[default]
    Created,
    Reset,
    Iterating,
    Ended,
    Closed,
}

impl StreamState {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamState::Created => "created",
            StreamState::Reset => "reset",
            StreamState::Iterating => "iterating",
            StreamState::Ended => "ended",
            StreamState::Closed => "closed",
        }
    }
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transition rules shared by all stream implementations.
///
/// The `ensure_*` methods only validate; callers apply the transition after
/// the guarded work succeeded.
#[derive(Clone, Copy, Debug, Default)]
pub struct Lifecycle {
    state: StreamState,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Binding new input is allowed unless mid-iteration or closed.
    pub fn ensure_can_bind(&self) -> Result<()> {
        match self.state {
            StreamState::Iterating | StreamState::Closed => {
                Err(TokenflowError::invalid_state("bind input", self.state))
            }
            _ => Ok(()),
        }
    }

    pub fn ensure_can_reset(&self) -> Result<()> {
        match self.state {
            StreamState::Created | StreamState::Reset => Ok(()),
            state => Err(TokenflowError::invalid_state("reset", state)),
        }
    }

    /// `Ok(false)` means the stream already reported exhaustion.
    pub fn ensure_can_increment(&self) -> Result<bool> {
        match self.state {
            StreamState::Reset | StreamState::Iterating => Ok(true),
            StreamState::Ended => Ok(false),
            state => Err(TokenflowError::invalid_state("increment", state)),
        }
    }

    pub fn ensure_can_end(&self) -> Result<()> {
        match self.state {
            StreamState::Reset | StreamState::Iterating | StreamState::Ended => Ok(()),
            state => Err(TokenflowError::invalid_state("end", state)),
        }
    }

    pub fn transition(&mut self, to: StreamState) {
        self.state = to;
    }

    /// Record the outcome of an increment and pass it through.
    pub fn advanced(&mut self, has_token: bool) -> bool {
        self.state = if has_token {
            StreamState::Iterating
        } else {
            StreamState::Ended
        };
        has_token
    }

    /// Mark the stream closed. Returns `false` if it already was.
    pub fn mark_closed(&mut self) -> bool {
        if self.state == StreamState::Closed {
            false
        } else {
            self.state = StreamState::Closed;
            true
        }
    }
}

/// A stage of an analysis pipeline.
///
/// Tokenizers are leaf streams reading raw input; filters own an upstream
/// stream and share its [`AttributeSet`].
pub trait TokenStream {
    /// The attribute registry shared by the whole pipeline.
    fn attributes(&self) -> &AttributeSet;

    /// Rewind to the first token. Required before the first increment.
    fn reset(&mut self) -> Result<()>;

    /// Advance to the next token, returning `false` when exhausted.
    fn increment_token(&mut self) -> Result<bool>;

    /// End-of-stream bookkeeping, such as setting the final offset.
    fn end(&mut self) -> Result<()>;

    /// Release resources. Closing twice is a no-op.
    fn close(&mut self) -> Result<()>;

    /// Current lifecycle state.
    fn state(&self) -> StreamState;

    /// Name of this stage (for debugging).
    fn name(&self) -> &'static str;
}

/// A boxed pipeline stage.
pub type BoxTokenStream = Box<dyn TokenStream>;

/// A complete pipeline bound to a field, closed when dropped.
///
/// Closing on drop covers early returns and errors raised mid-iteration; a
/// failure to close at that point is logged, since it cannot be returned.
pub struct AnalyzedStream {
    field: String,
    stream: BoxTokenStream,
}

impl AnalyzedStream {
    pub fn new<S: Into<String>>(field: S, stream: BoxTokenStream) -> Self {
        let field = field.into();
        debug!("opened token stream '{}' for field '{field}'", stream.name());
        AnalyzedStream { field, stream }
    }

    /// The field this stream was created for.
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn attributes(&self) -> &AttributeSet {
        self.stream.attributes()
    }

    pub fn add_attribute<T: Attribute>(&self) -> AttributeHandle<T> {
        self.stream.attributes().add_attribute::<T>()
    }

    pub fn get_attribute<T: Attribute>(&self) -> Result<AttributeHandle<T>> {
        self.stream.attributes().get_attribute::<T>()
    }

    pub fn reflect_as_string(&self, prepend_kind: bool) -> String {
        self.stream.attributes().reflect_as_string(prepend_kind)
    }

    pub fn reset(&mut self) -> Result<()> {
        self.stream.reset()
    }

    pub fn increment_token(&mut self) -> Result<bool> {
        self.stream.increment_token()
    }

    pub fn end(&mut self) -> Result<()> {
        self.stream.end()
    }

    pub fn close(&mut self) -> Result<()> {
        self.stream.close()
    }

    pub fn state(&self) -> StreamState {
        self.stream.state()
    }

    /// Run the whole lifecycle, calling `on_token` after each advance.
    ///
    /// The stream is closed whether or not iteration succeeds; an iteration
    /// error takes precedence over a close error.
    pub fn consume<F>(mut self, mut on_token: F) -> Result<()>
    where
        F: FnMut(&AttributeSet) -> Result<()>,
    {
        let outcome = self.drive(&mut on_token);
        let closed = self.stream.close();
        outcome.and(closed)
    }

    /// Consume the stream into owned token snapshots with absolute positions.
    pub fn collect_tokens(self) -> Result<Vec<Token>> {
        let increment = self.add_attribute::<PositionIncrementAttribute>();
        let mut tracker = PositionTracker::new();
        let mut tokens = Vec::new();
        self.consume(|attributes| {
            let mut token = attributes.snapshot();
            token.position = tracker.advance(increment.borrow().increment());
            tokens.push(token);
            Ok(())
        })?;
        Ok(tokens)
    }

    fn drive<F>(&mut self, on_token: &mut F) -> Result<()>
    where
        F: FnMut(&AttributeSet) -> Result<()>,
    {
        self.stream.reset()?;
        while self.stream.increment_token()? {
            on_token(self.stream.attributes())?;
        }
        self.stream.end()
    }
}

impl Drop for AnalyzedStream {
    fn drop(&mut self) {
        if self.stream.state() != StreamState::Closed {
            if let Err(e) = self.stream.close() {
                warn!("failed to close token stream for field '{}': {e}", self.field);
            }
        }
    }
}

impl fmt::Debug for AnalyzedStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzedStream")
            .field("field", &self.field)
            .field("stream", &self.stream.name())
            .field("state", &self.stream.state())
            .finish()
    }
}
