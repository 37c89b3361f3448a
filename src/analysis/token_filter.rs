//! Token filter implementations for token transformation.
//!
//! A [`Filter`] is a shareable factory that wraps an upstream
//! [`TokenStream`] in a new stage. The stage reads and rewrites the upstream's
//! attribute slots in place; it never creates a second attribute set.
//!
//! # Available Filters
//!
//! - [`remove_duplicates::RemoveDuplicatesFilter`] - Drops same-position duplicates
//! - [`lowercase::LowercaseFilter`] - Converts tokens to lowercase
//! - [`stop::StopFilter`] - Removes stop words
//! - [`keyword_marker::KeywordMarkerFilter`] - Protects words from normalization
//! - [`limit::LimitFilter`] - Limits number of tokens
//! - [`synonym::SynonymFilter`] - Stacks synonyms on the original's position
//!
//! # Filter Chaining
//!
//! ```text
//! Tokenizer → Lowercase → Stop Words → Synonyms → RemoveDuplicates
//! ```

use crate::analysis::attribute::AttributeSet;
use crate::analysis::stream::{BoxTokenStream, Lifecycle, StreamState, TokenStream};
use crate::error::Result;

/// Trait for filters that wrap token streams.
///
/// The trait requires `Send + Sync` so one filter can be shared by an
/// analyzer used from many threads.
pub trait Filter: Send + Sync {
    /// Wrap `input` in this filter's stage.
    fn filter(&self, input: BoxTokenStream) -> Result<BoxTokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// The upstream of a filter stage together with the stage's own lifecycle.
///
/// Filter stages delegate `reset`, `end` and `close` through this type and
/// use [`next`](Self::next) to pull upstream tokens.
pub struct FilterInput {
    input: BoxTokenStream,
    lifecycle: Lifecycle,
}

impl FilterInput {
    pub fn new(input: BoxTokenStream) -> Self {
        FilterInput {
            input,
            lifecycle: Lifecycle::new(),
        }
    }

    pub fn attributes(&self) -> &AttributeSet {
        self.input.attributes()
    }

    pub fn reset(&mut self) -> Result<()> {
        self.lifecycle.ensure_can_reset()?;
        self.input.reset()?;
        self.lifecycle.transition(StreamState::Reset);
        Ok(())
    }

    /// Whether this stage may advance. `Ok(false)` once exhausted.
    pub fn can_advance(&self) -> Result<bool> {
        self.lifecycle.ensure_can_increment()
    }

    /// Pull the next upstream token.
    pub fn next(&mut self) -> Result<bool> {
        self.input.increment_token()
    }

    /// Record this stage's increment outcome and return it.
    pub fn advanced(&mut self, has_token: bool) -> bool {
        self.lifecycle.advanced(has_token)
    }

    pub fn end(&mut self) -> Result<()> {
        self.lifecycle.ensure_can_end()?;
        self.input.end()?;
        self.lifecycle.transition(StreamState::Ended);
        Ok(())
    }

    /// Close the upstream once. The stage is marked closed even if the
    /// upstream reports an error.
    pub fn close(&mut self) -> Result<()> {
        if !self.lifecycle.mark_closed() {
            return Ok(());
        }
        self.input.close()
    }

    pub fn state(&self) -> StreamState {
        self.lifecycle.state()
    }
}

// Individual filter modules
pub mod keyword_marker;
pub mod limit;
pub mod lowercase;
pub mod remove_duplicates;
pub mod stop;
pub mod synonym;

#[cfg(test)]
pub(crate) mod testing {
    //! A scripted upstream for filter tests.

    use super::*;
    use crate::analysis::attribute::{
        AttributeHandle, CharTermAttribute, OffsetAttribute, PositionIncrementAttribute,
    };

    /// Emits `(text, position_increment)` pairs with synthetic offsets.
    pub struct ScriptedStream {
        attributes: AttributeSet,
        term: AttributeHandle<CharTermAttribute>,
        offset: AttributeHandle<OffsetAttribute>,
        increment: AttributeHandle<PositionIncrementAttribute>,
        tokens: Vec<(String, usize)>,
        cursor: usize,
        lifecycle: Lifecycle,
    }

    impl ScriptedStream {
        pub fn boxed(tokens: &[(&str, usize)]) -> BoxTokenStream {
            let attributes = AttributeSet::new();
            Box::new(ScriptedStream {
                term: attributes.add_attribute(),
                offset: attributes.add_attribute(),
                increment: attributes.add_attribute(),
                attributes,
                tokens: tokens
                    .iter()
                    .map(|(text, inc)| (text.to_string(), *inc))
                    .collect(),
                cursor: 0,
                lifecycle: Lifecycle::new(),
            })
        }
    }

    impl TokenStream for ScriptedStream {
        fn attributes(&self) -> &AttributeSet {
            &self.attributes
        }

        fn reset(&mut self) -> Result<()> {
            self.lifecycle.ensure_can_reset()?;
            self.cursor = 0;
            self.lifecycle.transition(StreamState::Reset);
            Ok(())
        }

        fn increment_token(&mut self) -> Result<bool> {
            if !self.lifecycle.ensure_can_increment()? {
                return Ok(false);
            }
            self.attributes.clear_attributes();
            let Some((text, inc)) = self.tokens.get(self.cursor) else {
                return Ok(self.lifecycle.advanced(false));
            };
            let start = self.cursor * 10;
            self.term.borrow_mut().set(text);
            self.offset.borrow_mut().set_offset(start, start + text.len());
            self.increment.borrow_mut().set_increment(*inc);
            self.cursor += 1;
            Ok(self.lifecycle.advanced(true))
        }

        fn end(&mut self) -> Result<()> {
            self.lifecycle.ensure_can_end()?;
            self.attributes.clear_attributes();
            self.increment.borrow_mut().set_increment(0);
            self.lifecycle.transition(StreamState::Ended);
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            self.lifecycle.mark_closed();
            Ok(())
        }

        fn state(&self) -> StreamState {
            self.lifecycle.state()
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    /// Drive `stream` to the end, collecting `(text, increment)` pairs.
    pub fn drain(mut stream: BoxTokenStream) -> Vec<(String, usize)> {
        let term = stream.attributes().add_attribute::<CharTermAttribute>();
        let increment = stream
            .attributes()
            .add_attribute::<PositionIncrementAttribute>();
        let mut out = Vec::new();
        stream.reset().unwrap();
        while stream.increment_token().unwrap() {
            out.push((term.borrow().as_str().to_string(), increment.borrow().increment()));
        }
        stream.end().unwrap();
        stream.close().unwrap();
        out
    }

    /// Pair helper for expected values.
    pub fn pairs(expected: &[(&str, usize)]) -> Vec<(String, usize)> {
        expected
            .iter()
            .map(|(text, inc)| (text.to_string(), *inc))
            .collect()
    }
}
