//! Synonym filter implementation.
//!
//! Each token found in the synonym table is followed by its synonyms, stacked
//! on the same position (position increment 0) with the offsets of the
//! original token and type [`TokenType::Synonym`].

use std::collections::VecDeque;
use std::sync::Arc;

use ahash::AHashMap;

use crate::analysis::attribute::{
    AttributeHandle, AttributeSet, AttributeState, CharTermAttribute, PositionIncrementAttribute,
    TypeAttribute,
};
use crate::analysis::stream::{BoxTokenStream, StreamState, TokenStream};
use crate::analysis::token::TokenType;
use crate::analysis::token_filter::{Filter, FilterInput};
use crate::error::Result;

/// A filter that injects single-word synonyms.
#[derive(Clone, Debug)]
pub struct SynonymFilter {
    synonyms: Arc<AHashMap<String, Vec<String>>>,
    keep_original: bool,
}

impl SynonymFilter {
    pub fn new() -> Self {
        SynonymFilter {
            synonyms: Arc::new(AHashMap::new()),
            keep_original: true,
        }
    }

    /// Register synonyms for `word`. An empty list is ignored.
    pub fn add_synonyms<I, S>(mut self, word: &str, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let synonyms: Vec<String> = synonyms.into_iter().map(Into::into).collect();
        if !synonyms.is_empty() {
            Arc::make_mut(&mut self.synonyms)
                .entry(word.to_string())
                .or_default()
                .extend(synonyms);
        }
        self
    }

    /// Whether the original token is emitted before its synonyms.
    ///
    /// When disabled, the first synonym takes the original's place and
    /// position increment.
    pub fn keep_original(mut self, keep_original: bool) -> Self {
        self.keep_original = keep_original;
        self
    }

    pub fn synonyms_of(&self, word: &str) -> Option<&[String]> {
        self.synonyms.get(word).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.synonyms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synonyms.is_empty()
    }
}

impl Default for SynonymFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for SynonymFilter {
    fn filter(&self, input: BoxTokenStream) -> Result<BoxTokenStream> {
        let input = FilterInput::new(input);
        Ok(Box::new(SynonymStream {
            term: input.attributes().add_attribute(),
            position_increment: input.attributes().add_attribute(),
            token_type: input.attributes().add_attribute(),
            synonyms: Arc::clone(&self.synonyms),
            keep_original: self.keep_original,
            pending: VecDeque::new(),
            captured: None,
            input,
        }))
    }

    fn name(&self) -> &'static str {
        "synonym"
    }
}

pub struct SynonymStream {
    input: FilterInput,
    term: AttributeHandle<CharTermAttribute>,
    position_increment: AttributeHandle<PositionIncrementAttribute>,
    token_type: AttributeHandle<TypeAttribute>,
    synonyms: Arc<AHashMap<String, Vec<String>>>,
    keep_original: bool,
    pending: VecDeque<String>,
    captured: Option<AttributeState>,
}

impl SynonymStream {
    fn emit_synonym(&self, synonym: &str) {
        self.term.borrow_mut().set(synonym);
        self.token_type
            .borrow_mut()
            .set_token_type(TokenType::Synonym);
    }
}

impl TokenStream for SynonymStream {
    fn attributes(&self) -> &AttributeSet {
        self.input.attributes()
    }

    fn reset(&mut self) -> Result<()> {
        self.input.reset()?;
        self.pending.clear();
        self.captured = None;
        Ok(())
    }

    fn increment_token(&mut self) -> Result<bool> {
        if !self.input.can_advance()? {
            return Ok(false);
        }

        if let Some(synonym) = self.pending.pop_front() {
            if let Some(state) = &self.captured {
                self.input.attributes().restore_state(state);
            }
            self.emit_synonym(&synonym);
            self.position_increment.borrow_mut().set_increment(0);
            return Ok(self.input.advanced(true));
        }

        if !self.input.next()? {
            return Ok(self.input.advanced(false));
        }

        let found = self.synonyms.get(self.term.borrow().as_str()).cloned();
        if let Some(synonyms) = found {
            self.captured = Some(self.input.attributes().capture_state());
            self.pending.extend(synonyms);
            if !self.keep_original {
                if let Some(first) = self.pending.pop_front() {
                    self.emit_synonym(&first);
                }
            }
        }
        Ok(self.input.advanced(true))
    }

    fn end(&mut self) -> Result<()> {
        self.input.end()
    }

    fn close(&mut self) -> Result<()> {
        self.pending.clear();
        self.captured = None;
        self.input.close()
    }

    fn state(&self) -> StreamState {
        self.input.state()
    }

    fn name(&self) -> &'static str {
        "synonym"
    }
}
