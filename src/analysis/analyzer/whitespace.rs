//! Whitespace analyzer: splits on whitespace and nothing else.

use std::any::Any;
use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::segmenter::whitespace::WhitespaceSegmenter;
use crate::analysis::stream::BoxTokenStream;
use crate::analysis::tokenizer::{SegmentingTokenizer, Tokenizer};
use crate::error::Result;

#[derive(Clone, Debug)]
pub struct WhitespaceAnalyzer {
    tokenizer: SegmentingTokenizer,
}

impl WhitespaceAnalyzer {
    pub fn new() -> Self {
        WhitespaceAnalyzer {
            tokenizer: SegmentingTokenizer::new(Arc::new(WhitespaceSegmenter::new())),
        }
    }
}

impl Default for WhitespaceAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for WhitespaceAnalyzer {
    fn build_stream(&self, _field: &str, text: &str) -> Result<BoxTokenStream> {
        self.tokenizer.tokenize(text)
    }

    fn name(&self) -> &str {
        "whitespace"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
