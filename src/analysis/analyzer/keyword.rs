//! Keyword analyzer that treats the entire input as a single token.
//!
//! Useful for identifiers, tags and other exact-match fields.
//!
//! # Examples
//!
//! ```
//! use tokenflow::analysis::analyzer::Analyzer;
//! use tokenflow::analysis::analyzer::keyword::KeywordAnalyzer;
//!
//! let analyzer = KeywordAnalyzer::new();
//! let tokens = analyzer.analyze("id", "Hello World").unwrap();
//!
//! assert_eq!(tokens.len(), 1);
//! assert_eq!(tokens[0].text, "Hello World");
//! ```

use std::any::Any;
use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::segmenter::whole::WholeSegmenter;
use crate::analysis::stream::BoxTokenStream;
use crate::analysis::tokenizer::{SegmentingTokenizer, Tokenizer};
use crate::error::Result;

/// An analyzer that emits its whole input unchanged.
#[derive(Clone, Debug)]
pub struct KeywordAnalyzer {
    tokenizer: SegmentingTokenizer,
}

impl KeywordAnalyzer {
    pub fn new() -> Self {
        KeywordAnalyzer {
            tokenizer: SegmentingTokenizer::new(Arc::new(WholeSegmenter::new())),
        }
    }
}

impl Default for KeywordAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for KeywordAnalyzer {
    fn build_stream(&self, _field: &str, text: &str) -> Result<BoxTokenStream> {
        self.tokenizer.tokenize(text)
    }

    fn name(&self) -> &str {
        "keyword"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
