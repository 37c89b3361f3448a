//! Standard analyzer that provides good defaults for most use cases.
//!
//! # Pipeline
//!
//! 1. Unicode word boundaries (UAX #29)
//! 2. LowercaseFilter
//! 3. StopFilter (33 common English stop words)
//!
//! # Examples
//!
//! ```
//! use tokenflow::analysis::analyzer::Analyzer;
//! use tokenflow::analysis::analyzer::standard::StandardAnalyzer;
//!
//! let analyzer = StandardAnalyzer::new();
//! let tokens = analyzer.analyze("body", "Hello the world and test").unwrap();
//!
//! // "the" and "and" are filtered out as stop words
//! assert_eq!(tokens.len(), 3);
//! assert_eq!(tokens[0].text, "hello");
//! assert_eq!(tokens[1].text, "world");
//! assert_eq!(tokens[2].text, "test");
//! ```

use std::any::Any;
use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::segmenter::unicode_word::UnicodeWordSegmenter;
use crate::analysis::stream::BoxTokenStream;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::tokenizer::SegmentingTokenizer;
use crate::error::Result;

/// A standard analyzer: Unicode words, lowercased, without English stop words.
#[derive(Clone, Debug)]
pub struct StandardAnalyzer {
    inner: PipelineAnalyzer,
}

impl StandardAnalyzer {
    /// Create a new standard analyzer with default settings.
    pub fn new() -> Self {
        StandardAnalyzer {
            inner: Self::base().add_filter(Arc::new(StopFilter::new())),
        }
    }

    /// Create a new standard analyzer without stop word filtering.
    pub fn without_stop_words() -> Self {
        StandardAnalyzer { inner: Self::base() }
    }

    fn base() -> PipelineAnalyzer {
        let tokenizer = Arc::new(SegmentingTokenizer::new(Arc::new(
            UnicodeWordSegmenter::new(),
        )));
        PipelineAnalyzer::new(tokenizer)
            .add_filter(Arc::new(LowercaseFilter::new()))
            .with_name("standard")
    }
}

impl Default for StandardAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for StandardAnalyzer {
    fn build_stream(&self, field: &str, text: &str) -> Result<BoxTokenStream> {
        self.inner.build_stream(field, text)
    }

    fn name(&self) -> &str {
        "standard"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
