//! Pipeline analyzer that combines a tokenizer and filters.
//!
//! This is the main building block for custom analyzers. Filters are applied
//! in the order they were added, each wrapping the stage before it.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use tokenflow::analysis::analyzer::Analyzer;
//! use tokenflow::analysis::analyzer::pipeline::PipelineAnalyzer;
//! use tokenflow::analysis::segmenter::regex::RegexSegmenter;
//! use tokenflow::analysis::token_filter::lowercase::LowercaseFilter;
//! use tokenflow::analysis::token_filter::stop::StopFilter;
//! use tokenflow::analysis::tokenizer::SegmentingTokenizer;
//!
//! let segmenter = Arc::new(RegexSegmenter::new().unwrap());
//! let analyzer = PipelineAnalyzer::new(Arc::new(SegmentingTokenizer::new(segmenter)))
//!     .add_filter(Arc::new(LowercaseFilter::new()))
//!     .add_filter(Arc::new(StopFilter::from_words(vec!["the", "and"])))
//!     .with_name("my_custom_analyzer");
//!
//! let tokens = analyzer.analyze("body", "Hello THE world AND test").unwrap();
//!
//! assert_eq!(tokens.len(), 3);
//! assert_eq!(tokens[0].text, "hello");
//! assert_eq!(tokens[1].text, "world");
//! assert_eq!(tokens[2].text, "test");
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use log::trace;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::stream::BoxTokenStream;
use crate::analysis::token_filter::Filter;
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// A configurable analyzer that combines a tokenizer with a chain of filters.
#[derive(Clone)]
pub struct PipelineAnalyzer {
    tokenizer: Arc<dyn Tokenizer>,
    filters: Vec<Arc<dyn Filter>>,
    name: String,
}

impl PipelineAnalyzer {
    /// Create a new pipeline analyzer with the given tokenizer.
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        PipelineAnalyzer {
            name: format!("pipeline_{}", tokenizer.name()),
            tokenizer,
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline.
    pub fn add_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set a custom name for this analyzer.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Get the tokenizer used by this analyzer.
    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }

    /// Get the filters used by this analyzer.
    pub fn filters(&self) -> &[Arc<dyn Filter>] {
        &self.filters
    }
}

impl Analyzer for PipelineAnalyzer {
    fn build_stream(&self, field: &str, text: &str) -> Result<BoxTokenStream> {
        trace!(
            "building pipeline '{}' for field '{field}' ({} filters)",
            self.name,
            self.filters.len()
        );

        let mut stream = self.tokenizer.tokenize(text)?;
        for filter in &self.filters {
            stream = filter.filter(stream)?;
        }
        Ok(stream)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for PipelineAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineAnalyzer")
            .field("name", &self.name)
            .field("tokenizer", &self.tokenizer.name())
            .field(
                "filters",
                &self.filters.iter().map(|f| f.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
