//! Analyzers: factories for complete analysis pipelines.
//!
//! An [`Analyzer`] builds, for one field and one input, a tokenizer stream
//! wrapped by zero or more filter stages. All stages share the tokenizer's
//! [`AttributeSet`](crate::analysis::attribute::AttributeSet).
//!
//! ```text
//! Raw Text → Tokenizer → Filter 1 → ... → Filter N → AnalyzedStream
//! ```
//!
//! # Available Implementations
//!
//! - [`PipelineAnalyzer`](pipeline::PipelineAnalyzer) - Custom tokenizer + filter chains
//! - [`StandardAnalyzer`](standard::StandardAnalyzer) - Unicode words, lowercase, stop words
//! - [`WhitespaceAnalyzer`](whitespace::WhitespaceAnalyzer) - Whitespace splitting only
//! - [`KeywordAnalyzer`](keyword::KeywordAnalyzer) - Treats entire input as one token
//! - [`SmartChineseAnalyzer`](chinese::SmartChineseAnalyzer) - Dictionary-based Chinese
//! - [`PerFieldAnalyzer`](per_field::PerFieldAnalyzer) - Different analyzers per field
//!
//! # Examples
//!
//! Wrapping an analyzer's pipeline in one more filter:
//!
//! ```
//! use tokenflow::analysis::analyzer::Analyzer;
//! use tokenflow::analysis::analyzer::chinese::SmartChineseAnalyzer;
//! use tokenflow::analysis::stream::AnalyzedStream;
//! use tokenflow::analysis::token_filter::Filter;
//! use tokenflow::analysis::token_filter::remove_duplicates::RemoveDuplicatesFilter;
//!
//! let analyzer = SmartChineseAnalyzer::new();
//! let stream = RemoveDuplicatesFilter::new()
//!     .filter(analyzer.build_stream("body", "我是中国人").unwrap())
//!     .unwrap();
//! let tokens = AnalyzedStream::new("body", stream).collect_tokens().unwrap();
//!
//! let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(texts, vec!["我", "是", "中国", "人"]);
//! ```

use std::any::Any;
use std::sync::Arc;

use crate::analysis::stream::{AnalyzedStream, BoxTokenStream};
use crate::analysis::token::Token;
use crate::error::{Result, TokenflowError};

pub mod chinese;
pub mod keyword;
pub mod per_field;
pub mod pipeline;
pub mod standard;
pub mod whitespace;

use chinese::SmartChineseAnalyzer;
use keyword::KeywordAnalyzer;
use standard::StandardAnalyzer;
use whitespace::WhitespaceAnalyzer;

/// Names accepted by [`builtin_analyzer`].
pub const BUILTIN_ANALYZERS: &[&str] = &["standard", "whitespace", "keyword", "smart_chinese"];

/// Trait for analyzers that convert text into token streams.
///
/// Analyzers are shared between threads; every call builds a fresh stream.
pub trait Analyzer: Send + Sync {
    /// Build the raw pipeline for `text`, without a close guard.
    ///
    /// Use this to wrap the pipeline in further filters before handing it to
    /// an [`AnalyzedStream`].
    fn build_stream(&self, field: &str, text: &str) -> Result<BoxTokenStream>;

    /// Build a guarded pipeline for `text`.
    fn token_stream(&self, field: &str, text: &str) -> Result<AnalyzedStream> {
        Ok(AnalyzedStream::new(field, self.build_stream(field, text)?))
    }

    /// Drive a whole pipeline and return token snapshots.
    fn analyze(&self, field: &str, text: &str) -> Result<Vec<Token>> {
        self.token_stream(field, text)?.collect_tokens()
    }

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &str;

    /// Provide access to the concrete type for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// Look up one of the ready-made analyzers by name.
pub fn builtin_analyzer(name: &str) -> Result<Arc<dyn Analyzer>> {
    match name {
        "standard" => Ok(Arc::new(StandardAnalyzer::new())),
        "whitespace" => Ok(Arc::new(WhitespaceAnalyzer::new())),
        "keyword" => Ok(Arc::new(KeywordAnalyzer::new())),
        "smart_chinese" => Ok(Arc::new(SmartChineseAnalyzer::new())),
        other => Err(TokenflowError::config(format!(
            "Unknown analyzer '{other}' (expected one of: {})",
            BUILTIN_ANALYZERS.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_analyzers_resolve() {
        for name in BUILTIN_ANALYZERS {
            let analyzer = builtin_analyzer(name).unwrap();
            assert_eq!(analyzer.name(), *name);
        }
    }

    #[test]
    fn test_unknown_analyzer() {
        let err = builtin_analyzer("klingon").err().unwrap();
        assert!(err.to_string().contains("klingon"));
    }

    #[test]
    fn test_downcast() {
        let analyzer = builtin_analyzer("keyword").unwrap();
        assert!(analyzer.as_any().downcast_ref::<KeywordAnalyzer>().is_some());
    }
}
