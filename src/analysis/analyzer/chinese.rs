//! Dictionary-based analyzer for Simplified Chinese.
//!
//! Han text is split into words by
//! [`DictionarySegmenter`](crate::analysis::segmenter::dictionary::DictionarySegmenter);
//! Latin words and digits embedded in the text are split on Unicode word
//! boundaries and lowercased. Punctuation never produces a token.
//!
//! # Examples
//!
//! ```
//! use tokenflow::analysis::analyzer::Analyzer;
//! use tokenflow::analysis::analyzer::chinese::SmartChineseAnalyzer;
//!
//! let analyzer = SmartChineseAnalyzer::new();
//! let tokens = analyzer.analyze("body", "我是中国人").unwrap();
//!
//! let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(texts, vec!["我", "是", "中国", "人"]);
//! ```

use std::any::Any;
use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::segmenter::dictionary::{DictionarySegmenter, SegmentMode, WordDictionary};
use crate::analysis::stream::BoxTokenStream;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::tokenizer::SegmentingTokenizer;
use crate::error::Result;

#[derive(Clone, Debug)]
pub struct SmartChineseAnalyzer {
    inner: PipelineAnalyzer,
}

impl SmartChineseAnalyzer {
    /// Precise segmentation over the built-in dictionary.
    pub fn new() -> Self {
        Self::with_dictionary(WordDictionary::builtin(), SegmentMode::Precise)
    }

    pub fn with_dictionary(dictionary: Arc<WordDictionary>, mode: SegmentMode) -> Self {
        let segmenter = DictionarySegmenter::with_dictionary(dictionary).mode(mode);
        let inner = PipelineAnalyzer::new(Arc::new(SegmentingTokenizer::new(Arc::new(segmenter))))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .with_name("smart_chinese");
        SmartChineseAnalyzer { inner }
    }
}

impl Default for SmartChineseAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for SmartChineseAnalyzer {
    fn build_stream(&self, field: &str, text: &str) -> Result<BoxTokenStream> {
        self.inner.build_stream(field, text)
    }

    fn name(&self) -> &str {
        "smart_chinese"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::TokenType;

    #[test]
    fn test_smart_chinese_analyzer() {
        let tokens = SmartChineseAnalyzer::new()
            .analyze("body", "我是中国人")
            .unwrap();

        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["我", "是", "中国", "人"]);
        let positions: Vec<_> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3]);
        assert_eq!((tokens[2].start_offset, tokens[2].end_offset), (6, 12));
        assert_eq!(tokens[2].token_type, TokenType::Cjk);
    }

    #[test]
    fn test_mixed_text_is_lowercased() {
        let tokens = SmartChineseAnalyzer::new()
            .analyze("body", "我们用Rust开发。")
            .unwrap();

        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["我们", "用", "rust", "开发"]);
    }

    #[test]
    fn test_search_mode() {
        let analyzer =
            SmartChineseAnalyzer::with_dictionary(WordDictionary::builtin(), SegmentMode::Search);
        let tokens = analyzer.analyze("body", "北京大学生").unwrap();

        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["北京大学", "北京", "生"]);
        assert_eq!(tokens[1].position, tokens[0].position);
    }
}
