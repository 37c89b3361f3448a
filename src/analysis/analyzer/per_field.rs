//! Per-field analyzer.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;
use log::debug;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::stream::BoxTokenStream;
use crate::error::Result;

/// A per-field analyzer that applies different analyzers to different fields.
///
/// Fields without an explicit entry use the default analyzer.
///
/// # Memory Efficiency
///
/// When using the same analyzer for multiple fields, reuse a single instance
/// with `Arc::clone`. This matters for analyzers with large dictionaries.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tokenflow::analysis::analyzer::Analyzer;
/// use tokenflow::analysis::analyzer::keyword::KeywordAnalyzer;
/// use tokenflow::analysis::analyzer::per_field::PerFieldAnalyzer;
/// use tokenflow::analysis::analyzer::standard::StandardAnalyzer;
///
/// let keyword_analyzer: Arc<dyn Analyzer> = Arc::new(KeywordAnalyzer::new());
/// let mut analyzer = PerFieldAnalyzer::new(Arc::new(StandardAnalyzer::new()));
/// analyzer.add_analyzer("id", Arc::clone(&keyword_analyzer));
/// analyzer.add_analyzer("category", Arc::clone(&keyword_analyzer));
///
/// assert_eq!(analyzer.analyze("id", "X-1 Y").unwrap().len(), 1);
/// assert_eq!(analyzer.analyze("title", "X-1 Y").unwrap().len(), 3);
/// ```
#[derive(Clone)]
pub struct PerFieldAnalyzer {
    /// Default analyzer for fields not in the map.
    default_analyzer: Arc<dyn Analyzer>,

    /// Map of field names to their specific analyzers.
    field_analyzers: AHashMap<String, Arc<dyn Analyzer>>,
}

impl PerFieldAnalyzer {
    /// Create a new per-field analyzer with a default analyzer.
    pub fn new(default_analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            default_analyzer,
            field_analyzers: AHashMap::new(),
        }
    }

    /// Add a field-specific analyzer.
    pub fn add_analyzer(&mut self, field: impl Into<String>, analyzer: Arc<dyn Analyzer>) {
        self.field_analyzers.insert(field.into(), analyzer);
    }

    /// Get the analyzer for a specific field.
    pub fn get_analyzer(&self, field: &str) -> &Arc<dyn Analyzer> {
        self.field_analyzers
            .get(field)
            .unwrap_or(&self.default_analyzer)
    }

    /// Get the default analyzer.
    pub fn default_analyzer(&self) -> &Arc<dyn Analyzer> {
        &self.default_analyzer
    }

    /// Fields with a specific analyzer, sorted.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = self.field_analyzers.keys().map(String::as_str).collect();
        fields.sort_unstable();
        fields
    }
}

impl Analyzer for PerFieldAnalyzer {
    fn build_stream(&self, field: &str, text: &str) -> Result<BoxTokenStream> {
        let analyzer = self.get_analyzer(field);
        debug!("field '{field}' dispatched to analyzer '{}'", analyzer.name());
        analyzer.build_stream(field, text)
    }

    fn name(&self) -> &str {
        "per_field"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for PerFieldAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PerFieldAnalyzer")
            .field("default_analyzer", &self.default_analyzer.name())
            .field("fields", &self.fields())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::keyword::KeywordAnalyzer;
    use crate::analysis::analyzer::standard::StandardAnalyzer;

    #[test]
    fn test_per_field_analyzer() {
        let mut analyzer = PerFieldAnalyzer::new(Arc::new(StandardAnalyzer::new()));
        analyzer.add_analyzer("id", Arc::new(KeywordAnalyzer::new()));
        analyzer.add_analyzer("category", Arc::new(KeywordAnalyzer::new()));

        let text = "Hello World";

        // Default analyzer lowercases and tokenizes
        let tokens = analyzer.analyze("title", text).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "hello");
        assert_eq!(tokens[1].text, "world");

        // KeywordAnalyzer keeps as single token
        let tokens = analyzer.analyze("id", text).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "Hello World");

        let tokens = analyzer.analyze("category", text).unwrap();
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn test_field_is_recorded_on_stream() {
        let analyzer = PerFieldAnalyzer::new(Arc::new(KeywordAnalyzer::new()));
        let stream = analyzer.token_stream("sku", "x").unwrap();
        assert_eq!(stream.field(), "sku");
    }

    #[test]
    fn test_get_analyzer() {
        let mut analyzer = PerFieldAnalyzer::new(Arc::new(StandardAnalyzer::new()));
        analyzer.add_analyzer("id", Arc::new(KeywordAnalyzer::new()));

        assert_eq!(analyzer.get_analyzer("id").name(), "keyword");
        assert_eq!(analyzer.get_analyzer("unknown_field").name(), "standard");
        assert_eq!(analyzer.default_analyzer().name(), "standard");
        assert_eq!(analyzer.fields(), vec!["id"]);
        assert_eq!(analyzer.name(), "per_field");
    }
}
