//! JSON configuration for analyzers.
//!
//! An [`AnalyzerConfig`] describes one pipeline: a tokenizer and an ordered
//! list of filters. An [`AnalysisConfig`] names several pipelines and maps
//! fields to them.
//!
//! # Examples
//!
//! ```
//! use tokenflow::analysis::analyzer::Analyzer;
//! use tokenflow::config::AnalyzerConfig;
//!
//! let config = AnalyzerConfig::from_json_str(
//!     r#"{
//!         "name": "shout",
//!         "tokenizer": {"type": "whitespace"},
//!         "filters": [{"type": "lowercase"}, {"type": "stop", "words": ["and"]}]
//!     }"#,
//! )
//! .unwrap();
//!
//! let analyzer = config.build().unwrap();
//! let tokens = analyzer.analyze("body", "CATS and DOGS").unwrap();
//! assert_eq!(tokens[1].text, "dogs");
//! assert_eq!(tokens[1].position, 2);
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ahash::AHashMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::per_field::PerFieldAnalyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::analyzer::{Analyzer, builtin_analyzer};
use crate::analysis::segmenter::Segmenter;
use crate::analysis::segmenter::dictionary::{DictionarySegmenter, SegmentMode, WordDictionary};
use crate::analysis::segmenter::regex::RegexSegmenter;
use crate::analysis::segmenter::unicode_word::UnicodeWordSegmenter;
use crate::analysis::segmenter::whitespace::WhitespaceSegmenter;
use crate::analysis::segmenter::whole::WholeSegmenter;
use crate::analysis::token_filter::Filter;
use crate::analysis::token_filter::keyword_marker::KeywordMarkerFilter;
use crate::analysis::token_filter::limit::LimitFilter;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::remove_duplicates::RemoveDuplicatesFilter;
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::token_filter::synonym::SynonymFilter;
use crate::analysis::tokenizer::SegmentingTokenizer;
use crate::error::{Result, TokenflowError};

fn default_true() -> bool {
    true
}

fn default_analyzer_name() -> String {
    "standard".to_string()
}

/// Tokenizer section of an analyzer definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TokenizerConfig {
    Whitespace,
    UnicodeWord,
    Regex {
        pattern: String,
        /// Tokens are the text between matches rather than the matches.
        #[serde(default)]
        gaps: bool,
    },
    Whole,
    Dictionary {
        #[serde(default)]
        mode: SegmentMode,
        /// Extra words added to the dictionary.
        #[serde(default)]
        words: Vec<String>,
        /// Dictionary file in `word [frequency] [tag]` line format.
        #[serde(default)]
        dictionary_path: Option<PathBuf>,
        /// Start from the built-in dictionary.
        #[serde(default = "default_true")]
        include_builtin: bool,
        #[serde(default)]
        max_word_chars: Option<usize>,
    },
}

impl TokenizerConfig {
    fn build_segmenter(&self) -> Result<Arc<dyn Segmenter>> {
        let segmenter: Arc<dyn Segmenter> = match self {
            TokenizerConfig::Whitespace => Arc::new(WhitespaceSegmenter::new()),
            TokenizerConfig::UnicodeWord => Arc::new(UnicodeWordSegmenter::new()),
            TokenizerConfig::Regex { pattern, gaps } => {
                if *gaps {
                    Arc::new(RegexSegmenter::with_gaps(pattern)?)
                } else {
                    Arc::new(RegexSegmenter::with_pattern(pattern)?)
                }
            }
            TokenizerConfig::Whole => Arc::new(WholeSegmenter::new()),
            TokenizerConfig::Dictionary {
                mode,
                words,
                dictionary_path,
                include_builtin,
                max_word_chars,
            } => {
                let mut dictionary = if *include_builtin {
                    WordDictionary::builtin().as_ref().clone()
                } else {
                    WordDictionary::new()
                };
                if let Some(path) = dictionary_path {
                    let file = File::open(path).map_err(|e| {
                        TokenflowError::config(format!(
                            "Cannot open dictionary {}: {e}",
                            path.display()
                        ))
                    })?;
                    dictionary.extend(&WordDictionary::from_reader(BufReader::new(file))?);
                }
                for word in words {
                    dictionary.insert(word);
                }
                if dictionary.is_empty() {
                    return Err(TokenflowError::config(
                        "Dictionary tokenizer has no words",
                    ));
                }

                let mut segmenter =
                    DictionarySegmenter::with_dictionary(Arc::new(dictionary)).mode(*mode);
                if let Some(max_word_chars) = max_word_chars {
                    segmenter = segmenter.max_word_chars(*max_word_chars);
                }
                Arc::new(segmenter)
            }
        };
        Ok(segmenter)
    }
}

/// One filter of an analyzer definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterConfig {
    Lowercase,
    Stop {
        /// Custom stop words; the English default list when absent.
        #[serde(default)]
        words: Option<Vec<String>>,
        #[serde(default)]
        ignore_case: bool,
    },
    Limit {
        limit: usize,
        #[serde(default)]
        consume_all_tokens: bool,
    },
    Synonym {
        synonyms: BTreeMap<String, Vec<String>>,
        #[serde(default = "default_true")]
        keep_original: bool,
    },
    KeywordMarker {
        words: Vec<String>,
    },
    RemoveDuplicates,
}

impl FilterConfig {
    fn build_filter(&self) -> Arc<dyn Filter> {
        match self {
            FilterConfig::Lowercase => Arc::new(LowercaseFilter::new()),
            FilterConfig::Stop { words, ignore_case } => {
                let filter = match words {
                    Some(words) => StopFilter::from_words(words.iter().cloned()),
                    None => StopFilter::new(),
                };
                Arc::new(filter.ignore_case(*ignore_case))
            }
            FilterConfig::Limit {
                limit,
                consume_all_tokens,
            } => Arc::new(LimitFilter::new(*limit).consume_all_tokens(*consume_all_tokens)),
            FilterConfig::Synonym {
                synonyms,
                keep_original,
            } => {
                let filter = synonyms
                    .iter()
                    .fold(SynonymFilter::new(), |filter, (word, list)| {
                        filter.add_synonyms(word, list.iter().cloned())
                    });
                Arc::new(filter.keep_original(*keep_original))
            }
            FilterConfig::KeywordMarker { words } => {
                Arc::new(KeywordMarkerFilter::new(words.iter().cloned()))
            }
            FilterConfig::RemoveDuplicates => Arc::new(RemoveDuplicatesFilter::new()),
        }
    }
}

/// Definition of a single pipeline analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    pub name: String,
    pub tokenizer: TokenizerConfig,
    #[serde(default)]
    pub filters: Vec<FilterConfig>,
}

impl AnalyzerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Build the described pipeline.
    pub fn build(&self) -> Result<PipelineAnalyzer> {
        let segmenter = self.tokenizer.build_segmenter()?;
        let analyzer = self.filters.iter().fold(
            PipelineAnalyzer::new(Arc::new(SegmentingTokenizer::new(segmenter))),
            |analyzer, filter| analyzer.add_filter(filter.build_filter()),
        );

        debug!(
            "built analyzer '{}' with {} filters",
            self.name,
            self.filters.len()
        );
        Ok(analyzer.with_name(self.name.clone()))
    }
}

/// Named analyzers plus a field-to-analyzer mapping.
///
/// Analyzer names in `default_analyzer` and `fields` may refer to an entry of
/// `analyzers` or to a built-in analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub analyzers: Vec<AnalyzerConfig>,
    #[serde(default = "default_analyzer_name")]
    pub default_analyzer: String,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            analyzers: Vec::new(),
            default_analyzer: default_analyzer_name(),
            fields: BTreeMap::new(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn to_json_string(&self, pretty: bool) -> Result<String> {
        if pretty {
            Ok(serde_json::to_string_pretty(self)?)
        } else {
            Ok(serde_json::to_string(self)?)
        }
    }

    /// Build every configured analyzer, keyed by name.
    pub fn build_analyzers(&self) -> Result<AHashMap<String, Arc<dyn Analyzer>>> {
        let mut analyzers: AHashMap<String, Arc<dyn Analyzer>> = AHashMap::new();
        for config in &self.analyzers {
            let analyzer: Arc<dyn Analyzer> = Arc::new(config.build()?);
            if analyzers.insert(config.name.clone(), analyzer).is_some() {
                return Err(TokenflowError::config(format!(
                    "Duplicate analyzer name '{}'",
                    config.name
                )));
            }
        }
        Ok(analyzers)
    }

    /// Resolve `name` against the configured analyzers, then the built-ins.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Analyzer>> {
        let analyzers = self.build_analyzers()?;
        resolve_in(&analyzers, name)
    }

    /// Build the per-field analyzer.
    pub fn build(&self) -> Result<PerFieldAnalyzer> {
        let analyzers = self.build_analyzers()?;
        let mut per_field = PerFieldAnalyzer::new(resolve_in(&analyzers, &self.default_analyzer)?);
        for (field, name) in &self.fields {
            per_field.add_analyzer(field.clone(), resolve_in(&analyzers, name)?);
        }
        Ok(per_field)
    }
}

fn resolve_in(
    analyzers: &AHashMap<String, Arc<dyn Analyzer>>,
    name: &str,
) -> Result<Arc<dyn Analyzer>> {
    match analyzers.get(name) {
        Some(analyzer) => Ok(Arc::clone(analyzer)),
        None => builtin_analyzer(name),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const CONFIG: &str = r#"{
        "analyzers": [
            {
                "name": "tags",
                "tokenizer": {"type": "regex", "pattern": "[,;]\\s*", "gaps": true},
                "filters": [{"type": "lowercase"}, {"type": "remove_duplicates"}]
            },
            {
                "name": "chinese_search",
                "tokenizer": {"type": "dictionary", "mode": "search", "words": ["中国人"]}
            }
        ],
        "fields": {"tags": "tags", "id": "keyword", "body_zh": "chinese_search"}
    }"#;

    #[test]
    fn test_parse_defaults() {
        let config = AnalysisConfig::from_json_str(CONFIG).unwrap();
        assert_eq!(config.default_analyzer, "standard");
        assert_eq!(config.analyzers.len(), 2);
        assert_eq!(
            config.analyzers[1].tokenizer,
            TokenizerConfig::Dictionary {
                mode: SegmentMode::Search,
                words: vec!["中国人".to_string()],
                dictionary_path: None,
                include_builtin: true,
                max_word_chars: None,
            }
        );
    }

    #[test]
    fn test_build_per_field() {
        let analyzer = AnalysisConfig::from_json_str(CONFIG).unwrap().build().unwrap();

        let tokens = analyzer.analyze("tags", "Rust, Search; Rust").unwrap();
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["rust", "search", "rust"]);

        let tokens = analyzer.analyze("id", "A B").unwrap();
        assert_eq!(tokens.len(), 1);

        let tokens = analyzer.analyze("body_zh", "我是中国人").unwrap();
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["我", "是", "中国人", "中国"]);

        let tokens = analyzer.analyze("title", "The Title").unwrap();
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn test_round_trip() {
        let config = AnalysisConfig::from_json_str(CONFIG).unwrap();
        let json = config.to_json_string(true).unwrap();
        assert_eq!(AnalysisConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_unknown_analyzer_reference() {
        let config = AnalysisConfig {
            default_analyzer: "missing".to_string(),
            ..AnalysisConfig::default()
        };
        let err = config.build().err().unwrap();
        assert!(matches!(err, TokenflowError::Config(_)));
    }

    #[test]
    fn test_duplicate_analyzer_names() {
        let analyzer = AnalyzerConfig {
            name: "dup".to_string(),
            tokenizer: TokenizerConfig::Whitespace,
            filters: Vec::new(),
        };
        let config = AnalysisConfig {
            analyzers: vec![analyzer.clone(), analyzer],
            ..AnalysisConfig::default()
        };
        assert!(config.build_analyzers().is_err());
    }

    #[test]
    fn test_invalid_regex() {
        let config = AnalyzerConfig {
            name: "broken".to_string(),
            tokenizer: TokenizerConfig::Regex {
                pattern: "(".to_string(),
                gaps: false,
            },
            filters: Vec::new(),
        };
        assert!(matches!(config.build(), Err(TokenflowError::Analysis(_))));
    }

    #[test]
    fn test_unknown_filter_type() {
        let json = r#"{"name": "x", "tokenizer": {"type": "whitespace"}, "filters": [{"type": "stemmer"}]}"#;
        assert!(matches!(
            AnalyzerConfig::from_json_str(json),
            Err(TokenflowError::Json(_))
        ));
    }

    #[test]
    fn test_dictionary_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# words").unwrap();
        writeln!(file, "中国人 10 n").unwrap();
        file.flush().unwrap();

        let config = AnalyzerConfig {
            name: "zh".to_string(),
            tokenizer: TokenizerConfig::Dictionary {
                mode: SegmentMode::Precise,
                words: Vec::new(),
                dictionary_path: Some(file.path().to_path_buf()),
                include_builtin: false,
                max_word_chars: None,
            },
            filters: Vec::new(),
        };
        let tokens = config.build().unwrap().analyze("body", "我是中国人").unwrap();
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["我", "是", "中国人"]);
    }

    #[test]
    fn test_empty_dictionary_rejected() {
        let config = AnalyzerConfig {
            name: "zh".to_string(),
            tokenizer: TokenizerConfig::Dictionary {
                mode: SegmentMode::Precise,
                words: Vec::new(),
                dictionary_path: None,
                include_builtin: false,
                max_word_chars: None,
            },
            filters: Vec::new(),
        };
        assert!(matches!(config.build(), Err(TokenflowError::Config(_))));
    }

    #[test]
    fn test_filter_options() {
        let json = r#"{
            "name": "opts",
            "tokenizer": {"type": "whitespace"},
            "filters": [
                {"type": "keyword_marker", "words": ["NASA"]},
                {"type": "lowercase"},
                {"type": "synonym", "synonyms": {"rocks": ["stones"]}, "keep_original": false},
                {"type": "stop", "words": ["THE"], "ignore_case": true},
                {"type": "limit", "limit": 2, "consume_all_tokens": true}
            ]
        }"#;
        let analyzer = AnalyzerConfig::from_json_str(json).unwrap().build().unwrap();
        assert_eq!(analyzer.name(), "opts");
        assert_eq!(analyzer.filters().len(), 5);

        let tokens = analyzer.analyze("body", "The NASA rocks today").unwrap();
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["NASA", "stones"]);
        assert_eq!(tokens[0].position, 1);
    }
}
