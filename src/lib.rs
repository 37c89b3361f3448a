//! # Tokenflow
//!
//! An attribute-based text analysis pipeline.
//!
//! ## Features
//!
//! - Tokenizers driven by pluggable segmentation strategies
//! - Token filters that rewrite a shared set of token attributes in place
//! - Dictionary-based segmentation of Chinese text
//! - Explicit stream lifecycle with guaranteed release of resources
//! - JSON-configurable analyzers and per-field dispatch

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;

pub mod prelude {
    pub use crate::analysis::analyzer::Analyzer;
    pub use crate::analysis::analyzer::per_field::PerFieldAnalyzer;
    pub use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
    pub use crate::analysis::attribute::{AttributeSet, CharTermAttribute, OffsetAttribute};
    pub use crate::analysis::stream::{AnalyzedStream, TokenStream};
    pub use crate::analysis::token::Token;
    pub use crate::analysis::token_filter::Filter;
    pub use crate::analysis::tokenizer::Tokenizer;
    pub use crate::error::{Result, TokenflowError};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
