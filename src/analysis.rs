//! Text analysis pipelines.
//!
//! Text flows through a tokenizer and a chain of token filters. Each stage is a
//! [`TokenStream`](stream::TokenStream); stages exchange the current token
//! through a shared [`AttributeSet`](attribute::AttributeSet) rather than by
//! passing values.

pub mod analyzer;
pub mod attribute;
pub mod segmenter;
pub mod stream;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

// Re-export commonly used types
pub use analyzer::Analyzer;
pub use attribute::{
    Attribute, AttributeHandle, AttributeKind, AttributeSet, CharTermAttribute, FlagsAttribute,
    KeywordAttribute, OffsetAttribute, PositionIncrementAttribute, PositionLengthAttribute,
    TypeAttribute,
};
pub use stream::{AnalyzedStream, BoxTokenStream, StreamState, TokenStream};
pub use token::{Token, TokenType};
pub use token_filter::Filter;
pub use tokenizer::Tokenizer;
