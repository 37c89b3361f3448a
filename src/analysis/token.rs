//! Owned token snapshots and token classification.
//!
//! Streams expose the current token through attribute slots (see
//! [`attribute`](crate::analysis::attribute)). A [`Token`] is an owned copy of
//! those slots, taken when a consumer wants to keep tokens around after the
//! stream has moved on.
//!
//! # Token Graphs
//!
//! Tokens carry `position_increment` and `position_length`, so stacked
//! alternatives can share a position:
//!
//! ```text
//! Input: "北京大学" (search mode)
//!
//!   Position 0: "北京大学" (pos_inc=1)
//!   Position 0: "北京"     (pos_inc=0)  ← same position
//! ```
//!
//! # Examples
//!
//! ```
//! use tokenflow::analysis::token::Token;
//!
//! let token = Token::with_offsets("world", 1, 6, 11);
//! assert_eq!(token.text, "world");
//! assert_eq!(token.start_offset, 6);
//! assert_eq!(token.end_offset, 11);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// An owned copy of one token's attributes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The text content of the token
    pub text: String,

    /// The absolute position of the token in the stream (0-based)
    pub position: usize,

    /// The byte offset where this token starts in the original text
    pub start_offset: usize,

    /// The byte offset where this token ends in the original text
    pub end_offset: usize,

    /// Position increment from the previous token (default: 1).
    pub position_increment: usize,

    /// How many positions this token spans (default: 1).
    pub position_length: usize,

    /// Lexical type of the token
    pub token_type: TokenType,

    /// Whether the token was marked as a keyword
    pub keyword: bool,

    /// Custom flags
    pub flags: u32,
}

/// Token type classification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Unclassified word
    #[default]
    Word,
    /// Alphanumeric text (English, Latin scripts)
    Alphanum,
    /// Numeric values
    Num,
    /// CJK ideographs
    Cjk,
    /// Katakana characters (Japanese)
    Katakana,
    /// Hiragana characters (Japanese)
    Hiragana,
    /// Hangul characters (Korean)
    Hangul,
    /// Punctuation marks
    Punctuation,
    /// Synonym injected by a filter
    Synonym,
    /// Other/unknown token types
    Other,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Word => "word",
            TokenType::Alphanum => "alphanum",
            TokenType::Num => "num",
            TokenType::Cjk => "cjk",
            TokenType::Katakana => "katakana",
            TokenType::Hiragana => "hiragana",
            TokenType::Hangul => "hangul",
            TokenType::Punctuation => "punctuation",
            TokenType::Synonym => "synonym",
            TokenType::Other => "other",
        }
    }

    /// Classify a word by its characters.
    pub fn detect(word: &str) -> TokenType {
        if word.is_empty() {
            return TokenType::Other;
        }

        if word.chars().all(|c| c.is_numeric()) {
            return TokenType::Num;
        }

        if word.chars().all(|c| matches!(c, '\u{3040}'..='\u{309F}')) {
            return TokenType::Hiragana;
        }

        if word.chars().all(|c| matches!(c, '\u{30A0}'..='\u{30FF}')) {
            return TokenType::Katakana;
        }

        if word
            .chars()
            .any(|c| matches!(c, '\u{AC00}'..='\u{D7AF}' | '\u{1100}'..='\u{11FF}'))
        {
            return TokenType::Hangul;
        }

        if word.chars().any(is_cjk_ideograph) {
            return TokenType::Cjk;
        }

        if word.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
            return TokenType::Alphanum;
        }

        if word.chars().all(|c| c.is_ascii_punctuation()) {
            return TokenType::Punctuation;
        }

        TokenType::Other
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `c` is a Han ideograph.
pub fn is_cjk_ideograph(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}' |   // CJK Unified Ideographs
        '\u{3400}'..='\u{4DBF}' |   // CJK Extension A
        '\u{F900}'..='\u{FAFF}' |   // CJK Compatibility Ideographs
        '\u{20000}'..='\u{2A6DF}' | // CJK Extension B
        '\u{2A700}'..='\u{2B73F}' | // CJK Extension C
        '\u{2B740}'..='\u{2B81F}' | // CJK Extension D
        '\u{2B820}'..='\u{2CEAF}'   // CJK Extension E
    )
}

impl Token {
    /// Create a new token with the given text and position.
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset: 0,
            end_offset: 0,
            position_increment: 1,
            position_length: 1,
            token_type: TokenType::Word,
            keyword: false,
            flags: 0,
        }
    }

    /// Create a new token with text, position, and byte offsets.
    pub fn with_offsets<S: Into<String>>(
        text: S,
        position: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Token {
            start_offset,
            end_offset,
            ..Token::new(text, position)
        }
    }

    /// Get the length of the token text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the token is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Set the token type.
    pub fn with_token_type(mut self, token_type: TokenType) -> Self {
        self.token_type = token_type;
        self
    }

    /// Set the position increment.
    pub fn with_position_increment(mut self, increment: usize) -> Self {
        self.position_increment = increment;
        self
    }

    /// Set the position length.
    pub fn with_position_length(mut self, length: usize) -> Self {
        self.position_length = length;
        self
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Turns position increments into absolute positions.
///
/// The first token lands on `increment - 1` (0 for the usual increment of 1),
/// every following one on the previous position plus its increment.
#[derive(Clone, Copy, Debug, Default)]
pub struct PositionTracker {
    last: Option<usize>,
}

impl PositionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `increment` and return the new absolute position.
    pub fn advance(&mut self, increment: usize) -> usize {
        let position = match self.last {
            None => increment.saturating_sub(1),
            Some(last) => last + increment,
        };
        self.last = Some(position);
        position
    }
}
