//! Regex-based segmenter implementation.

use std::sync::Arc;

use regex::Regex;

use super::{Segment, Segmenter};

use crate::error::{Result, TokenflowError};

/// Segments text into regex matches, or into the gaps between matches.
#[derive(Clone, Debug)]
pub struct RegexSegmenter {
    pattern: Arc<Regex>,
    gaps: bool,
}

impl RegexSegmenter {
    /// Word characters (`\w+`).
    pub fn new() -> Result<Self> {
        Self::with_pattern(r"\w+")
    }

    /// Tokens are the matches of `pattern`.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        Ok(RegexSegmenter {
            pattern: Arc::new(compile(pattern)?),
            gaps: false,
        })
    }

    /// Tokens are the text between matches of `pattern`.
    pub fn with_gaps(pattern: &str) -> Result<Self> {
        Ok(RegexSegmenter {
            pattern: Arc::new(compile(pattern)?),
            gaps: true,
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn gaps(&self) -> bool {
        self.gaps
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| TokenflowError::analysis(format!("Invalid regex pattern: {e}")))
}

impl Segmenter for RegexSegmenter {
    fn segment(&self, text: &str) -> Result<Vec<Segment>> {
        if !self.gaps {
            return Ok(self
                .pattern
                .find_iter(text)
                .filter(|mat| !mat.is_empty())
                .map(|mat| Segment::new(mat.start(), mat.end()))
                .collect());
        }

        let mut segments = Vec::new();
        let mut last_end = 0;
        for mat in self.pattern.find_iter(text) {
            if mat.start() > last_end {
                segments.push(Segment::new(last_end, mat.start()));
            }
            last_end = mat.end();
        }
        if last_end < text.len() {
            segments.push(Segment::new(last_end, text.len()));
        }

        Ok(segments)
    }

    fn name(&self) -> &'static str {
        "regex"
    }
}
