//! Whole-input segmenter implementation.

use super::{Segment, Segmenter};

use crate::error::Result;

/// A segmenter that emits the entire input as one token.
#[derive(Clone, Debug, Default)]
pub struct WholeSegmenter;

impl WholeSegmenter {
    pub fn new() -> Self {
        WholeSegmenter
    }
}

impl Segmenter for WholeSegmenter {
    fn segment(&self, text: &str) -> Result<Vec<Segment>> {
        if text.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(vec![Segment::new(0, text.len())])
        }
    }

    fn name(&self) -> &'static str {
        "whole"
    }
}
