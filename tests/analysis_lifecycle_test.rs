//! Integration tests for the token stream lifecycle across full pipelines.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokenflow::analysis::analyzer::Analyzer;
use tokenflow::analysis::analyzer::chinese::SmartChineseAnalyzer;
use tokenflow::analysis::analyzer::pipeline::PipelineAnalyzer;
use tokenflow::analysis::analyzer::standard::StandardAnalyzer;
use tokenflow::analysis::attribute::{
    CharTermAttribute, FlagsAttribute, OffsetAttribute, PositionIncrementAttribute,
};
use tokenflow::analysis::segmenter::whitespace::WhitespaceSegmenter;
use tokenflow::analysis::segmenter::{Segment, Segmenter};
use tokenflow::analysis::stream::{AnalyzedStream, StreamState};
use tokenflow::analysis::token_filter::Filter;
use tokenflow::analysis::token_filter::lowercase::LowercaseFilter;
use tokenflow::analysis::token_filter::remove_duplicates::RemoveDuplicatesFilter;
use tokenflow::analysis::tokenizer::SegmentingTokenizer;
use tokenflow::error::{Result, TokenflowError};

/// Whitespace segmentation that counts how often streams release it.
struct CountingSegmenter {
    inner: WhitespaceSegmenter,
    released: Arc<AtomicUsize>,
}

impl Segmenter for CountingSegmenter {
    fn segment(&self, text: &str) -> Result<Vec<Segment>> {
        self.inner.segment(text)
    }

    fn name(&self) -> &'static str {
        "counting"
    }

    fn release(&self) -> Result<()> {
        self.released.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn counting_analyzer() -> (PipelineAnalyzer, Arc<AtomicUsize>) {
    let released = Arc::new(AtomicUsize::new(0));
    let segmenter = CountingSegmenter {
        inner: WhitespaceSegmenter::new(),
        released: Arc::clone(&released),
    };
    let analyzer = PipelineAnalyzer::new(Arc::new(SegmentingTokenizer::new(Arc::new(segmenter))))
        .add_filter(Arc::new(LowercaseFilter::new()));
    (analyzer, released)
}

fn drive_terms(mut stream: AnalyzedStream) -> Result<Vec<String>> {
    let term = stream.add_attribute::<CharTermAttribute>();
    let mut terms = Vec::new();
    stream.reset()?;
    while stream.increment_token()? {
        terms.push(term.borrow().as_str().to_string());
    }
    stream.end()?;
    stream.close()?;
    Ok(terms)
}

#[test]
fn test_standard_analyzer_attribute_contract() -> Result<()> {
    let analyzer = StandardAnalyzer::new();
    let text = "some text goes here";
    let mut stream = analyzer.token_stream("body", text)?;

    let offset = stream.add_attribute::<OffsetAttribute>();
    assert!(offset.ptr_eq(&stream.add_attribute::<OffsetAttribute>()));
    assert!(offset.ptr_eq(&stream.get_attribute::<OffsetAttribute>()?));
    let term = stream.get_attribute::<CharTermAttribute>()?;

    stream.reset()?;
    let mut spans = Vec::new();
    while stream.increment_token()? {
        let (start, end) = {
            let offset = offset.borrow();
            (offset.start_offset(), offset.end_offset())
        };
        assert_eq!(&text[start..end], term.borrow().as_str());
        assert!(
            stream
                .reflect_as_string(true)
                .contains(&format!("char_term#term={}", term.borrow().as_str()))
        );
        spans.push((start, end));
    }
    stream.end()?;
    assert_eq!(offset.borrow().end_offset(), text.len());
    stream.close()?;

    assert_eq!(spans, vec![(0, 4), (5, 9), (10, 14), (15, 19)]);
    Ok(())
}

#[test]
fn test_smart_chinese_segmentation() -> Result<()> {
    let analyzer = SmartChineseAnalyzer::new();
    let stream = analyzer.token_stream("body", "我是中国人")?;
    assert_eq!(drive_terms(stream)?, vec!["我", "是", "中国", "人"]);
    Ok(())
}

#[test]
fn test_smart_chinese_through_remove_duplicates() -> Result<()> {
    let analyzer = SmartChineseAnalyzer::new();
    let stream = RemoveDuplicatesFilter::new().filter(analyzer.build_stream("body", "我是中国人")?)?;
    let stream = AnalyzedStream::new("body", stream);
    assert_eq!(drive_terms(stream)?, vec!["我", "是", "中国", "人"]);
    Ok(())
}

#[test]
fn test_missing_attribute() -> Result<()> {
    let analyzer = StandardAnalyzer::new();
    let stream = analyzer.token_stream("body", "text")?;
    let err = stream.get_attribute::<FlagsAttribute>().unwrap_err();
    assert!(matches!(err, TokenflowError::AttributeNotPresent(_)));
    Ok(())
}

#[test]
fn test_increment_before_reset() -> Result<()> {
    let analyzer = StandardAnalyzer::new();
    let mut stream = analyzer.token_stream("body", "text")?;
    assert!(stream.increment_token().unwrap_err().is_invalid_state());
    assert!(stream.end().unwrap_err().is_invalid_state());
    Ok(())
}

#[test]
fn test_reset_while_iterating() -> Result<()> {
    let analyzer = StandardAnalyzer::new();
    let mut stream = analyzer.token_stream("body", "two words")?;
    stream.reset()?;
    assert!(stream.increment_token()?);
    assert!(stream.reset().unwrap_err().is_invalid_state());
    Ok(())
}

#[test]
fn test_exhausted_stream_keeps_reporting_false() -> Result<()> {
    let analyzer = StandardAnalyzer::new();
    let mut stream = analyzer.token_stream("body", "word")?;
    stream.reset()?;
    assert!(stream.increment_token()?);
    assert!(!stream.increment_token()?);
    assert!(!stream.increment_token()?);
    stream.end()?;
    stream.end()?;
    assert_eq!(stream.state(), StreamState::Ended);
    Ok(())
}

#[test]
fn test_close_twice_releases_once() -> Result<()> {
    let (analyzer, released) = counting_analyzer();
    let mut stream = analyzer.token_stream("body", "a b")?;
    stream.reset()?;
    stream.close()?;
    stream.close()?;
    assert_eq!(stream.state(), StreamState::Closed);
    assert!(stream.increment_token().unwrap_err().is_invalid_state());
    drop(stream);
    assert_eq!(released.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn test_drop_closes_abandoned_stream() -> Result<()> {
    let (analyzer, released) = counting_analyzer();
    {
        let mut stream = analyzer.token_stream("body", "a b c")?;
        stream.reset()?;
        assert!(stream.increment_token()?);
    }
    assert_eq!(released.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn test_consume_closes_on_callback_error() -> Result<()> {
    let (analyzer, released) = counting_analyzer();
    let stream = analyzer.token_stream("body", "a b c")?;
    let term = stream.add_attribute::<CharTermAttribute>();

    let mut seen = 0;
    let outcome = stream.consume(|_| {
        seen += 1;
        if term.borrow().as_str() == "b" {
            Err(TokenflowError::other("stop at b"))
        } else {
            Ok(())
        }
    });

    assert!(matches!(outcome, Err(TokenflowError::Other(_))));
    assert_eq!(seen, 2);
    assert_eq!(released.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn test_collect_tokens_positions() -> Result<()> {
    let analyzer = StandardAnalyzer::new();
    let tokens = analyzer.token_stream("body", "Stop the presses")?.collect_tokens()?;

    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].text, "stop");
    assert_eq!(tokens[0].position, 0);
    assert_eq!(tokens[1].text, "presses");
    assert_eq!(tokens[1].position, 2);
    Ok(())
}

#[test]
fn test_analyzer_is_shared_between_threads() {
    let analyzer: Arc<dyn Analyzer> = Arc::new(SmartChineseAnalyzer::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let analyzer = Arc::clone(&analyzer);
            std::thread::spawn(move || analyzer.analyze("body", "我是中国人").map(|t| t.len()))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), 4);
    }
}

#[test]
fn test_position_increment_visible_to_consumer() -> Result<()> {
    let analyzer = StandardAnalyzer::new();
    let mut stream = analyzer.token_stream("body", "to rust or go")?;
    let increment = stream.add_attribute::<PositionIncrementAttribute>();
    let term = stream.add_attribute::<CharTermAttribute>();

    stream.reset()?;
    assert!(stream.increment_token()?);
    assert_eq!(term.borrow().as_str(), "rust");
    assert_eq!(increment.borrow().increment(), 2);
    assert!(stream.increment_token()?);
    assert_eq!(term.borrow().as_str(), "go");
    assert_eq!(increment.borrow().increment(), 2);
    Ok(())
}
