//! Dictionary-driven segmentation for Han text.
//!
//! Runs of Han ideographs are split by forward maximum matching: at each
//! character the longest dictionary word starting there becomes a token, and a
//! character that starts no known word becomes a token of its own. Text outside
//! Han runs is split on Unicode word boundaries; punctuation is dropped.
//!
//! In [`SegmentMode::Search`] every shorter dictionary word starting at the
//! same character is emitted as well, stacked on the same position (position
//! increment 0), which improves recall for query-time matching.
//!
//! # Examples
//!
//! ```
//! use tokenflow::analysis::segmenter::Segmenter;
//! use tokenflow::analysis::segmenter::dictionary::DictionarySegmenter;
//!
//! let text = "我是中国人";
//! let segments = DictionarySegmenter::new().segment(text).unwrap();
//! let words: Vec<_> = segments.iter().map(|s| s.text(text)).collect();
//! assert_eq!(words, vec!["我", "是", "中国", "人"]);
//! ```

use std::io::BufRead;
use std::sync::{Arc, LazyLock};

use ahash::AHashSet;
use log::debug;
use serde::{Deserialize, Serialize};

use super::unicode_word::word_segments;
use super::{Segment, Segmenter};

use crate::analysis::token::{TokenType, is_cjk_ideograph};
use crate::error::{Result, TokenflowError};

const DEFAULT_MAX_WORD_LEN: usize = 8;

/// Words shipped with the crate, enough for common vocabulary.
const BUILTIN_WORDS: &[&str] = &[
    "中国", "中华", "中华人民共和国", "人民", "共和国", "国家", "我们", "你们", "他们",
    "她们", "它们", "自己", "什么", "怎么", "为什么", "这个", "那个", "这些", "那些",
    "北京", "上海", "广州", "深圳", "大学", "北京大学", "大学生", "学生", "老师", "学校",
    "今天", "明天", "昨天", "现在", "时候", "时间", "天气", "工作", "学习", "生活",
    "中文", "汉字", "汉语", "语言", "词语", "分词", "搜索", "引擎", "搜索引擎", "文本",
    "分析", "分析器", "数据", "数据库", "信息", "系统", "计算机", "软件", "程序", "开发",
    "开源", "项目", "问题", "方法", "可以", "没有", "已经", "因为", "所以", "但是",
    "如果", "虽然", "而且", "或者", "非常", "一个", "一些", "朋友", "世界", "城市",
    "经济", "发展", "社会", "文化", "历史", "科学", "技术", "网络", "手机", "电脑",
];

static BUILTIN_DICTIONARY: LazyLock<Arc<WordDictionary>> =
    LazyLock::new(|| Arc::new(WordDictionary::from_words(BUILTIN_WORDS.iter().copied())));

/// How overlapping dictionary words are reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentMode {
    /// Only the longest match at each point.
    #[default]
    Precise,
    /// The longest match plus shorter words starting at the same character.
    Search,
}

/// A set of known words.
#[derive(Clone, Debug, Default)]
pub struct WordDictionary {
    words: AHashSet<String>,
    max_word_chars: usize,
}

impl WordDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// The dictionary shipped with the crate.
    pub fn builtin() -> Arc<WordDictionary> {
        Arc::clone(&BUILTIN_DICTIONARY)
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dictionary = Self::new();
        for word in words {
            dictionary.insert(word.as_ref());
        }
        dictionary
    }

    /// Load a dictionary in `word [frequency] [tag]` line format.
    ///
    /// Blank lines and lines starting with `#` are skipped. Frequencies and
    /// tags are validated but not used.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut dictionary = Self::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else {
                continue;
            };
            if let Some(frequency) = fields.next() {
                frequency.parse::<u64>().map_err(|e| {
                    TokenflowError::analysis(format!(
                        "Invalid frequency '{frequency}' on dictionary line {}: {e}",
                        line_num + 1
                    ))
                })?;
            }
            dictionary.insert(word);
        }

        debug!(
            "loaded {} dictionary words (longest {} chars)",
            dictionary.len(),
            dictionary.max_word_chars
        );
        Ok(dictionary)
    }

    pub fn insert(&mut self, word: &str) {
        let chars = word.chars().count();
        if chars == 0 {
            return;
        }
        self.max_word_chars = self.max_word_chars.max(chars);
        self.words.insert(word.to_string());
    }

    /// Add all words of `other`.
    pub fn extend(&mut self, other: &WordDictionary) {
        for word in &other.words {
            self.insert(word);
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Length of the longest word, in chars.
    pub fn max_word_chars(&self) -> usize {
        self.max_word_chars
    }
}

/// Forward-maximum-matching segmenter over a [`WordDictionary`].
#[derive(Clone, Debug)]
pub struct DictionarySegmenter {
    dictionary: Arc<WordDictionary>,
    mode: SegmentMode,
    max_word_chars: usize,
}

impl DictionarySegmenter {
    /// A precise-mode segmenter over the built-in dictionary.
    pub fn new() -> Self {
        Self::with_dictionary(WordDictionary::builtin())
    }

    pub fn with_dictionary(dictionary: Arc<WordDictionary>) -> Self {
        let max_word_chars = dictionary.max_word_chars().clamp(1, DEFAULT_MAX_WORD_LEN);
        DictionarySegmenter {
            dictionary,
            mode: SegmentMode::Precise,
            max_word_chars,
        }
    }

    pub fn mode(mut self, mode: SegmentMode) -> Self {
        self.mode = mode;
        self
    }

    /// Cap on the match length, in chars.
    pub fn max_word_chars(mut self, max_word_chars: usize) -> Self {
        self.max_word_chars = max_word_chars.max(1);
        self
    }

    pub fn dictionary(&self) -> &Arc<WordDictionary> {
        &self.dictionary
    }

    pub fn segment_mode(&self) -> SegmentMode {
        self.mode
    }

    /// Segment one Han run. `bounds` holds the byte offset of every char of
    /// the run plus the run's end offset.
    fn segment_han_run(&self, text: &str, bounds: &[usize], segments: &mut Vec<Segment>) {
        let chars = bounds.len() - 1;
        let mut i = 0;

        while i < chars {
            let longest_limit = self.max_word_chars.min(chars - i);
            let matched = (2..=longest_limit)
                .rev()
                .find(|&len| self.dictionary.contains(&text[bounds[i]..bounds[i + len]]))
                .unwrap_or(1);

            segments.push(
                Segment::new(bounds[i], bounds[i + matched]).with_token_type(TokenType::Cjk),
            );

            if self.mode == SegmentMode::Search {
                for len in (2..matched).rev() {
                    if self.dictionary.contains(&text[bounds[i]..bounds[i + len]]) {
                        segments.push(
                            Segment::new(bounds[i], bounds[i + len])
                                .with_position_increment(0)
                                .with_token_type(TokenType::Cjk),
                        );
                    }
                }
            }

            i += matched;
        }
    }
}

impl Default for DictionarySegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter for DictionarySegmenter {
    fn segment(&self, text: &str) -> Result<Vec<Segment>> {
        let mut segments = Vec::new();
        let mut han_bounds: Vec<usize> = Vec::new();
        let mut other_start: Option<usize> = None;

        for (offset, c) in text.char_indices() {
            if is_cjk_ideograph(c) {
                if let Some(start) = other_start.take() {
                    segments.extend(word_segments(&text[start..offset], start));
                }
                han_bounds.push(offset);
            } else {
                if !han_bounds.is_empty() {
                    han_bounds.push(offset);
                    self.segment_han_run(text, &han_bounds, &mut segments);
                    han_bounds.clear();
                }
                other_start.get_or_insert(offset);
            }
        }

        if !han_bounds.is_empty() {
            han_bounds.push(text.len());
            self.segment_han_run(text, &han_bounds, &mut segments);
        }
        if let Some(start) = other_start {
            segments.extend(word_segments(&text[start..], start));
        }

        Ok(segments)
    }

    fn name(&self) -> &'static str {
        "dictionary"
    }
}
