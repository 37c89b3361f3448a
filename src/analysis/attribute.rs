//! Per-stream token attributes.
//!
//! A token stream does not hand out token objects. Instead every stage of a
//! pipeline reads and writes a fixed set of attribute slots that live in one
//! [`AttributeSet`]. The producer mutates the slots in place on every advance,
//! and consumers observe the current token through [`AttributeHandle`]s they
//! obtained once, before iterating.
//!
//! # Attribute kinds
//!
//! | Kind | Type | Default |
//! |------|------|---------|
//! | [`AttributeKind::CharTerm`] | [`CharTermAttribute`] | empty |
//! | [`AttributeKind::Offset`] | [`OffsetAttribute`] | `0..0` |
//! | [`AttributeKind::PositionIncrement`] | [`PositionIncrementAttribute`] | 1 |
//! | [`AttributeKind::PositionLength`] | [`PositionLengthAttribute`] | 1 |
//! | [`AttributeKind::Type`] | [`TypeAttribute`] | `word` |
//! | [`AttributeKind::Flags`] | [`FlagsAttribute`] | 0 |
//! | [`AttributeKind::Keyword`] | [`KeywordAttribute`] | false |
//!
//! Each kind has exactly one slot per set. Adding the same kind twice returns
//! handles to the same slot:
//!
//! ```
//! use tokenflow::analysis::attribute::{AttributeSet, OffsetAttribute};
//!
//! let attributes = AttributeSet::new();
//! let a = attributes.add_attribute::<OffsetAttribute>();
//! let b = attributes.add_attribute::<OffsetAttribute>();
//! assert!(a.ptr_eq(&b));
//!
//! a.borrow_mut().set_offset(3, 7);
//! assert_eq!(b.borrow().end_offset(), 7);
//! ```

use std::cell::{OnceCell, Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::analysis::token::{Token, TokenType};
use crate::error::{Result, TokenflowError};

/// Identifier of an attribute slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    CharTerm,
    Offset,
    PositionIncrement,
    PositionLength,
    Type,
    Flags,
    Keyword,
}

impl AttributeKind {
    /// All kinds in slot order.
    pub const ALL: [AttributeKind; 7] = [
        AttributeKind::CharTerm,
        AttributeKind::Offset,
        AttributeKind::PositionIncrement,
        AttributeKind::PositionLength,
        AttributeKind::Type,
        AttributeKind::Flags,
        AttributeKind::Keyword,
    ];

    /// The snake_case name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKind::CharTerm => "char_term",
            AttributeKind::Offset => "offset",
            AttributeKind::PositionIncrement => "position_increment",
            AttributeKind::PositionLength => "position_length",
            AttributeKind::Type => "type",
            AttributeKind::Flags => "flags",
            AttributeKind::Keyword => "keyword",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value type that can live in an [`AttributeSet`] slot.
///
/// The association between a type, its [`AttributeKind`] and its slot in the
/// set is static; there is no runtime type lookup.
pub trait Attribute: Clone + Default + fmt::Debug + 'static {
    /// The kind identifying this attribute's slot.
    const KIND: AttributeKind;

    /// The slot holding this attribute in `set`.
    fn slot(set: &AttributeSet) -> &OnceCell<AttributeHandle<Self>>;

    /// Field values as `(name, value)` pairs, used for debug rendering.
    fn reflect(&self) -> Vec<(&'static str, String)>;

    /// Restore the default value.
    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A shared reference to one attribute slot.
///
/// Clones of a handle point at the same slot, so a write through one handle is
/// visible through all of them.
pub struct AttributeHandle<T> {
    slot: Rc<RefCell<T>>,
}

impl<T: Attribute> AttributeHandle<T> {
    fn allocate() -> Self {
        AttributeHandle {
            slot: Rc::new(RefCell::new(T::default())),
        }
    }

    /// Immutably borrow the current value.
    ///
    /// # Panics
    ///
    /// Panics if the slot is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.slot.borrow()
    }

    /// Mutably borrow the current value.
    ///
    /// # Panics
    ///
    /// Panics if the slot is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.slot.borrow_mut()
    }

    /// A copy of the current value.
    pub fn get(&self) -> T {
        self.slot.borrow().clone()
    }

    /// Replace the current value.
    pub fn set(&self, value: T) {
        *self.slot.borrow_mut() = value;
    }

    /// Whether both handles refer to the same slot.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }
}

impl<T> Clone for AttributeHandle<T> {
    fn clone(&self) -> Self {
        AttributeHandle {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for AttributeHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AttributeHandle")
            .field(&self.slot.borrow())
            .finish()
    }
}

/// The text of the current token.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CharTermAttribute {
    term: String,
}

impl CharTermAttribute {
    pub fn as_str(&self) -> &str {
        &self.term
    }

    /// Replace the term text, reusing the buffer.
    pub fn set(&mut self, text: &str) {
        self.term.clear();
        self.term.push_str(text);
    }

    pub fn push_str(&mut self, text: &str) {
        self.term.push_str(text);
    }

    pub fn len(&self) -> usize {
        self.term.len()
    }

    pub fn is_empty(&self) -> bool {
        self.term.is_empty()
    }
}

impl fmt::Display for CharTermAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.term)
    }
}

impl Attribute for CharTermAttribute {
    const KIND: AttributeKind = AttributeKind::CharTerm;

    fn slot(set: &AttributeSet) -> &OnceCell<AttributeHandle<Self>> {
        &set.char_term
    }

    fn reflect(&self) -> Vec<(&'static str, String)> {
        vec![("term", self.term.clone())]
    }

    fn clear(&mut self) {
        self.term.clear();
    }
}

/// Byte offsets of the current token in the original input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OffsetAttribute {
    start: usize,
    end: usize,
}

impl OffsetAttribute {
    pub fn start_offset(&self) -> usize {
        self.start
    }

    pub fn end_offset(&self) -> usize {
        self.end
    }

    /// Set both offsets. `end` must not be smaller than `start`.
    pub fn set_offset(&mut self, start: usize, end: usize) {
        debug_assert!(end >= start, "end offset {end} before start offset {start}");
        self.start = start;
        self.end = end.max(start);
    }
}

impl Attribute for OffsetAttribute {
    const KIND: AttributeKind = AttributeKind::Offset;

    fn slot(set: &AttributeSet) -> &OnceCell<AttributeHandle<Self>> {
        &set.offset
    }

    fn reflect(&self) -> Vec<(&'static str, String)> {
        vec![
            ("start_offset", self.start.to_string()),
            ("end_offset", self.end.to_string()),
        ]
    }
}

/// Distance from the previous token's position.
///
/// 0 stacks the token on the previous position (synonyms), values above 1
/// leave holes (removed stop words).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PositionIncrementAttribute {
    increment: usize,
}

impl PositionIncrementAttribute {
    pub fn increment(&self) -> usize {
        self.increment
    }

    pub fn set_increment(&mut self, increment: usize) {
        self.increment = increment;
    }
}

impl Default for PositionIncrementAttribute {
    fn default() -> Self {
        PositionIncrementAttribute { increment: 1 }
    }
}

impl Attribute for PositionIncrementAttribute {
    const KIND: AttributeKind = AttributeKind::PositionIncrement;

    fn slot(set: &AttributeSet) -> &OnceCell<AttributeHandle<Self>> {
        &set.position_increment
    }

    fn reflect(&self) -> Vec<(&'static str, String)> {
        vec![("position_increment", self.increment.to_string())]
    }
}

/// Number of positions the current token spans.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PositionLengthAttribute {
    length: usize,
}

impl PositionLengthAttribute {
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn set_length(&mut self, length: usize) {
        self.length = length;
    }
}

impl Default for PositionLengthAttribute {
    fn default() -> Self {
        PositionLengthAttribute { length: 1 }
    }
}

impl Attribute for PositionLengthAttribute {
    const KIND: AttributeKind = AttributeKind::PositionLength;

    fn slot(set: &AttributeSet) -> &OnceCell<AttributeHandle<Self>> {
        &set.position_length
    }

    fn reflect(&self) -> Vec<(&'static str, String)> {
        vec![("position_length", self.length.to_string())]
    }
}

/// Lexical type of the current token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TypeAttribute {
    token_type: TokenType,
}

impl TypeAttribute {
    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    pub fn set_token_type(&mut self, token_type: TokenType) {
        self.token_type = token_type;
    }
}

impl Attribute for TypeAttribute {
    const KIND: AttributeKind = AttributeKind::Type;

    fn slot(set: &AttributeSet) -> &OnceCell<AttributeHandle<Self>> {
        &set.token_type
    }

    fn reflect(&self) -> Vec<(&'static str, String)> {
        vec![("type", self.token_type.to_string())]
    }
}

/// Free-form bit flags for custom pipelines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlagsAttribute {
    flags: u32,
}

impl FlagsAttribute {
    pub fn flags(&self) -> u32 {
        self.flags
    }

    pub fn set_flags(&mut self, flags: u32) {
        self.flags = flags;
    }
}

impl Attribute for FlagsAttribute {
    const KIND: AttributeKind = AttributeKind::Flags;

    fn slot(set: &AttributeSet) -> &OnceCell<AttributeHandle<Self>> {
        &set.flags
    }

    fn reflect(&self) -> Vec<(&'static str, String)> {
        vec![("flags", format!("{:#x}", self.flags))]
    }
}

/// Marks a token that normalizing filters must leave untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeywordAttribute {
    keyword: bool,
}

impl KeywordAttribute {
    pub fn is_keyword(&self) -> bool {
        self.keyword
    }

    pub fn set_keyword(&mut self, keyword: bool) {
        self.keyword = keyword;
    }
}

impl Attribute for KeywordAttribute {
    const KIND: AttributeKind = AttributeKind::Keyword;

    fn slot(set: &AttributeSet) -> &OnceCell<AttributeHandle<Self>> {
        &set.keyword
    }

    fn reflect(&self) -> Vec<(&'static str, String)> {
        vec![("keyword", self.keyword.to_string())]
    }
}

/// The attribute registry of one token stream.
///
/// Slots are allocated lazily on the first [`add_attribute`](Self::add_attribute)
/// for a kind and live as long as the set.
#[derive(Default)]
pub struct AttributeSet {
    char_term: OnceCell<AttributeHandle<CharTermAttribute>>,
    offset: OnceCell<AttributeHandle<OffsetAttribute>>,
    position_increment: OnceCell<AttributeHandle<PositionIncrementAttribute>>,
    position_length: OnceCell<AttributeHandle<PositionLengthAttribute>>,
    token_type: OnceCell<AttributeHandle<TypeAttribute>>,
    flags: OnceCell<AttributeHandle<FlagsAttribute>>,
    keyword: OnceCell<AttributeHandle<KeywordAttribute>>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` if needed and return a handle to its slot.
    pub fn add_attribute<T: Attribute>(&self) -> AttributeHandle<T> {
        T::slot(self).get_or_init(AttributeHandle::allocate).clone()
    }

    /// Return a handle to the slot of `T`, failing if it was never added.
    pub fn get_attribute<T: Attribute>(&self) -> Result<AttributeHandle<T>> {
        T::slot(self)
            .get()
            .cloned()
            .ok_or_else(|| TokenflowError::attribute_not_present(T::KIND))
    }

    pub fn has_attribute<T: Attribute>(&self) -> bool {
        T::slot(self).get().is_some()
    }

    /// Whether the slot for `kind` has been allocated.
    pub fn has_kind(&self, kind: AttributeKind) -> bool {
        match kind {
            AttributeKind::CharTerm => self.char_term.get().is_some(),
            AttributeKind::Offset => self.offset.get().is_some(),
            AttributeKind::PositionIncrement => self.position_increment.get().is_some(),
            AttributeKind::PositionLength => self.position_length.get().is_some(),
            AttributeKind::Type => self.token_type.get().is_some(),
            AttributeKind::Flags => self.flags.get().is_some(),
            AttributeKind::Keyword => self.keyword.get().is_some(),
        }
    }

    /// Registered kinds, in slot order.
    pub fn kinds(&self) -> Vec<AttributeKind> {
        AttributeKind::ALL
            .into_iter()
            .filter(|kind| self.has_kind(*kind))
            .collect()
    }

    /// Reset every registered slot to its default value.
    pub fn clear_attributes(&self) {
        clear_slot(&self.char_term);
        clear_slot(&self.offset);
        clear_slot(&self.position_increment);
        clear_slot(&self.position_length);
        clear_slot(&self.token_type);
        clear_slot(&self.flags);
        clear_slot(&self.keyword);
    }

    /// Copy the values of all registered slots.
    pub fn capture_state(&self) -> AttributeState {
        AttributeState {
            char_term: capture_slot(&self.char_term),
            offset: capture_slot(&self.offset),
            position_increment: capture_slot(&self.position_increment),
            position_length: capture_slot(&self.position_length),
            token_type: capture_slot(&self.token_type),
            flags: capture_slot(&self.flags),
            keyword: capture_slot(&self.keyword),
        }
    }

    /// Write previously captured values back into the slots.
    pub fn restore_state(&self, state: &AttributeState) {
        restore_slot(self, &state.char_term);
        restore_slot(self, &state.offset);
        restore_slot(self, &state.position_increment);
        restore_slot(self, &state.position_length);
        restore_slot(self, &state.token_type);
        restore_slot(self, &state.flags);
        restore_slot(self, &state.keyword);
    }

    /// Render every registered attribute as `name=value` pairs.
    ///
    /// With `prepend_kind`, each pair is prefixed with its attribute kind
    /// (`offset#start_offset=0`).
    pub fn reflect_as_string(&self, prepend_kind: bool) -> String {
        let mut parts = Vec::new();
        reflect_slot(&self.char_term, prepend_kind, &mut parts);
        reflect_slot(&self.offset, prepend_kind, &mut parts);
        reflect_slot(&self.position_increment, prepend_kind, &mut parts);
        reflect_slot(&self.position_length, prepend_kind, &mut parts);
        reflect_slot(&self.token_type, prepend_kind, &mut parts);
        reflect_slot(&self.flags, prepend_kind, &mut parts);
        reflect_slot(&self.keyword, prepend_kind, &mut parts);
        parts.join(",")
    }

    /// An owned copy of the current token.
    ///
    /// Unregistered attributes take their default values. The absolute
    /// position is left at 0; see [`PositionTracker`](crate::analysis::token::PositionTracker).
    pub fn snapshot(&self) -> Token {
        let mut token = Token::new(
            self.char_term
                .get()
                .map(|term| term.borrow().as_str().to_string())
                .unwrap_or_default(),
            0,
        );
        if let Some(offset) = self.offset.get() {
            let offset = offset.borrow();
            token.start_offset = offset.start_offset();
            token.end_offset = offset.end_offset();
        }
        if let Some(increment) = self.position_increment.get() {
            token.position_increment = increment.borrow().increment();
        }
        if let Some(length) = self.position_length.get() {
            token.position_length = length.borrow().length();
        }
        if let Some(token_type) = self.token_type.get() {
            token.token_type = token_type.borrow().token_type();
        }
        if let Some(flags) = self.flags.get() {
            token.flags = flags.borrow().flags();
        }
        if let Some(keyword) = self.keyword.get() {
            token.keyword = keyword.borrow().is_keyword();
        }
        token
    }
}

impl fmt::Debug for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeSet")
            .field("kinds", &self.kinds())
            .field("values", &self.reflect_as_string(false))
            .finish()
    }
}

/// Values captured from an [`AttributeSet`] by
/// [`capture_state`](AttributeSet::capture_state).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeState {
    char_term: Option<CharTermAttribute>,
    offset: Option<OffsetAttribute>,
    position_increment: Option<PositionIncrementAttribute>,
    position_length: Option<PositionLengthAttribute>,
    token_type: Option<TypeAttribute>,
    flags: Option<FlagsAttribute>,
    keyword: Option<KeywordAttribute>,
}

fn clear_slot<T: Attribute>(slot: &OnceCell<AttributeHandle<T>>) {
    if let Some(handle) = slot.get() {
        handle.borrow_mut().clear();
    }
}

fn capture_slot<T: Attribute>(slot: &OnceCell<AttributeHandle<T>>) -> Option<T> {
    slot.get().map(AttributeHandle::get)
}

fn restore_slot<T: Attribute>(set: &AttributeSet, value: &Option<T>) {
    if let Some(value) = value {
        set.add_attribute::<T>().set(value.clone());
    }
}

fn reflect_slot<T: Attribute>(
    slot: &OnceCell<AttributeHandle<T>>,
    prepend_kind: bool,
    parts: &mut Vec<String>,
) {
    if let Some(handle) = slot.get() {
        for (name, value) in handle.borrow().reflect() {
            if prepend_kind {
                parts.push(format!("{}#{name}={value}", T::KIND));
            } else {
                parts.push(format!("{name}={value}"));
            }
        }
    }
}
