//! # Testing Utilities
//!
//! Helpers for testing grammars built on this crate: a diagnostics sink that
//! records every notification and builders for token sequences with
//! predictable positions.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tabula::testing::{Recorded, RecordingEvents, scanner};
//!
//! let mut parser = Parser::new(&tables, actions, RecordingEvents::new());
//! parser.parse(scanner([(NUM, 1), (NUM, 2)]))?;
//! assert!(matches!(
//!     parser.events().entries()[1],
//!     Recorded::MissingTokenInserted(_)
//! ));
//! ```

use crate::error::LexicalError;
use crate::error::diagnostics::ParseEvents;
use crate::parser::ParseEvent;
use crate::scanner::VecScanner;
use crate::symbol::{Position, Symbol, SymbolId};
use std::fmt;

/// One notification received by [`RecordingEvents`]
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded<V> {
    LexicalError(LexicalError),
    SyntaxError(Symbol<V>),
    UnexpectedTokenRemoved(Symbol<V>),
    MissingTokenInserted(Symbol<V>),
    MisspelledTokenReplaced(Symbol<V>),
    ErrorPhraseRemoved(Symbol<V>),
    Trace(ParseEvent),
}

impl<V> Recorded<V> {
    /// The symbol the notification is about, if any
    #[must_use]
    pub const fn symbol(&self) -> Option<&Symbol<V>> {
        match self {
            Self::SyntaxError(symbol)
            | Self::UnexpectedTokenRemoved(symbol)
            | Self::MissingTokenInserted(symbol)
            | Self::MisspelledTokenReplaced(symbol)
            | Self::ErrorPhraseRemoved(symbol) => Some(symbol),
            Self::LexicalError(_) | Self::Trace(_) => None,
        }
    }

    #[must_use]
    pub const fn is_trace(&self) -> bool {
        matches!(self, Self::Trace(_))
    }
}

/// Diagnostics sink that keeps every notification in order.
#[derive(Debug, Clone)]
pub struct RecordingEvents<V> {
    entries: Vec<Recorded<V>>,
}

impl<V> RecordingEvents<V> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[Recorded<V>] {
        &self.entries
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<Recorded<V>> {
        self.entries
    }

    /// Notifications other than traces
    pub fn diagnostics(&self) -> impl Iterator<Item = &Recorded<V>> + '_ {
        self.entries.iter().filter(|entry| !entry.is_trace())
    }

    /// Trace events only
    pub fn traces(&self) -> impl Iterator<Item = &ParseEvent> + '_ {
        self.entries.iter().filter_map(|entry| match entry {
            Recorded::Trace(event) => Some(event),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<V> Default for RecordingEvents<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + fmt::Debug> ParseEvents<V> for RecordingEvents<V> {
    fn report(&mut self, _message: fmt::Arguments<'_>) {}

    fn lexical_error(&mut self, error: &LexicalError) {
        self.entries.push(Recorded::LexicalError(error.clone()));
    }

    fn syntax_error(&mut self, token: &Symbol<V>) {
        self.entries.push(Recorded::SyntaxError(token.clone()));
    }

    fn unexpected_token_removed(&mut self, token: &Symbol<V>) {
        self.entries
            .push(Recorded::UnexpectedTokenRemoved(token.clone()));
    }

    fn missing_token_inserted(&mut self, token: &Symbol<V>) {
        self.entries.push(Recorded::MissingTokenInserted(token.clone()));
    }

    fn misspelled_token_replaced(&mut self, token: &Symbol<V>) {
        self.entries
            .push(Recorded::MisspelledTokenReplaced(token.clone()));
    }

    fn error_phrase_removed(&mut self, error: &Symbol<V>) {
        self.entries.push(Recorded::ErrorPhraseRemoved(error.clone()));
    }

    fn trace(&mut self, event: &ParseEvent) {
        self.entries.push(Recorded::Trace(event.clone()));
    }
}

/// Token number `index` of a single-line input: one column wide, with one
/// blank column before the next token.
#[must_use]
pub const fn token<V>(id: SymbolId, index: u32, value: V) -> Symbol<V> {
    Symbol::new(
        id,
        Position::new(0, index * 2),
        Position::new(0, index * 2 + 1),
        value,
    )
}

/// Lay out `(id, value)` pairs with [`token`]
pub fn tokens<V>(items: impl IntoIterator<Item = (SymbolId, V)>) -> Vec<Symbol<V>> {
    items
        .into_iter()
        .zip(0..)
        .map(|((id, value), index)| token(id, index, value))
        .collect()
}

/// A [`VecScanner`] over [`tokens`]
pub fn scanner<V>(items: impl IntoIterator<Item = (SymbolId, V)>) -> VecScanner<V> {
    VecScanner::new(tokens(items))
}
