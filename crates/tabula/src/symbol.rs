//! # Symbols
//!
//! Tokens produced by a scanner and nonterminals produced by reductions share
//! one record type, [`Symbol`]. A symbol carries its grammar id, a source span
//! made of two packed [`Position`] markers and an optional semantic value.

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Grammar symbol identifier. Terminals come first, nonterminals follow.
pub type SymbolId = u16;

/// Automaton state identifier.
pub type StateId = u16;

/// Index of a grammar rule.
pub type RuleId = u16;

/// Id of the end-of-input terminal.
pub const EOF: SymbolId = 0;

const COLUMN_BITS: u32 = 12;
const COLUMN_MASK: u32 = (1 << COLUMN_BITS) - 1;
const MAX_LINE: u32 = (1 << (32 - COLUMN_BITS)) - 1;

/// Line/column marker packed into a single word.
///
/// The line occupies the high 20 bits and the column the low 12 bits. Both
/// are zero-based; [`Display`](fmt::Display) renders them 1-based. Values that
/// do not fit saturate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Position(u32);

impl Position {
    /// The first column of the first line
    pub const ZERO: Self = Self(0);

    /// Pack a zero-based line and column
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        let line = if line > MAX_LINE { MAX_LINE } else { line };
        let column = if column > COLUMN_MASK { COLUMN_MASK } else { column };
        Self((line << COLUMN_BITS) | column)
    }

    /// Reinterpret a packed word
    #[must_use]
    pub const fn from_packed(packed: u32) -> Self {
        Self(packed)
    }

    #[must_use]
    pub const fn packed(self) -> u32 {
        self.0
    }

    /// Zero-based line
    #[must_use]
    pub const fn line(self) -> u32 {
        self.0 >> COLUMN_BITS
    }

    /// Zero-based column
    #[must_use]
    pub const fn column(self) -> u32 {
        self.0 & COLUMN_MASK
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line() + 1, self.column() + 1)
    }
}

/// A terminal or nonterminal together with its span and semantic value.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol<V> {
    pub id: SymbolId,
    pub start: Position,
    pub end: Position,
    pub value: Option<V>,
}

impl<V> Symbol<V> {
    /// Create a symbol carrying a value
    #[must_use]
    pub const fn new(id: SymbolId, start: Position, end: Position, value: V) -> Self {
        Self {
            id,
            start,
            end,
            value: Some(value),
        }
    }

    /// Create a valueless symbol, as used for synthetic tokens and markers
    #[must_use]
    pub const fn empty(id: SymbolId, start: Position, end: Position) -> Self {
        Self {
            id,
            start,
            end,
            value: None,
        }
    }

    /// End-of-input token at `at`
    #[must_use]
    pub const fn eof(at: Position) -> Self {
        Self::empty(EOF, at, at)
    }

    #[inline]
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        self.id == EOF
    }

    /// Render as `start-end` with 1-based coordinates
    #[must_use]
    pub const fn span(&self) -> Span {
        Span {
            start: self.start,
            end: self.end,
        }
    }
}

impl<V: fmt::Debug> Symbol<V> {
    /// Human-readable description: the value when there is one, otherwise the
    /// numeric id.
    #[must_use]
    pub fn describe(&self) -> String {
        match &self.value {
            Some(value) => format!("{value:?}"),
            None => format!("#{}", self.id),
        }
    }
}

/// Start/end pair of a symbol, displayed as `L:C-L:C`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
