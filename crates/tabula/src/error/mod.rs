//! # Error Types
//!
//! Errors crossing the parser boundary and the faults a scanner may raise.
//!
//! ## Overview
//!
//! - [`ParseError`]: the only failures a caller of
//!   [`Parser::parse`](crate::Parser::parse) observes. Syntax errors that
//!   recovery repairs never show up here; they are reported through
//!   [`ParseEvents`](diagnostics::ParseEvents) instead.
//! - [`ScanError`]: faults raised by a [`Scanner`](crate::Scanner). Lexical
//!   faults are reported and scanning resumes; every other fault propagates
//!   unchanged.
//! - [`TableError`]: malformed parsing tables.
//!
//! ## Diagnostics Support
//!
//! When the `diagnostics` feature is enabled, errors integrate with [`miette`]
//! for rich error reporting.

pub mod diagnostics;

use crate::symbol::{Position, RuleId, StateId, SymbolId};
use compact_str::CompactString;
use thiserror::Error;

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

/// Failure surfaced by [`Parser::parse`](crate::Parser::parse).
#[derive(Debug, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum ParseError {
    #[error("Cannot recover from the syntax error at {position}: {reason}")]
    #[cfg_attr(
        feature = "diagnostics",
        diagnostic(
            code(tabula::unrecoverable),
            help("the input contains a syntax error that no recovery strategy could repair")
        )
    )]
    Unrecoverable {
        reason: Unrecoverable,
        position: Position,
    },

    #[error(transparent)]
    #[cfg_attr(feature = "diagnostics", diagnostic(transparent))]
    Scanner(#[from] ScanError),
}

impl ParseError {
    #[must_use]
    pub const fn unrecoverable(reason: Unrecoverable, position: Position) -> Self {
        Self::Unrecoverable { reason, position }
    }

    /// Why recovery gave up, if that is what happened
    #[must_use]
    pub const fn reason(&self) -> Option<Unrecoverable> {
        match self {
            Self::Unrecoverable { reason, .. } => Some(*reason),
            Self::Scanner(_) => None,
        }
    }
}

/// Why a syntax error could not be repaired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Unrecoverable {
    #[error("unexpected end of input")]
    EndOfInput,

    #[error("no state on the stack accepts the error symbol")]
    NoErrorState,

    #[error("input ended while discarding the error phrase")]
    InputExhausted,

    #[error("error recovery is disabled")]
    RecoveryDisabled,

    #[error("too many syntax errors")]
    TooManyErrors,
}

/// A recoverable lexical fault raised by a scanner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
#[cfg_attr(feature = "diagnostics", diagnostic(code(tabula::lexical)))]
#[error("{position}: {message}")]
pub struct LexicalError {
    pub position: Position,
    pub message: CompactString,
}

impl LexicalError {
    #[must_use]
    pub fn new(position: Position, message: impl Into<CompactString>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// Fault raised by a [`Scanner`](crate::Scanner).
#[derive(Debug, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum ScanError {
    /// Reported through the diagnostics sink; the parser asks for the next
    /// token afterwards.
    #[error("Lexical error at {0}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(transparent))]
    Lexical(#[from] LexicalError),

    #[error("I/O error while scanning: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl ScanError {
    /// Shorthand for a lexical fault
    #[must_use]
    pub fn lexical(position: Position, message: impl Into<CompactString>) -> Self {
        Self::Lexical(LexicalError::new(position, message))
    }
}

/// Malformed parsing tables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
#[cfg_attr(feature = "diagnostics", diagnostic(code(tabula::table)))]
pub enum TableError {
    #[error("conflicting entries for symbol {symbol} in state {state}")]
    Conflict { state: StateId, symbol: SymbolId },

    #[error("state {state} shifts to the start state")]
    ShiftToStartState { state: StateId },

    #[error("symbol {symbol} in state {state} is not a {expected}")]
    WrongSymbolKind {
        state: StateId,
        symbol: SymbolId,
        expected: &'static str,
    },

    #[error("rule {rule} is not defined")]
    UnknownRule { rule: RuleId },

    #[error("state {state} is not defined")]
    UnknownState { state: StateId },

    #[error("error symbol {symbol} is not a nonterminal")]
    InvalidErrorSymbol { symbol: SymbolId },

    #[error("rule {rule} has left-hand side {lhs}, which is not a nonterminal")]
    InvalidLhs { rule: RuleId, lhs: SymbolId },

    #[error("too many {what} to encode: {count}")]
    Overflow { what: &'static str, count: usize },

    #[error("table part `{part}` has length {actual}, expected {expected}")]
    PartLength {
        part: &'static str,
        expected: usize,
        actual: usize,
    },
}
