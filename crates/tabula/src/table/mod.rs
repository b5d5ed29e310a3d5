//! # Parsing Tables
//!
//! The parser consumes tables through the [`ParseTables`] trait. Table
//! generation is out of scope; [`PackedTables`] is the provided
//! implementation and [`TableBuilder`] assembles one from explicit entries.
//!
//! ## Action Encoding
//!
//! Actions and gotos are stored as signed 16-bit codes:
//!
//! | Code | Meaning |
//! |------|---------|
//! | `> 0` | shift to state `code` |
//! | `0` | error |
//! | `!rule_count` | accept |
//! | other `< 0` | reduce by rule `!code` |
//!
//! Codes are decoded once into [`Action`]; nothing past this module looks at
//! the raw representation.

mod packed;

pub use packed::{PackedTables, TableBuilder, TableParts, UNUSED_OFFSET};

use crate::symbol::{EOF, RuleId, StateId, SymbolId};

/// LR parsing action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Shift to state
    Shift(StateId),
    /// Reduce using rule
    Reduce(RuleId),
    /// Accept (successful parse)
    Accept,
    /// Error (no action)
    Error,
}

impl Action {
    /// Decode a raw table code.
    #[must_use]
    pub const fn decode(code: i16, rule_count: usize) -> Self {
        if code > 0 {
            Self::Shift(code as StateId)
        } else if code == 0 {
            Self::Error
        } else {
            let rule = !code as RuleId;
            if rule as usize == rule_count {
                Self::Accept
            } else {
                Self::Reduce(rule)
            }
        }
    }

    /// Encode back into a raw table code.
    ///
    /// Callers guarantee that state and rule ids fit; [`TableBuilder`] checks
    /// this before encoding.
    #[must_use]
    pub const fn encode(self, rule_count: usize) -> i16 {
        match self {
            Self::Shift(state) => state as i16,
            Self::Reduce(rule) => !(rule as i16),
            Self::Accept => !(rule_count as i16),
            Self::Error => 0,
        }
    }

    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }
}

/// Rule descriptor: right-hand side length in the low 16 bits, left-hand side
/// symbol in the high 16 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleInfo(u32);

impl RuleInfo {
    #[must_use]
    pub const fn new(lhs: SymbolId, rhs_len: u16) -> Self {
        Self(((lhs as u32) << 16) | rhs_len as u32)
    }

    #[must_use]
    pub const fn from_packed(packed: u32) -> Self {
        Self(packed)
    }

    #[must_use]
    pub const fn packed(self) -> u32 {
        self.0
    }

    /// Number of symbols the rule pops
    #[must_use]
    pub const fn rhs_len(self) -> usize {
        (self.0 & 0xFFFF) as usize
    }

    /// Symbol the rule produces
    #[must_use]
    pub const fn lhs(self) -> SymbolId {
        (self.0 >> 16) as SymbolId
    }
}

/// Read access to LR(1) parsing tables.
///
/// Implementations provide the raw codes; decoding and lookahead enumeration
/// come for free.
pub trait ParseTables {
    /// Raw action code for `terminal` in `state`
    fn action_code(&self, state: StateId, terminal: SymbolId) -> i16;

    /// Raw goto code for `nonterminal` in `state`
    fn goto_code(&self, state: StateId, nonterminal: SymbolId) -> i16;

    fn rule_info(&self, rule: RuleId) -> RuleInfo;

    fn rule_count(&self) -> usize;

    /// Terminals are the ids `0..terminal_count`, with [`EOF`] first.
    fn terminal_count(&self) -> usize;

    /// The symbol shifted by phrase-level recovery, if the grammar has one
    fn error_symbol(&self) -> Option<SymbolId>;

    /// Compressed tables answer with a default action for terminals the
    /// state has no entry for, so the set of valid lookaheads is unknown.
    fn is_compressed(&self) -> bool;

    /// Whether `terminal` has an explicit entry in `state`'s action row.
    /// Meaningless for compressed tables.
    fn has_lookahead(&self, state: StateId, terminal: SymbolId) -> bool;

    #[inline]
    fn accept_code(&self) -> i16 {
        Action::Accept.encode(self.rule_count())
    }

    #[inline]
    fn action(&self, state: StateId, terminal: SymbolId) -> Action {
        Action::decode(self.action_code(state, terminal), self.rule_count())
    }

    #[inline]
    fn goto(&self, state: StateId, nonterminal: SymbolId) -> Action {
        Action::decode(self.goto_code(state, nonterminal), self.rule_count())
    }

    /// Lowest-numbered terminal, other than [`EOF`], valid in `state`.
    /// Always `None` for compressed tables.
    fn first_terminal(&self, state: StateId) -> Option<SymbolId> {
        self.lookaheads(state).find(|&terminal| terminal != EOF)
    }

    /// Terminals valid in `state`, ascending. Empty for compressed tables.
    fn lookaheads(&self, state: StateId) -> Lookaheads<'_, Self> {
        Lookaheads {
            tables: self,
            state,
            next: 0,
            end: if self.is_compressed() {
                0
            } else {
                self.terminal_count()
            },
        }
    }
}

/// Iterator over the terminals valid in one state.
#[derive(Debug)]
pub struct Lookaheads<'t, T: ?Sized> {
    tables: &'t T,
    state: StateId,
    next: usize,
    end: usize,
}

impl<T: ParseTables + ?Sized> Iterator for Lookaheads<'_, T> {
    type Item = SymbolId;

    fn next(&mut self) -> Option<SymbolId> {
        while self.next < self.end {
            let terminal = self.next as SymbolId;
            self.next += 1;
            if self.tables.has_lookahead(self.state, terminal) {
                return Some(terminal);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.end - self.next))
    }
}

impl<T: ParseTables + ?Sized> ParseTables for &T {
    fn action_code(&self, state: StateId, terminal: SymbolId) -> i16 {
        (**self).action_code(state, terminal)
    }

    fn goto_code(&self, state: StateId, nonterminal: SymbolId) -> i16 {
        (**self).goto_code(state, nonterminal)
    }

    fn rule_info(&self, rule: RuleId) -> RuleInfo {
        (**self).rule_info(rule)
    }

    fn rule_count(&self) -> usize {
        (**self).rule_count()
    }

    fn terminal_count(&self) -> usize {
        (**self).terminal_count()
    }

    fn error_symbol(&self) -> Option<SymbolId> {
        (**self).error_symbol()
    }

    fn is_compressed(&self) -> bool {
        (**self).is_compressed()
    }

    fn has_lookahead(&self, state: StateId, terminal: SymbolId) -> bool {
        (**self).has_lookahead(state, terminal)
    }
}
