use crate::symbol::{RuleId, StateId, SymbolId};

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Statistics collected during parsing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct ParseStats {
    /// Number of terminals shifted, synthetic ones included
    pub tokens_shifted: usize,
    /// Number of reductions performed
    pub reductions: usize,
    /// Syntax errors detected
    pub syntax_errors: usize,
    /// Syntax errors repaired
    pub errors_recovered: usize,
    /// Speculative parses run by recovery
    pub simulations: usize,
    /// Maximum automaton stack depth
    pub max_depth: usize,
}

impl ParseStats {
    /// Create new empty stats
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tokens_shifted: 0,
            reductions: 0,
            syntax_errors: 0,
            errors_recovered: 0,
            simulations: 0,
            max_depth: 0,
        }
    }

    /// Merge stats from another instance
    pub fn merge(&mut self, other: &Self) {
        self.tokens_shifted += other.tokens_shifted;
        self.reductions += other.reductions;
        self.syntax_errors += other.syntax_errors;
        self.errors_recovered += other.errors_recovered;
        self.simulations += other.simulations;
        self.max_depth = self.max_depth.max(other.max_depth);
    }
}

/// The repair a recovery attempt tried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum RecoveryStrategy {
    InsertMissing,
    ReplaceMisspelled,
    DeleteUnexpected,
    ErrorPhrase,
}

/// A parsing event for debugging/tracing
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum ParseEvent {
    /// Shifted a terminal
    Shift { state: StateId, symbol: SymbolId },
    /// Reduced by a rule
    Reduce {
        rule: RuleId,
        lhs: SymbolId,
        rhs_len: usize,
    },
    /// Accepted the input
    Accept,
    /// Finished one recovery strategy; `unwound` counts stack entries
    /// discarded while looking for a state that shifts the error symbol.
    /// `reduced` counts entries of the repaired stack that the confirming
    /// simulation reduced away, zero when the strategy failed.
    Recovery {
        strategy: RecoveryStrategy,
        state: StateId,
        succeeded: bool,
        unwound: usize,
        reduced: usize,
    },
}
