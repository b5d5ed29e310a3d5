use crate::stream::DEFAULT_LOOKAHEAD_WINDOW;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Configuration for the parser
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct ParserConfig {
    /// Enable error recovery
    pub error_recovery: bool,

    /// Maximum number of syntax errors before giving up
    pub max_errors: usize,

    /// Tokens a speculative parse must consume to validate a repair.
    ///
    /// A wider window rejects more repairs that only look good for a token
    /// or two, at the price of more simulated work per error. Values below 1
    /// are treated as 1.
    pub lookahead_window: usize,

    /// Deliver [`ParseEvent`](crate::ParseEvent)s to the diagnostics sink
    pub trace_events: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            error_recovery: true,
            max_errors: 100,
            lookahead_window: DEFAULT_LOOKAHEAD_WINDOW,
            trace_events: false,
        }
    }
}

impl ParserConfig {
    #[must_use]
    pub const fn with_error_recovery(mut self, enabled: bool) -> Self {
        self.error_recovery = enabled;
        self
    }

    #[must_use]
    pub const fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }

    #[must_use]
    pub const fn with_lookahead_window(mut self, window: usize) -> Self {
        self.lookahead_window = window;
        self
    }

    #[must_use]
    pub const fn with_trace_events(mut self, enabled: bool) -> Self {
        self.trace_events = enabled;
        self
    }
}
