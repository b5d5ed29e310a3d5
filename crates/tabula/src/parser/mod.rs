//! # LR Parser Driver
//!
//! [`Parser`] runs the shift/reduce loop over a [`ParseTables`]
//! implementation, pulling terminals from a [`Scanner`] through a
//! [`TokenStream`].
//!
//! ## Main Loop
//!
//! For each lookahead the action of the top state decides:
//!
//! - **Shift**: push the target state and the token, fetch the next token.
//! - **Reduce**: pop the right-hand side, run the reduction action, then take
//!   the goto on the produced nonterminal (shift it, or accept).
//! - **Accept**: return the value of the top symbol.
//! - **Error**: report the token and run error recovery, which edits the
//!   token stream or the stack so that parsing can continue.
//!
//! ## Error Recovery
//!
//! Recovery tries, in order, to insert a missing token, replace a misspelled
//! one, delete an unexpected one and finally to replace a whole phrase with
//! the grammar's error symbol. Every candidate repair is validated by a
//! [`Simulator`] run over the next few tokens before it is committed.

mod config;
mod recovery;
mod simulator;
mod trace;

pub use config::ParserConfig;
pub use simulator::Simulator;
pub use trace::{ParseEvent, ParseStats, RecoveryStrategy};

use crate::actions::{Actions, RhsArgs};
use crate::error::ParseError;
use crate::error::diagnostics::ParseEvents;
use crate::error::Unrecoverable;
use crate::scanner::Scanner;
use crate::stack::ParseStack;
use crate::stream::TokenStream;
use crate::symbol::{Position, RuleId, StateId, Symbol, SymbolId};
use crate::table::{Action, ParseTables};
use std::fmt;
use std::marker::PhantomData;

/// Table-driven LR(1) parser with error recovery.
///
/// A parser owns its reduction actions and its diagnostics sink; tables are
/// borrowed and can be shared between parsers.
pub struct Parser<'t, T: ?Sized, V, A, E> {
    tables: &'t T,
    actions: A,
    events: E,
    config: ParserConfig,
    stats: ParseStats,
    _value: PhantomData<fn() -> V>,
}

impl<'t, T, V, A, E> Parser<'t, T, V, A, E>
where
    T: ParseTables + ?Sized,
    V: fmt::Debug,
    A: Actions<V>,
    E: ParseEvents<V>,
{
    #[must_use]
    pub fn new(tables: &'t T, actions: A, events: E) -> Self {
        Self {
            tables,
            actions,
            events,
            config: ParserConfig::default(),
            stats: ParseStats::new(),
            _value: PhantomData,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Statistics of the last parse
    #[must_use]
    pub const fn stats(&self) -> &ParseStats {
        &self.stats
    }

    #[must_use]
    pub const fn events(&self) -> &E {
        &self.events
    }

    pub const fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    #[must_use]
    pub fn into_events(self) -> E {
        self.events
    }

    /// Parse everything `scanner` produces.
    ///
    /// Returns the value of the accepted start symbol, which is `None` if the
    /// reduction that produced it returned no value.
    ///
    /// # Errors
    ///
    /// [`ParseError::Unrecoverable`] when a syntax error cannot be repaired,
    /// [`ParseError::Scanner`] for scanner faults other than lexical ones.
    ///
    /// # Panics
    ///
    /// Panics if the tables are inconsistent: a reduction pops more symbols
    /// than the stack holds, or a goto neither shifts nor accepts.
    pub fn parse<S>(&mut self, scanner: S) -> Result<Option<V>, ParseError>
    where
        S: Scanner<Value = V>,
    {
        let stream = TokenStream::with_window(scanner, self.config.lookahead_window);
        self.run(stream)
    }

    /// Parse with `marker` injected as the first token.
    ///
    /// Grammars with several goals start each alternative with its own
    /// marker terminal; the marker is zero-width at the start of the input.
    ///
    /// # Errors
    ///
    /// Same as [`parse`](Self::parse).
    ///
    /// # Panics
    ///
    /// Same as [`parse`](Self::parse).
    pub fn parse_goal<S>(&mut self, scanner: S, marker: SymbolId) -> Result<Option<V>, ParseError>
    where
        S: Scanner<Value = V>,
    {
        let stream = TokenStream::with_window(scanner, self.config.lookahead_window)
            .with_leading(Symbol::empty(marker, Position::ZERO, Position::ZERO));
        self.run(stream)
    }

    fn run<S>(&mut self, stream: TokenStream<S>) -> Result<Option<V>, ParseError>
    where
        S: Scanner<Value = V>,
    {
        self.stats = ParseStats::new();
        let mut driver = Driver {
            tables: self.tables,
            actions: &mut self.actions,
            events: &mut self.events,
            config: &self.config,
            stats: &mut self.stats,
            stack: ParseStack::new(0),
            stream,
        };
        driver.run()
    }
}

impl<T: ?Sized, V, A, E: fmt::Debug> fmt::Debug for Parser<'_, T, V, A, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("events", &self.events)
            .field("config", &self.config)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

/// State of one parse: the automaton stack and the token stream, plus
/// borrowed parser parts.
struct Driver<'p, 't, T: ?Sized, A, E, S: Scanner> {
    tables: &'t T,
    actions: &'p mut A,
    events: &'p mut E,
    config: &'p ParserConfig,
    stats: &'p mut ParseStats,
    stack: ParseStack<S::Value>,
    stream: TokenStream<S>,
}

impl<T, A, E, S> Driver<'_, '_, T, A, E, S>
where
    T: ParseTables + ?Sized,
    S: Scanner,
    S::Value: fmt::Debug,
    A: Actions<S::Value>,
    E: ParseEvents<S::Value>,
{
    fn run(&mut self) -> Result<Option<S::Value>, ParseError> {
        let mut token = self.next_token()?;
        loop {
            let state = self.stack.top_state();
            match self.tables.action(state, token.id) {
                Action::Shift(next) => {
                    self.trace(ParseEvent::Shift {
                        state: next,
                        symbol: token.id,
                    });
                    self.stats.tokens_shifted += 1;
                    self.push(next, token);
                    token = self.next_token()?;
                }
                Action::Reduce(rule) => {
                    if let Some(value) = self.reduce(rule) {
                        self.trace(ParseEvent::Accept);
                        return Ok(value);
                    }
                }
                Action::Accept => {
                    self.trace(ParseEvent::Accept);
                    return Ok(self.stack.top_symbol_mut().value.take());
                }
                Action::Error => {
                    self.syntax_error(token)?;
                    token = self.next_token()?;
                }
            }
        }
    }

    fn next_token(&mut self) -> Result<Symbol<S::Value>, ParseError> {
        self.stream.next_token(&mut *self.events)
    }

    fn push(&mut self, state: StateId, symbol: Symbol<S::Value>) {
        self.stack.push(state, symbol);
        self.stats.max_depth = self.stats.max_depth.max(self.stack.depth());
    }

    /// Reduce by `rule`. Returns the produced value if the goto accepts.
    fn reduce(&mut self, rule: RuleId) -> Option<Option<S::Value>> {
        let info = self.tables.rule_info(rule);
        let rhs_len = info.rhs_len();
        let depth = self.stack.depth();
        assert!(
            rhs_len < depth,
            "rule {rule} pops {rhs_len} symbols from a stack of depth {depth}"
        );
        let base = depth - rhs_len;

        // an empty right-hand side sits at the end of the previous symbol
        let (start, end) = if rhs_len == 0 {
            let end = self.stack.symbol(base - 1).end;
            (end, end)
        } else {
            (self.stack.symbol(base).start, self.stack.top_symbol().end)
        };
        let args = RhsArgs::new(self.stack.symbols_from_mut(base), base - 1);
        let value = self.actions.reduce(rule, args);
        self.stack.truncate(base);
        self.stats.reductions += 1;
        self.trace(ParseEvent::Reduce {
            rule,
            lhs: info.lhs(),
            rhs_len,
        });

        let lhs = Symbol {
            id: info.lhs(),
            start,
            end,
            value,
        };
        let state = self.stack.top_state();
        match self.tables.goto(state, lhs.id) {
            Action::Shift(next) => {
                self.push(next, lhs);
                None
            }
            Action::Accept => Some(lhs.value),
            action => panic!("cannot shift nonterminal {} in state {state}: {action:?}", lhs.id),
        }
    }

    fn syntax_error(&mut self, token: Symbol<S::Value>) -> Result<(), ParseError> {
        self.stats.syntax_errors += 1;
        self.events.syntax_error(&token);
        if !self.config.error_recovery {
            return Err(ParseError::unrecoverable(
                Unrecoverable::RecoveryDisabled,
                token.start,
            ));
        }
        if self.stats.syntax_errors > self.config.max_errors {
            return Err(ParseError::unrecoverable(
                Unrecoverable::TooManyErrors,
                token.start,
            ));
        }
        self.recover(token)?;
        self.stats.errors_recovered += 1;
        Ok(())
    }

    fn trace(&mut self, event: ParseEvent) {
        if self.config.trace_events {
            self.events.trace(&event);
        }
    }
}
