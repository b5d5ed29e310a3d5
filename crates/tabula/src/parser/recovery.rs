//! Syntax error recovery.
//!
//! The offending token goes back to the head of the token stream, which
//! switches to buffering mode. Each strategy edits the buffered tokens (or,
//! for the error phrase, the stack) and asks a [`Simulator`] whether parsing
//! can go on from there. The first repair that simulates successfully is
//! committed by leaving buffering mode, so the main loop re-reads the edited
//! tokens.
//!
//! Insertion and replacement draw their candidates from the lookaheads of
//! the current state and are skipped for compressed tables. End of input is
//! never a candidate.

use super::{Driver, ParseEvent, RecoveryStrategy, Simulator};
use crate::actions::Actions;
use crate::error::diagnostics::ParseEvents;
use crate::error::{ParseError, Unrecoverable};
use crate::scanner::Scanner;
use crate::symbol::{EOF, Position, StateId, Symbol, SymbolId};
use crate::table::{Action, ParseTables};
use smallvec::SmallVec;
use std::fmt;

type Candidates = SmallVec<[SymbolId; 16]>;

impl<T, A, E, S> Driver<'_, '_, T, A, E, S>
where
    T: ParseTables + ?Sized,
    S: Scanner,
    S::Value: fmt::Debug,
    A: Actions<S::Value>,
    E: ParseEvents<S::Value>,
{
    /// Repair the error `token` caused in the current state.
    pub(super) fn recover(&mut self, token: Symbol<S::Value>) -> Result<(), ParseError> {
        if token.is_eof() {
            return Err(ParseError::unrecoverable(
                Unrecoverable::EndOfInput,
                token.start,
            ));
        }

        let state = self.stack.top_state();
        let mut simulator = Simulator::new(self.tables);
        self.stream.set_buffering(true);
        self.stream.insert(0, token);

        if !self.tables.is_compressed() {
            let candidates: Candidates = self
                .tables
                .lookaheads(state)
                .filter(|&terminal| terminal != EOF)
                .collect();
            if !candidates.is_empty()
                && (self.insert_missing(&mut simulator, state, &candidates)?
                    || self.replace_misspelled(&mut simulator, state, &candidates)?)
            {
                self.stream.set_buffering(false);
                return Ok(());
            }
        }

        if !self.delete_unexpected(&mut simulator, state)? {
            self.error_phrase(&mut simulator)?;
        }
        self.stream.set_buffering(false);
        Ok(())
    }

    /// Rewind and simulate from the current stack
    fn simulate(&mut self, simulator: &mut Simulator<'_, T>) -> Result<bool, ParseError> {
        self.stream.rewind();
        self.stats.simulations += 1;
        simulator.parse(self.stack.states(), &mut self.stream, &mut *self.events)
    }

    fn insert_missing(
        &mut self,
        simulator: &mut Simulator<'_, T>,
        state: StateId,
        candidates: &[SymbolId],
    ) -> Result<bool, ParseError> {
        let at = self.stack.top_symbol().end;
        self.stream.insert(0, Symbol::empty(candidates[0], at, at));

        for &candidate in candidates {
            if let Some(synthetic) = self.stream.peek_mut(0) {
                synthetic.id = candidate;
            }
            if self.simulate(simulator)? {
                self.recovered(simulator, RecoveryStrategy::InsertMissing, state, 0);
                if let Some(synthetic) = self.stream.peek(0) {
                    self.events.missing_token_inserted(synthetic);
                }
                return Ok(true);
            }
        }

        self.stream.remove(0);
        self.failed(RecoveryStrategy::InsertMissing, state);
        Ok(false)
    }

    fn replace_misspelled(
        &mut self,
        simulator: &mut Simulator<'_, T>,
        state: StateId,
        candidates: &[SymbolId],
    ) -> Result<bool, ParseError> {
        let Some(original) = self.stream.peek(0).map(|token| token.id) else {
            return Ok(false);
        };

        for &candidate in candidates.iter().filter(|&&id| id != original) {
            if let Some(token) = self.stream.peek_mut(0) {
                token.id = candidate;
            }
            if self.simulate(simulator)? {
                self.recovered(simulator, RecoveryStrategy::ReplaceMisspelled, state, 0);
                if let Some(token) = self.stream.peek(0) {
                    self.events.misspelled_token_replaced(token);
                }
                return Ok(true);
            }
        }

        if let Some(token) = self.stream.peek_mut(0) {
            token.id = original;
        }
        self.failed(RecoveryStrategy::ReplaceMisspelled, state);
        Ok(false)
    }

    fn delete_unexpected(
        &mut self,
        simulator: &mut Simulator<'_, T>,
        state: StateId,
    ) -> Result<bool, ParseError> {
        self.stream.rewind();
        let token = self.stream.remove(0);
        if self.simulate(simulator)? {
            self.recovered(simulator, RecoveryStrategy::DeleteUnexpected, state, 0);
            self.events.unexpected_token_removed(&token);
            return Ok(true);
        }

        self.stream.insert(0, token);
        self.failed(RecoveryStrategy::DeleteUnexpected, state);
        Ok(false)
    }

    /// Unwind to a state that shifts the error symbol, shift it, then widen
    /// the phrase it stands for to the right until the parse can go on.
    fn error_phrase(&mut self, simulator: &mut Simulator<'_, T>) -> Result<(), ParseError> {
        let state = self.stack.top_state();
        let head = self
            .stream
            .peek(0)
            .map_or(self.stack.top_symbol().end, |token| token.start);
        let Some(error) = self.tables.error_symbol() else {
            self.failed(RecoveryStrategy::ErrorPhrase, state);
            return Err(ParseError::unrecoverable(Unrecoverable::NoErrorState, head));
        };

        let mut start: Option<Position> = None;
        let mut end: Option<Position> = None;
        let mut unwound = 0;
        let target = loop {
            if let Action::Shift(target) = self.tables.goto(self.stack.top_state(), error) {
                break target;
            }
            if self.stack.depth() == 1 {
                self.trace(ParseEvent::Recovery {
                    strategy: RecoveryStrategy::ErrorPhrase,
                    state,
                    succeeded: false,
                    unwound,
                    reduced: 0,
                });
                return Err(ParseError::unrecoverable(Unrecoverable::NoErrorState, head));
            }
            if let Some((_, symbol)) = self.stack.pop() {
                start = Some(symbol.start);
                end.get_or_insert(symbol.end);
                unwound += 1;
            }
        };

        let phrase = Symbol::empty(error, start.unwrap_or(head), end.unwrap_or(head));
        self.push(target, phrase);

        while !self.simulate(simulator)? {
            let discarded = self.stream.remove(0);
            if discarded.is_eof() {
                self.trace(ParseEvent::Recovery {
                    strategy: RecoveryStrategy::ErrorPhrase,
                    state,
                    succeeded: false,
                    unwound,
                    reduced: 0,
                });
                return Err(ParseError::unrecoverable(
                    Unrecoverable::InputExhausted,
                    discarded.start,
                ));
            }
            self.stack.top_symbol_mut().end = discarded.end;
        }

        self.recovered(simulator, RecoveryStrategy::ErrorPhrase, state, unwound);
        self.events.error_phrase_removed(self.stack.top_symbol());
        Ok(())
    }

    fn recovered(
        &mut self,
        simulator: &Simulator<'_, T>,
        strategy: RecoveryStrategy,
        state: StateId,
        unwound: usize,
    ) {
        let reduced = self.stack.states().len().saturating_sub(simulator.lowest_depth());
        self.trace(ParseEvent::Recovery {
            strategy,
            state,
            succeeded: true,
            unwound,
            reduced,
        });
    }

    fn failed(&mut self, strategy: RecoveryStrategy, state: StateId) {
        self.trace(ParseEvent::Recovery {
            strategy,
            state,
            succeeded: false,
            unwound: 0,
            reduced: 0,
        });
    }
}
