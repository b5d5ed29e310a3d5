//! Forward parse over a copy of the state stack, without semantic actions.
//!
//! Recovery asks the simulator whether the edited token stream can be parsed
//! for a few tokens from the current configuration. Reductions only pop
//! states and follow the goto; symbols and values are never touched, and the
//! real stack is only read.

use crate::error::ParseError;
use crate::error::diagnostics::ParseEvents;
use crate::scanner::Scanner;
use crate::stack::Stack;
use crate::stream::TokenStream;
use crate::symbol::{RuleId, StateId};
use crate::table::{Action, ParseTables};
use std::fmt;

pub struct Simulator<'t, T: ?Sized> {
    tables: &'t T,
    states: Stack<StateId>,
    lowest_depth: usize,
}

impl<'t, T: ParseTables + ?Sized> Simulator<'t, T> {
    #[must_use]
    pub fn new(tables: &'t T) -> Self {
        Self {
            tables,
            states: Stack::new(),
            lowest_depth: 0,
        }
    }

    /// Run from `base` over the buffered stream.
    ///
    /// Succeeds on accept, or once the stream's lookahead window is used up
    /// after a shift. Fails on the first error action.
    ///
    /// # Errors
    ///
    /// Propagates scanner faults hit while buffering tokens.
    pub fn parse<S, E>(
        &mut self,
        base: &[StateId],
        stream: &mut TokenStream<S>,
        events: &mut E,
    ) -> Result<bool, ParseError>
    where
        S: Scanner,
        S::Value: fmt::Debug,
        E: ParseEvents<S::Value> + ?Sized,
    {
        self.states.copy_from(base);
        self.lowest_depth = self.states.len();

        loop {
            let terminal = stream.next_buffered(events)?.id;
            loop {
                let Some(&state) = self.states.top() else {
                    return Ok(false);
                };
                match self.tables.action(state, terminal) {
                    Action::Shift(next) => {
                        self.states.push(next);
                        break;
                    }
                    Action::Reduce(rule) => match self.reduce(rule) {
                        Action::Shift(next) => self.states.push(next),
                        Action::Accept => return Ok(true),
                        Action::Reduce(_) | Action::Error => return Ok(false),
                    },
                    Action::Accept => return Ok(true),
                    Action::Error => return Ok(false),
                }
            }
            if stream.is_full() {
                return Ok(true);
            }
        }
    }

    /// Pop the rule's right-hand side and look up the goto on its lhs
    fn reduce(&mut self, rule: RuleId) -> Action {
        let info = self.tables.rule_info(rule);
        let Some(depth) = self
            .states
            .len()
            .checked_sub(info.rhs_len())
            .filter(|&depth| depth > 0)
        else {
            return Action::Error;
        };
        self.states.truncate(depth);
        self.lowest_depth = self.lowest_depth.min(depth);
        match self.states.top() {
            Some(&state) => self.tables.goto(state, info.lhs()),
            None => Action::Error,
        }
    }

    /// Smallest stack depth reached during the last run. Entries of the base
    /// stack below this depth were reduced away by the simulation.
    #[must_use]
    pub const fn lowest_depth(&self) -> usize {
        self.lowest_depth
    }

    /// States left on the simulated stack by the last run
    #[must_use]
    pub fn states(&self) -> &[StateId] {
        self.states.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::diagnostics::NullEvents;
    use crate::scanner::VecScanner;
    use crate::symbol::{EOF, Position, Symbol};
    use crate::table::{PackedTables, TableBuilder};

    // expr := NUM '+' NUM
    // 0 EOF, 1 NUM, 2 PLUS | 3 expr
    fn tables() -> PackedTables {
        TableBuilder::new(3, 4)
            .rule(3, 3)
            .shift(0, 1, 1)
            .shift(1, 2, 2)
            .shift(2, 1, 3)
            .reduce(3, EOF, 0)
            .goto(0, 3, 4)
            .accept(4, EOF)
            .build()
            .unwrap()
    }

    fn buffered(ids: &[u16]) -> TokenStream<VecScanner<()>> {
        let tokens = ids
            .iter()
            .map(|&id| Symbol::empty(id, Position::ZERO, Position::ZERO));
        let mut stream = TokenStream::new(tokens.collect());
        stream.set_buffering(true);
        stream
    }

    #[test]
    fn test_accepts_complete_input() {
        let tables = tables();
        let mut simulator = Simulator::new(&tables);
        let mut stream = buffered(&[1, 2, 1]);
        // window of three is used up by the last NUM before EOF is seen
        assert!(simulator.parse(&[0], &mut stream, &mut NullEvents).unwrap());
        assert_eq!(simulator.states(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_accept_within_window() {
        let tables = tables();
        let mut simulator = Simulator::new(&tables);
        let mut stream = buffered(&[1]);
        assert!(simulator.parse(&[0, 1, 2], &mut stream, &mut NullEvents).unwrap());
        assert_eq!(simulator.lowest_depth(), 1);
    }

    #[test]
    fn test_fails_on_error_action() {
        let tables = tables();
        let mut simulator = Simulator::new(&tables);
        let mut stream = buffered(&[1, 1]);
        assert!(!simulator.parse(&[0], &mut stream, &mut NullEvents).unwrap());
    }

    #[test]
    fn test_leaves_base_untouched_and_is_repeatable() {
        let tables = tables();
        let base = [0, 1];
        let mut simulator = Simulator::new(&tables);
        let mut stream = buffered(&[2, 1]);

        let first = simulator.parse(&base, &mut stream, &mut NullEvents).unwrap();
        stream.rewind();
        let second = simulator.parse(&base, &mut stream, &mut NullEvents).unwrap();

        assert!(first);
        assert_eq!(first, second);
        assert_eq!(base, [0, 1]);
    }
}
