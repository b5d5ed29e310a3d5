//! # Scanner Boundary
//!
//! The parser pulls terminals one at a time from a [`Scanner`]. Scanners are
//! expected to deliver [`EOF`](crate::EOF) at the end of the input and to keep
//! delivering it when asked again.

use crate::error::ScanError;
use crate::symbol::{Position, Symbol};
use std::collections::VecDeque;

/// Source of terminal symbols.
pub trait Scanner {
    type Value;

    /// Produce the next terminal.
    ///
    /// # Errors
    ///
    /// [`ScanError::Lexical`] is reported by the parser and followed by
    /// another call; any other error aborts the parse.
    fn next_token(&mut self) -> Result<Symbol<Self::Value>, ScanError>;
}

impl<S: Scanner + ?Sized> Scanner for &mut S {
    type Value = S::Value;

    fn next_token(&mut self) -> Result<Symbol<S::Value>, ScanError> {
        (**self).next_token()
    }
}

/// A scanner backed by pre-scanned tokens
///
/// Once the tokens run out it yields [`EOF`](crate::EOF) positioned at the end
/// of the last token, forever.
#[derive(Debug)]
pub struct VecScanner<V> {
    items: VecDeque<Result<Symbol<V>, ScanError>>,
    end: Position,
}

impl<V> VecScanner<V> {
    #[must_use]
    pub fn new(tokens: Vec<Symbol<V>>) -> Self {
        Self::from_results(tokens.into_iter().map(Ok).collect())
    }

    /// Tokens interleaved with scanner faults, delivered in order
    #[must_use]
    pub fn from_results(items: Vec<Result<Symbol<V>, ScanError>>) -> Self {
        Self {
            items: items.into(),
            end: Position::ZERO,
        }
    }

    /// Number of items not yet delivered
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.items.len()
    }
}

impl<V> Scanner for VecScanner<V> {
    type Value = V;

    fn next_token(&mut self) -> Result<Symbol<V>, ScanError> {
        match self.items.pop_front() {
            Some(Ok(token)) => {
                self.end = token.end;
                Ok(token)
            }
            Some(Err(error)) => Err(error),
            None => Ok(Symbol::eof(self.end)),
        }
    }
}

impl<V> FromIterator<Symbol<V>> for VecScanner<V> {
    fn from_iter<I: IntoIterator<Item = Symbol<V>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::EOF;

    #[test]
    fn test_vec_scanner_repeats_eof() {
        let mut scanner = VecScanner::new(vec![Symbol::new(
            1,
            Position::new(0, 0),
            Position::new(0, 3),
            "abc",
        )]);
        assert_eq!(scanner.next_token().unwrap().value, Some("abc"));

        for _ in 0..3 {
            let eof = scanner.next_token().unwrap();
            assert_eq!(eof.id, EOF);
            assert_eq!(eof.start, Position::new(0, 3));
        }
        assert_eq!(scanner.remaining(), 0);
    }

    #[test]
    fn test_vec_scanner_delivers_faults_in_order() {
        let mut scanner: VecScanner<()> = VecScanner::from_results(vec![
            Err(ScanError::lexical(Position::ZERO, "bad")),
            Ok(Symbol::empty(2, Position::ZERO, Position::new(0, 1))),
        ]);
        assert!(matches!(scanner.next_token(), Err(ScanError::Lexical(_))));
        assert_eq!(scanner.next_token().unwrap().id, 2);
        assert!(scanner.next_token().unwrap().is_eof());
    }
}
