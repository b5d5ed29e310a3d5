//! # Diagnostic Events
//!
//! Every syntax error and every repair the parser makes is announced through
//! [`ParseEvents`]. Each notification has a default rendering of the form
//!
//! ```text
//! 3:14-3:15: Syntax Error: unexpected token ";"
//! ```
//!
//! with 1-based line/column ranges, followed by the token's value or, for
//! valueless tokens, its numeric id. The rendered line goes to
//! [`ParseEvents::report`], which writes to stderr unless overridden.
//!
//! The sink is owned by the parser that uses it, so independent parses never
//! share diagnostic state.

use crate::error::LexicalError;
use crate::parser::ParseEvent;
use crate::symbol::Symbol;
use std::fmt;
use std::io::{self, Write};

/// Receiver of parse diagnostics.
///
/// Override any subset of the notifications; the rest keep the default
/// rendering.
pub trait ParseEvents<V: fmt::Debug> {
    /// Sink for rendered diagnostics
    fn report(&mut self, message: fmt::Arguments<'_>) {
        eprintln!("{message}");
    }

    /// The scanner reported a lexical fault; scanning continues.
    fn lexical_error(&mut self, error: &LexicalError) {
        self.report(format_args!(
            "{}: Lexical Error: {}",
            error.position, error.message
        ));
    }

    /// `token` cannot be shifted in the current state.
    fn syntax_error(&mut self, token: &Symbol<V>) {
        self.report(format_args!(
            "{}: Syntax Error: unexpected token {}",
            token.span(),
            token.describe()
        ));
    }

    /// Recovery dropped `token` from the input.
    fn unexpected_token_removed(&mut self, token: &Symbol<V>) {
        self.report(format_args!(
            "{}: Recovered: unexpected token {} was removed",
            token.span(),
            token.describe()
        ));
    }

    /// Recovery inserted the synthetic `token`.
    fn missing_token_inserted(&mut self, token: &Symbol<V>) {
        self.report(format_args!(
            "{}: Recovered: missing token {} was inserted",
            token.span(),
            token.describe()
        ));
    }

    /// Recovery changed the id of `token`, keeping its span and value.
    fn misspelled_token_replaced(&mut self, token: &Symbol<V>) {
        self.report(format_args!(
            "{}: Recovered: misspelled token {} was replaced with #{}",
            token.span(),
            token.describe(),
            token.id
        ));
    }

    /// Recovery replaced the phrase spanned by `error` with the error symbol.
    fn error_phrase_removed(&mut self, error: &Symbol<V>) {
        self.report(format_args!(
            "{}: Recovered: error phrase was removed",
            error.span()
        ));
    }

    /// Structured trace of parser activity, delivered only when
    /// [`ParserConfig::trace_events`](crate::ParserConfig::trace_events) is set.
    fn trace(&mut self, _event: &ParseEvent) {}
}

/// Default sink: renders every diagnostic to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrEvents;

impl<V: fmt::Debug> ParseEvents<V> for StderrEvents {}

/// Discards every diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEvents;

impl<V: fmt::Debug> ParseEvents<V> for NullEvents {
    fn report(&mut self, _message: fmt::Arguments<'_>) {}
}

/// Renders diagnostics line by line into any [`Write`] implementation.
///
/// A failed write does not interrupt the parse. The first failure is kept,
/// nothing more is written after it, and [`error`](Self::error) or
/// [`finish`](Self::finish) hand it back.
#[derive(Debug, Default)]
pub struct WriterEvents<W> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> WriterEvents<W> {
    #[must_use]
    pub const fn new(out: W) -> Self {
        Self { out, error: None }
    }

    /// First write failure, if any
    #[must_use]
    pub const fn error(&self) -> Option<&io::Error> {
        self.error.as_ref()
    }

    /// Flush and return the writer.
    ///
    /// # Errors
    ///
    /// Returns the first write failure, or the flush failure.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    #[must_use]
    pub const fn get_ref(&self) -> &W {
        &self.out
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<V: fmt::Debug, W: Write> ParseEvents<V> for WriterEvents<W> {
    fn report(&mut self, message: fmt::Arguments<'_>) {
        if self.error.is_none()
            && let Err(error) = writeln!(self.out, "{message}")
        {
            self.error = Some(error);
        }
    }
}

impl<V: fmt::Debug, E: ParseEvents<V> + ?Sized> ParseEvents<V> for &mut E {
    fn report(&mut self, message: fmt::Arguments<'_>) {
        (**self).report(message);
    }

    fn lexical_error(&mut self, error: &LexicalError) {
        (**self).lexical_error(error);
    }

    fn syntax_error(&mut self, token: &Symbol<V>) {
        (**self).syntax_error(token);
    }

    fn unexpected_token_removed(&mut self, token: &Symbol<V>) {
        (**self).unexpected_token_removed(token);
    }

    fn missing_token_inserted(&mut self, token: &Symbol<V>) {
        (**self).missing_token_inserted(token);
    }

    fn misspelled_token_replaced(&mut self, token: &Symbol<V>) {
        (**self).misspelled_token_replaced(token);
    }

    fn error_phrase_removed(&mut self, error: &Symbol<V>) {
        (**self).error_phrase_removed(error);
    }

    fn trace(&mut self, event: &ParseEvent) {
        (**self).trace(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::Position;

    fn rendered(emit: impl FnOnce(&mut WriterEvents<Vec<u8>>)) -> String {
        let mut events = WriterEvents::new(Vec::new());
        emit(&mut events);
        String::from_utf8(events.into_inner()).unwrap()
    }

    #[test]
    fn test_syntax_error_rendering() {
        let token = Symbol::new(4, Position::new(2, 13), Position::new(2, 14), ";");
        let text = rendered(|events| events.syntax_error(&token));
        assert_eq!(text, "3:14-3:15: Syntax Error: unexpected token \";\"\n");
    }

    #[test]
    fn test_valueless_token_renders_id() {
        let token: Symbol<i64> = Symbol::empty(7, Position::new(0, 4), Position::new(0, 4));
        let text = rendered(|events| events.missing_token_inserted(&token));
        assert_eq!(text, "1:5-1:5: Recovered: missing token #7 was inserted\n");
    }

    #[test]
    fn test_lexical_error_rendering() {
        let error = LexicalError::new(Position::new(9, 0), "unterminated string");
        let text = rendered(|events| ParseEvents::<()>::lexical_error(events, &error));
        assert_eq!(text, "10:1: Lexical Error: unterminated string\n");
    }

    #[test]
    fn test_writer_keeps_first_failure() {
        #[derive(Debug)]
        struct Full {
            writes: usize,
        }

        impl Write for Full {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                self.writes += 1;
                Err(io::Error::new(io::ErrorKind::StorageFull, "disk full"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let token = Symbol::new(1, Position::ZERO, Position::new(0, 1), 5);
        let mut events = WriterEvents::new(Full { writes: 0 });
        events.syntax_error(&token);
        events.unexpected_token_removed(&token);

        assert_eq!(events.error().map(io::Error::kind), Some(io::ErrorKind::StorageFull));
        assert_eq!(events.get_ref().writes, 1);
        let error = events.finish().unwrap_err();
        assert_eq!(error.to_string(), "disk full");
    }

    #[test]
    fn test_writer_finish_returns_output() {
        let token: Symbol<i64> = Symbol::empty(2, Position::ZERO, Position::ZERO);
        let mut events = WriterEvents::new(Vec::new());
        events.missing_token_inserted(&token);
        assert!(events.error().is_none());
        let out = events.finish().unwrap();
        assert_eq!(out, b"1:1-1:1: Recovered: missing token #2 was inserted\n");
    }

    #[test]
    fn test_overridden_notification_keeps_other_defaults() {
        struct CountRemovals {
            removed: usize,
            lines: Vec<String>,
        }

        impl ParseEvents<i32> for CountRemovals {
            fn report(&mut self, message: fmt::Arguments<'_>) {
                self.lines.push(message.to_string());
            }

            fn unexpected_token_removed(&mut self, _token: &Symbol<i32>) {
                self.removed += 1;
            }
        }

        let mut events = CountRemovals {
            removed: 0,
            lines: Vec::new(),
        };
        let token = Symbol::new(1, Position::ZERO, Position::new(0, 1), 5);
        events.unexpected_token_removed(&token);
        events.error_phrase_removed(&token);

        assert_eq!(events.removed, 1);
        assert_eq!(events.lines, vec!["1:1-1:2: Recovered: error phrase was removed"]);
    }
}
