//! # Token Stream
//!
//! A reader over a [`Scanner`] that can buffer and replay tokens.
//!
//! ## Modes
//!
//! - **Pass-through**: [`next_token`](TokenStream::next_token) hands out
//!   buffered tokens first and then reads the scanner directly.
//! - **Buffering**: the head of the buffer becomes the mark.
//!   [`next_buffered`](TokenStream::next_buffered) replays buffered tokens and
//!   buffers every token it has to read from the scanner, so
//!   [`rewind`](TokenStream::rewind) can deliver the same sequence again.
//!
//! Leaving buffering mode rewinds, so everything buffered reaches the real
//! parser. While buffering, recovery edits the next two tokens with
//! [`insert`](TokenStream::insert) and [`remove`](TokenStream::remove).
//!
//! ## Lookahead Window
//!
//! [`is_full`](TokenStream::is_full) reports when a speculative parse has
//! read `window` tokens past the mark. The ring capacity derives from the
//! window and leaves room for the token put back by recovery and one
//! synthetic token.

mod ring;

pub use ring::RingBuffer;

use crate::error::diagnostics::ParseEvents;
use crate::error::{ParseError, ScanError};
use crate::scanner::Scanner;
use crate::symbol::Symbol;
use std::fmt;

/// Tokens a speculative parse must consume before it counts as a success
pub const DEFAULT_LOOKAHEAD_WINDOW: usize = 3;

/// Buffered, rewindable token source.
pub struct TokenStream<S: Scanner> {
    scanner: S,
    buffer: RingBuffer<Symbol<S::Value>>,
    /// Tokens delivered since the mark
    read: usize,
    buffering: bool,
    window: usize,
}

impl<S: Scanner> TokenStream<S> {
    #[must_use]
    pub fn new(scanner: S) -> Self {
        Self::with_window(scanner, DEFAULT_LOOKAHEAD_WINDOW)
    }

    /// A window of zero is treated as one.
    #[must_use]
    pub fn with_window(scanner: S, window: usize) -> Self {
        let window = window.max(1);
        Self {
            scanner,
            buffer: RingBuffer::new((window + 4).next_power_of_two()),
            read: 0,
            buffering: false,
            window,
        }
    }

    /// Queue `marker` ahead of everything the scanner produces
    #[must_use]
    pub fn with_leading(mut self, marker: Symbol<S::Value>) -> Self {
        self.buffer.push_back(marker);
        self
    }

    #[must_use]
    pub const fn window(&self) -> usize {
        self.window
    }

    #[must_use]
    pub const fn is_buffering(&self) -> bool {
        self.buffering
    }

    /// Number of tokens held in the buffer
    #[must_use]
    pub const fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Tokens delivered since the mark
    #[must_use]
    pub const fn read(&self) -> usize {
        self.read
    }

    /// Switch modes. Either way the read cursor returns to the mark, so after
    /// leaving buffering mode every buffered token is delivered again.
    pub fn set_buffering(&mut self, buffering: bool) {
        self.buffering = buffering;
        self.read = 0;
    }

    /// Replay from the mark.
    ///
    /// # Panics
    ///
    /// Panics if the stream is not buffering.
    pub fn rewind(&mut self) {
        assert!(self.buffering, "rewind outside buffering mode");
        self.read = 0;
    }

    /// Whether the lookahead window past the mark has been consumed
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.buffering && self.read >= self.window
    }

    /// Buffer `token` so it becomes the token at `offset` (0 or 1) past the
    /// mark.
    ///
    /// # Panics
    ///
    /// Panics for any other offset, if the buffer overflows, or if offset 1
    /// is requested with nothing buffered.
    pub fn insert(&mut self, offset: usize, token: Symbol<S::Value>) {
        match offset {
            0 => self.buffer.push_front(token),
            1 => {
                let first = self.buffer.pop_front();
                self.buffer.push_front(token);
                self.buffer.push_front(first);
            }
            _ => panic!("tokens can only be inserted at offset 0 or 1, not {offset}"),
        }
        if self.read > offset {
            self.read += 1;
        }
    }

    /// Take the token at `offset` (0 or 1) out of the buffer. Removing at 0
    /// advances the mark; removing at 1 keeps the head.
    ///
    /// # Panics
    ///
    /// Panics for any other offset or if the buffer holds too few tokens.
    pub fn remove(&mut self, offset: usize) -> Symbol<S::Value> {
        let removed = match offset {
            0 => self.buffer.pop_front(),
            1 => {
                let first = self.buffer.pop_front();
                let second = self.buffer.pop_front();
                self.buffer.push_front(first);
                second
            }
            _ => panic!("tokens can only be removed at offset 0 or 1, not {offset}"),
        };
        if self.read > offset {
            self.read -= 1;
        }
        removed
    }

    /// The buffered token `offset` places past the mark
    #[must_use]
    pub fn peek(&self, offset: usize) -> Option<&Symbol<S::Value>> {
        self.buffer.get(offset)
    }

    pub fn peek_mut(&mut self, offset: usize) -> Option<&mut Symbol<S::Value>> {
        self.buffer.get_mut(offset)
    }

    #[must_use]
    pub fn into_scanner(self) -> S {
        self.scanner
    }
}

impl<S: Scanner> TokenStream<S>
where
    S::Value: fmt::Debug,
{
    /// Next token in pass-through mode: buffered tokens first, then the
    /// scanner.
    ///
    /// # Errors
    ///
    /// Propagates scanner faults other than lexical ones.
    pub fn next_token<E>(&mut self, events: &mut E) -> Result<Symbol<S::Value>, ParseError>
    where
        E: ParseEvents<S::Value> + ?Sized,
    {
        debug_assert!(!self.buffering, "pass-through read while buffering");
        if self.buffer.is_empty() {
            self.scan(events)
        } else {
            Ok(self.buffer.pop_front())
        }
    }

    /// Next token in buffering mode: replay the buffer, then read and buffer
    /// from the scanner.
    ///
    /// # Errors
    ///
    /// Propagates scanner faults other than lexical ones.
    ///
    /// # Panics
    ///
    /// Panics if the stream is not buffering or the buffer overflows.
    pub fn next_buffered<E>(&mut self, events: &mut E) -> Result<&Symbol<S::Value>, ParseError>
    where
        E: ParseEvents<S::Value> + ?Sized,
    {
        assert!(self.buffering, "buffered read in pass-through mode");
        if self.read == self.buffer.len() {
            let token = self.scan(events)?;
            self.buffer.push_back(token);
        }
        let index = self.read;
        self.read += 1;
        Ok(&self.buffer[index])
    }

    fn scan<E>(&mut self, events: &mut E) -> Result<Symbol<S::Value>, ParseError>
    where
        E: ParseEvents<S::Value> + ?Sized,
    {
        loop {
            match self.scanner.next_token() {
                Ok(token) => return Ok(token),
                Err(ScanError::Lexical(error)) => events.lexical_error(&error),
                Err(error) => return Err(error.into()),
            }
        }
    }
}

impl<S: Scanner> fmt::Debug for TokenStream<S>
where
    S::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStream")
            .field("buffer", &self.buffer.iter().collect::<Vec<_>>())
            .field("read", &self.read)
            .field("buffering", &self.buffering)
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::diagnostics::{NullEvents, WriterEvents};
    use crate::scanner::VecScanner;
    use crate::symbol::{EOF, Position};

    fn tok(id: u16, column: u32) -> Symbol<u32> {
        Symbol::new(
            id,
            Position::new(0, column),
            Position::new(0, column + 1),
            column,
        )
    }

    fn stream(ids: &[u16]) -> TokenStream<VecScanner<u32>> {
        let tokens = ids.iter().zip(0..).map(|(&id, column)| tok(id, column));
        TokenStream::new(tokens.collect())
    }

    fn ids_until_eof(stream: &mut TokenStream<VecScanner<u32>>) -> Vec<u16> {
        let mut ids = Vec::new();
        loop {
            let token = stream.next_token(&mut NullEvents).unwrap();
            if token.is_eof() {
                return ids;
            }
            ids.push(token.id);
        }
    }

    #[test]
    fn test_pass_through_reads_scanner() {
        let mut stream = stream(&[1, 2, 3]);
        assert_eq!(ids_until_eof(&mut stream), vec![1, 2, 3]);
        assert_eq!(stream.buffered(), 0);
    }

    #[test]
    fn test_rewind_replays_same_tokens() {
        let mut stream = stream(&[4, 5, 6, 7]);
        stream.set_buffering(true);
        let first: Vec<u16> = (0..3)
            .map(|_| stream.next_buffered(&mut NullEvents).unwrap().id)
            .collect();
        stream.rewind();
        let second: Vec<u16> = (0..3)
            .map(|_| stream.next_buffered(&mut NullEvents).unwrap().id)
            .collect();
        assert_eq!(first, vec![4, 5, 6]);
        assert_eq!(first, second);
        assert_eq!(stream.buffered(), 3);
    }

    #[test]
    fn test_leaving_buffering_redelivers() {
        let mut stream = stream(&[1, 2, 3]);
        stream.set_buffering(true);
        stream.next_buffered(&mut NullEvents).unwrap();
        stream.next_buffered(&mut NullEvents).unwrap();
        stream.set_buffering(false);
        assert_eq!(ids_until_eof(&mut stream), vec![1, 2, 3]);
    }

    #[test]
    fn test_window_fills() {
        let mut stream = stream(&[1, 2, 3, 4]);
        assert!(!stream.is_full());
        stream.set_buffering(true);
        for _ in 0..DEFAULT_LOOKAHEAD_WINDOW {
            assert!(!stream.is_full());
            stream.next_buffered(&mut NullEvents).unwrap();
        }
        assert!(stream.is_full());
        stream.rewind();
        assert!(!stream.is_full());
    }

    #[test]
    fn test_remove_head_advances_mark() {
        let mut stream = stream(&[1, 2, 3]);
        stream.set_buffering(true);
        stream.next_buffered(&mut NullEvents).unwrap();
        stream.next_buffered(&mut NullEvents).unwrap();
        stream.rewind();

        assert_eq!(stream.remove(0).id, 1);
        assert_eq!(stream.next_buffered(&mut NullEvents).unwrap().id, 2);
        assert_eq!(stream.next_buffered(&mut NullEvents).unwrap().id, 3);
    }

    #[test]
    fn test_remove_second_keeps_head() {
        let mut stream = stream(&[1, 2, 3]);
        stream.set_buffering(true);
        stream.next_buffered(&mut NullEvents).unwrap();
        stream.next_buffered(&mut NullEvents).unwrap();
        stream.rewind();

        assert_eq!(stream.remove(1).id, 2);
        assert_eq!(stream.peek(0).map(|t| t.id), Some(1));
        stream.set_buffering(false);
        assert_eq!(ids_until_eof(&mut stream), vec![1, 3]);
    }

    #[test]
    fn test_insert_at_both_offsets() {
        let mut stream = stream(&[1, 2]);
        stream.set_buffering(true);
        stream.next_buffered(&mut NullEvents).unwrap();
        stream.rewind();

        stream.insert(0, tok(8, 40));
        stream.insert(1, tok(9, 41));
        stream.set_buffering(false);
        assert_eq!(ids_until_eof(&mut stream), vec![8, 9, 1, 2]);
    }

    #[test]
    fn test_edits_keep_read_cursor_on_same_token() {
        let mut stream = stream(&[1, 2, 3]);
        stream.set_buffering(true);
        stream.next_buffered(&mut NullEvents).unwrap();
        assert_eq!(stream.read(), 1);

        stream.insert(0, tok(7, 9));
        assert_eq!(stream.read(), 2);
        assert_eq!(stream.next_buffered(&mut NullEvents).unwrap().id, 2);

        stream.remove(0);
        assert_eq!(stream.read(), 2);
        assert_eq!(stream.next_buffered(&mut NullEvents).unwrap().id, 3);
    }

    #[test]
    fn test_peek_mut_edits_in_place() {
        let mut stream = stream(&[1, 2]);
        stream.set_buffering(true);
        stream.next_buffered(&mut NullEvents).unwrap();
        stream.rewind();
        stream.peek_mut(0).unwrap().id = 6;
        assert_eq!(stream.next_buffered(&mut NullEvents).unwrap().id, 6);
        assert!(stream.peek(1).is_none());
    }

    #[test]
    fn test_leading_marker_comes_first() {
        let marker = Symbol::empty(5, Position::ZERO, Position::ZERO);
        let mut stream = stream(&[1]).with_leading(marker);
        assert_eq!(ids_until_eof(&mut stream), vec![5, 1]);
    }

    #[test]
    fn test_lexical_errors_are_reported_and_skipped() {
        let scanner = VecScanner::from_results(vec![
            Err(ScanError::lexical(Position::new(0, 2), "stray '#'")),
            Ok(tok(1, 3)),
        ]);
        let mut stream = TokenStream::new(scanner);
        let mut events = WriterEvents::new(Vec::new());
        assert_eq!(stream.next_token(&mut events).unwrap().id, 1);
        assert_eq!(stream.next_token(&mut events).unwrap().id, EOF);
        let text = String::from_utf8(events.into_inner()).unwrap();
        assert_eq!(text, "1:3: Lexical Error: stray '#'\n");
    }

    #[test]
    fn test_other_scanner_faults_propagate() {
        let io = std::io::Error::other("disk gone");
        let scanner: VecScanner<u32> = VecScanner::from_results(vec![Err(io.into())]);
        let mut stream = TokenStream::new(scanner);
        let error = stream.next_token(&mut NullEvents).unwrap_err();
        assert!(matches!(error, ParseError::Scanner(ScanError::Io(_))));
    }

    #[test]
    #[should_panic(expected = "offset 0 or 1")]
    fn test_remove_at_offset_two_panics() {
        let mut stream = stream(&[1, 2, 3]);
        stream.set_buffering(true);
        stream.remove(2);
    }

    #[test]
    #[should_panic(expected = "offset 0 or 1")]
    fn test_insert_at_offset_two_panics() {
        let mut stream = stream(&[1]);
        stream.set_buffering(true);
        stream.insert(2, tok(3, 0));
    }

    #[test]
    #[should_panic(expected = "rewind outside buffering mode")]
    fn test_rewind_requires_buffering() {
        let mut stream = stream(&[1]);
        stream.rewind();
    }
}
