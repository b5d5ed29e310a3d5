//! Property-based tests for the token stream and the parser
//!
//! These tests use proptest to generate random token sequences and check
//! that buffering, replay and recovery behave consistently.

#![cfg(test)]

mod common;

use common::{count_stmts, stmts, stmts_tables};
use proptest::prelude::*;
use std::collections::VecDeque;
use tabula::stream::RingBuffer;
use tabula::testing::{RecordingEvents, scanner, tokens};
use tabula::{NullEvents, Parser, SymbolId, TokenStream, VecScanner};

#[derive(Debug, Clone)]
enum RingOp {
    PushBack(u8),
    PushFront(u8),
    PopFront,
}

fn ring_op() -> impl Strategy<Value = RingOp> {
    prop_oneof![
        any::<u8>().prop_map(RingOp::PushBack),
        any::<u8>().prop_map(RingOp::PushFront),
        Just(RingOp::PopFront),
    ]
}

fn id_scanner(ids: &[SymbolId]) -> VecScanner<u32> {
    scanner(ids.iter().map(|&id| (id, u32::from(id))))
}

/// `depth` nested parentheses around a number, then a semicolon
fn statement(depth: usize) -> Vec<SymbolId> {
    let mut ids = vec![stmts::LPAREN; depth];
    ids.push(stmts::NUM);
    ids.extend(vec![stmts::RPAREN; depth]);
    ids.push(stmts::SEMI);
    ids
}

proptest! {
    #[test]
    fn prop_ring_buffer_matches_deque(ops in prop::collection::vec(ring_op(), 0..64)) {
        let mut ring = RingBuffer::new(8);
        let mut model = VecDeque::new();

        for op in ops {
            match op {
                RingOp::PushBack(item) if !ring.is_full() => {
                    ring.push_back(item);
                    model.push_back(item);
                }
                RingOp::PushFront(item) if !ring.is_full() => {
                    ring.push_front(item);
                    model.push_front(item);
                }
                RingOp::PopFront if !ring.is_empty() => {
                    prop_assert_eq!(Some(ring.pop_front()), model.pop_front());
                }
                _ => {}
            }
            prop_assert_eq!(ring.len(), model.len());
            prop_assert!(ring.len() < ring.capacity());
        }
        prop_assert!(ring.iter().eq(model.iter()));
    }

    #[test]
    fn prop_rewind_replays_same_tokens(
        ids in prop::collection::vec(1..10u16, 0..6),
        count in 1..6usize,
    ) {
        let mut stream = TokenStream::new(id_scanner(&ids));
        let mut events = NullEvents;
        stream.set_buffering(true);

        let mut first = Vec::new();
        for _ in 0..count {
            first.push(stream.next_buffered(&mut events).unwrap().clone());
        }
        stream.rewind();
        let mut second = Vec::new();
        for _ in 0..count {
            second.push(stream.next_buffered(&mut events).unwrap().clone());
        }
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(stream.buffered(), count);

        // leaving buffering mode hands the same tokens to the parser
        stream.set_buffering(false);
        for expected in &first {
            prop_assert_eq!(&stream.next_token(&mut events).unwrap(), expected);
        }
        prop_assert_eq!(stream.buffered(), 0);
    }

    #[test]
    fn prop_remove_second_keeps_head(
        ids in prop::collection::vec(1..10u16, 2..6),
        read in 0..3usize,
    ) {
        let expected = tokens(ids.iter().map(|&id| (id, u32::from(id))));
        let mut stream = TokenStream::new(id_scanner(&ids));
        let mut events = NullEvents;
        stream.set_buffering(true);
        for _ in 0..2 {
            stream.next_buffered(&mut events).unwrap();
        }
        stream.rewind();
        for _ in 0..read {
            stream.next_buffered(&mut events).unwrap();
        }

        let removed = stream.remove(1);
        prop_assert_eq!(&removed, &expected[1]);
        prop_assert_eq!(stream.peek(0), Some(&expected[0]));
        prop_assert_eq!(stream.read(), if read > 1 { read - 1 } else { read });

        // the reinserted token sits past a cursor that stopped at the head
        let cursor = stream.read();
        stream.insert(1, removed);
        prop_assert_eq!(stream.read(), cursor);
        prop_assert_eq!(stream.peek(1), Some(&expected[1]));
    }

    #[test]
    fn prop_parse_is_deterministic(ids in prop::collection::vec(1..5u16, 0..48)) {
        let tables = stmts_tables(false);
        let run = || {
            let mut parser = Parser::new(&tables, count_stmts, RecordingEvents::new());
            let result = parser.parse(id_scanner(&ids));
            let stats = parser.stats().clone();
            (format!("{result:?}"), result.is_ok(), stats, parser.into_events())
        };

        let (first, accepted, stats, events) = run();
        let (second, _, second_stats, second_events) = run();
        prop_assert_eq!(first, second);
        prop_assert_eq!(&stats, &second_stats);
        prop_assert_eq!(events.entries(), second_events.entries());

        prop_assert!(stats.errors_recovered <= stats.syntax_errors);
        if accepted {
            prop_assert_eq!(stats.errors_recovered, stats.syntax_errors);
        }
    }

    #[test]
    fn prop_valid_statements_need_no_recovery(
        depths in prop::collection::vec(0..4usize, 1..8),
        compressed in any::<bool>(),
    ) {
        let ids: Vec<SymbolId> = depths.iter().flat_map(|&depth| statement(depth)).collect();
        let tables = stmts_tables(compressed);
        let mut parser = Parser::new(&tables, count_stmts, RecordingEvents::new());

        let result = parser.parse(id_scanner(&ids)).unwrap();
        prop_assert_eq!(result, u32::try_from(depths.len()).ok());
        prop_assert!(parser.events().entries().is_empty());
        prop_assert_eq!(parser.stats().tokens_shifted, ids.len());
    }
}
