//! # Tabula
//!
//! A table-driven LR(1) parsing runtime with speculative error recovery.
//!
//! ## Overview
//!
//! Tabula runs parsers whose tables were generated elsewhere. It provides:
//!
//! - **Parser driver**: the shift/reduce loop over any [`ParseTables`]
//! - **Packed tables**: a compact row-displacement format and a
//!   [`TableBuilder`] to assemble it
//! - **Token stream**: a buffered, rewindable reader over a [`Scanner`]
//! - **Error recovery**: missing-token insertion, misspelled-token
//!   replacement, unexpected-token deletion and error-phrase recovery, each
//!   validated by a forward [`Simulator`] run before it is committed
//! - **Diagnostics**: every error and repair reported through
//!   [`ParseEvents`]
//!
//! ## Quick Start
//!
//! ```rust
//! use tabula::testing::scanner;
//! use tabula::{EOF, Parser, RhsArgs, RuleId, StderrEvents, TableBuilder};
//!
//! // expr := NUM '+' NUM
//! const NUM: u16 = 1;
//! const PLUS: u16 = 2;
//! const EXPR: u16 = 3;
//!
//! let tables = TableBuilder::new(3, 4)
//!     .rule(EXPR, 3)
//!     .shift(0, NUM, 1)
//!     .shift(1, PLUS, 2)
//!     .shift(2, NUM, 3)
//!     .reduce(3, EOF, 0)
//!     .goto(0, EXPR, 4)
//!     .accept(4, EOF)
//!     .build()?;
//!
//! let sum = |_rule: RuleId, mut args: RhsArgs<'_, i64>| Some(args.take(0)? + args.take(2)?);
//! let mut parser = Parser::new(&tables, sum, StderrEvents);
//!
//! // "1:2-1:2: Recovered: missing token #2 was inserted"
//! let total = parser.parse(scanner([(NUM, 2), (NUM, 3)]))?;
//! assert_eq!(total, Some(5));
//! assert_eq!(parser.stats().errors_recovered, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Modules
//!
//! - [`symbol`] - Symbols, positions and id types
//! - [`table`] - Table access, action decoding and packed tables
//! - [`scanner`] - The scanner boundary
//! - [`stream`] - Buffered token stream and ring buffer
//! - [`actions`] - Reduction actions
//! - [`parser`] - Parser driver, simulator and recovery
//! - [`error`] - Error types and diagnostics
//! - [`testing`] - Helpers for testing grammars

pub mod actions;
pub mod error;
pub mod parser;
pub mod scanner;
pub mod stack;
pub mod stream;
pub mod symbol;
pub mod table;
pub mod testing;

// Re-export commonly used types
pub use actions::{Actions, RhsArgs, RuleActions};
pub use error::diagnostics::{NullEvents, ParseEvents, StderrEvents, WriterEvents};
pub use error::{LexicalError, ParseError, ScanError, TableError, Unrecoverable};
pub use parser::{ParseEvent, ParseStats, Parser, ParserConfig, RecoveryStrategy, Simulator};
pub use scanner::{Scanner, VecScanner};
pub use stack::{ParseStack, Stack};
pub use stream::{DEFAULT_LOOKAHEAD_WINDOW, TokenStream};
pub use symbol::{EOF, Position, RuleId, Span, StateId, Symbol, SymbolId};
pub use table::{Action, Lookaheads, PackedTables, ParseTables, RuleInfo, TableBuilder, TableParts};
