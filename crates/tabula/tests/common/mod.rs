//! Hand-built grammars shared by the integration tests

#![allow(dead_code)]

use tabula::{EOF, PackedTables, RhsArgs, RuleId, TableBuilder};

/// `expr := NUM '+' NUM`, plus an unused `-` terminal
pub mod sum {
    pub const NUM: u16 = 1;
    pub const PLUS: u16 = 2;
    pub const MINUS: u16 = 3;
    pub const EXPR: u16 = 4;
}

pub fn sum_tables() -> PackedTables {
    use sum::*;
    TableBuilder::new(4, 5)
        .rule(EXPR, 3)
        .shift(0, NUM, 1)
        .shift(1, PLUS, 2)
        .shift(2, NUM, 3)
        .reduce(3, EOF, 0)
        .goto(0, EXPR, 4)
        .accept(4, EOF)
        .build()
        .expect("sum grammar tables")
}

/// Adds the two operands; a missing operand makes the sum missing too
pub fn add(_rule: RuleId, mut args: RhsArgs<'_, i64>) -> Option<i64> {
    Some(args.take(0)? + args.take(2)?)
}

/// Statement lists with error productions:
///
/// ```text
/// stmts := stmts stmt | stmt
/// stmt  := expr ';' | error ';'
/// expr  := NUM | '(' expr ')' | '(' error ')'
/// ```
pub mod stmts {
    pub const NUM: u16 = 1;
    pub const SEMI: u16 = 2;
    pub const LPAREN: u16 = 3;
    pub const RPAREN: u16 = 4;
    pub const STMTS: u16 = 5;
    pub const STMT: u16 = 6;
    pub const EXPR: u16 = 7;
    pub const ERROR: u16 = 8;

    pub const STMTS_STMTS: u16 = 0;
    pub const STMTS_STMT: u16 = 1;
    pub const STMT_EXPR: u16 = 2;
    pub const STMT_ERROR: u16 = 3;
    pub const EXPR_NUM: u16 = 4;
    pub const EXPR_PAREN: u16 = 5;
    pub const EXPR_ERROR: u16 = 6;
}

pub fn stmts_tables(compressed: bool) -> PackedTables {
    use stmts::*;
    let stmt_follow = [EOF, NUM, LPAREN];
    let expr_follow = [SEMI, RPAREN];

    let mut builder = TableBuilder::new(5, 9)
        .rule(STMTS, 2)
        .rule(STMTS, 1)
        .rule(STMT, 2)
        .rule(STMT, 2)
        .rule(EXPR, 1)
        .rule(EXPR, 3)
        .rule(EXPR, 3)
        .error_symbol(ERROR)
        .compressed(compressed)
        .goto(0, STMTS, 1)
        .goto(0, STMT, 2)
        .goto(0, EXPR, 3)
        .goto(0, ERROR, 4)
        .shift(0, NUM, 5)
        .shift(0, LPAREN, 6)
        .accept(1, EOF)
        .goto(1, STMT, 7)
        .goto(1, EXPR, 3)
        .goto(1, ERROR, 4)
        .shift(1, NUM, 5)
        .shift(1, LPAREN, 6)
        .shift(3, SEMI, 8)
        .shift(4, SEMI, 9)
        .goto(6, EXPR, 10)
        .goto(6, ERROR, 11)
        .shift(6, NUM, 5)
        .shift(6, LPAREN, 6)
        .shift(10, RPAREN, 12)
        .shift(11, RPAREN, 13);

    for terminal in stmt_follow {
        builder = builder
            .reduce(2, terminal, STMTS_STMT)
            .reduce(7, terminal, STMTS_STMTS)
            .reduce(8, terminal, STMT_EXPR)
            .reduce(9, terminal, STMT_ERROR);
    }
    for terminal in expr_follow {
        builder = builder
            .reduce(5, terminal, EXPR_NUM)
            .reduce(12, terminal, EXPR_PAREN)
            .reduce(13, terminal, EXPR_ERROR);
    }
    builder.build().expect("statement grammar tables")
}

/// Counts the statements that were parsed
pub fn count_stmts(rule: RuleId, mut args: RhsArgs<'_, u32>) -> Option<u32> {
    use stmts::*;
    match rule {
        STMTS_STMTS => Some(args.take(0).unwrap_or(0) + 1),
        STMTS_STMT => Some(1),
        _ => None,
    }
}

/// Two goals selected by a leading marker:
///
/// ```text
/// start := ONE NUM | TWO NUM NUM
/// ```
pub mod goals {
    pub const NUM: u16 = 1;
    pub const ONE: u16 = 2;
    pub const TWO: u16 = 3;
    pub const START: u16 = 4;
}

pub fn goal_tables() -> PackedTables {
    use goals::*;
    TableBuilder::new(4, 5)
        .rule(START, 2)
        .rule(START, 3)
        .shift(0, ONE, 1)
        .shift(0, TWO, 2)
        .goto(0, START, 3)
        .accept(3, EOF)
        .shift(1, NUM, 4)
        .reduce(4, EOF, 0)
        .shift(2, NUM, 5)
        .shift(5, NUM, 6)
        .reduce(6, EOF, 1)
        .build()
        .expect("goal grammar tables")
}

/// Two sentences that share a prefix:
///
/// ```text
/// s := A X B | A Y C
/// ```
///
/// `Z` is a terminal no state accepts.
pub mod pairs {
    pub const A: u16 = 1;
    pub const X: u16 = 2;
    pub const B: u16 = 3;
    pub const Y: u16 = 4;
    pub const C: u16 = 5;
    pub const Z: u16 = 6;
    pub const S: u16 = 7;
}

pub fn pair_tables() -> PackedTables {
    use pairs::*;
    TableBuilder::new(7, 8)
        .rule(S, 3)
        .rule(S, 3)
        .shift(0, A, 1)
        .goto(0, S, 6)
        .shift(1, X, 2)
        .shift(1, Y, 4)
        .shift(2, B, 3)
        .reduce(3, EOF, 0)
        .shift(4, C, 5)
        .reduce(5, EOF, 1)
        .accept(6, EOF)
        .build()
        .expect("pair grammar tables")
}

/// The number of the rule that matched
pub fn which_rule(rule: RuleId, _args: RhsArgs<'_, u32>) -> Option<u32> {
    Some(u32::from(rule))
}
