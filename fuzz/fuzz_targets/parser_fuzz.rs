#![no_main]
use libfuzzer_sys::fuzz_target;
use tabula::testing::scanner;
use tabula::{EOF, NullEvents, PackedTables, Parser, ParserConfig, RhsArgs, RuleId, TableBuilder};

// stmts := stmts stmt | stmt
// stmt  := expr ';' | error ';'
// expr  := NUM | '(' expr ')' | '(' error ')'
fn statement_tables(compressed: bool) -> PackedTables {
    let mut builder = TableBuilder::new(5, 9)
        .rule(5, 2)
        .rule(5, 1)
        .rule(6, 2)
        .rule(6, 2)
        .rule(7, 1)
        .rule(7, 3)
        .rule(7, 3)
        .error_symbol(8)
        .compressed(compressed)
        .goto(0, 5, 1)
        .goto(0, 6, 2)
        .goto(0, 7, 3)
        .goto(0, 8, 4)
        .shift(0, 1, 5)
        .shift(0, 3, 6)
        .accept(1, EOF)
        .goto(1, 6, 7)
        .goto(1, 7, 3)
        .goto(1, 8, 4)
        .shift(1, 1, 5)
        .shift(1, 3, 6)
        .shift(3, 2, 8)
        .shift(4, 2, 9)
        .goto(6, 7, 10)
        .goto(6, 8, 11)
        .shift(6, 1, 5)
        .shift(6, 3, 6)
        .shift(10, 4, 12)
        .shift(11, 4, 13);
    for terminal in [EOF, 1, 3] {
        builder = builder
            .reduce(2, terminal, 1)
            .reduce(7, terminal, 0)
            .reduce(8, terminal, 2)
            .reduce(9, terminal, 3);
    }
    for terminal in [2, 4] {
        builder = builder
            .reduce(5, terminal, 4)
            .reduce(12, terminal, 5)
            .reduce(13, terminal, 6);
    }
    builder.build().unwrap()
}

fuzz_target!(|data: &[u8]| {
    let Some((&flags, rest)) = data.split_first() else {
        return;
    };
    let tables = statement_tables(flags & 1 == 1);
    let config = ParserConfig::default()
        .with_lookahead_window(usize::from((flags >> 1) & 0x7) + 1)
        .with_trace_events(flags & 0x10 != 0);

    // terminals other than end of input
    let tokens = rest.iter().map(|&byte| (u16::from(byte % 4) + 1, byte));
    let mut parser = Parser::new(
        &tables,
        |_: RuleId, _: RhsArgs<'_, u8>| None,
        NullEvents,
    )
    .with_config(config);
    let _ = parser.parse(scanner(tokens));

    let stats = parser.stats();
    assert!(stats.errors_recovered <= stats.syntax_errors);
});
