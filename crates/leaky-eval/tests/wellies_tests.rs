//! Wellies matching over parsed programs.

use leaky_eval::{BufferedIo, Interpreter, WellyMatchTable};
use leaky_lexer::Lexer;
use leaky_parser::Parser;
use leaky_types::ast::Program;
use leaky_types::SourceFile;

const HEADER: &str = "the bucket depot is in front of me\nthe tap is behind me\nthe pond is to my left\n";

fn parse(body: &str) -> Program {
    let source = format!("{HEADER}{body}");
    let sf = SourceFile::new("wellies.leaky", source.as_str());
    let lex = Lexer::new(&sf).lex();
    let result = Parser::new(lex.tokens, &sf).parse();
    assert!(!result.errors.has_errors(), "unexpected parse errors");
    result.program.expect("no program")
}

#[test]
fn test_table_from_source() {
    let program = parse(
        "put on my wellies      -- 0
turn right                      -- 1
put on my wellies               -- 2
take off my wellies             -- 3
put on my wellies               -- 4
put on my wellies               -- 5
take off my wellies             -- 6
take off my wellies             -- 7
take off my wellies             -- 8
",
    );
    let table = WellyMatchTable::build(&program.instructions);
    assert_eq!(table.matching_take_off(0), Some(8));
    assert_eq!(table.matching_take_off(2), Some(3));
    assert_eq!(table.matching_take_off(4), Some(7));
    assert_eq!(table.matching_take_off(5), Some(6));
    assert_eq!(table.matching_take_off(1), None);
    assert!(table.unmatched_take_offs().is_empty());
}

#[test]
fn test_unmatched_take_offs_recorded() {
    let program = parse(
        "take off my wellies
put on my wellies
take off my wellies
take off my wellies
",
    );
    let table = WellyMatchTable::build(&program.instructions);
    assert_eq!(table.unmatched_take_offs(), &[0, 3]);
    assert_eq!(table.matching_take_off(1), Some(2));
}

#[test]
fn test_interpreter_uses_the_same_table() {
    let program = parse("put on my wellies\nput on my wellies\ntake off my wellies\n");
    let interp = Interpreter::new(&program, BufferedIo::new());
    assert_eq!(
        interp.welly_table(),
        &WellyMatchTable::build(&program.instructions)
    );
    assert_eq!(interp.welly_table().matching_take_off(0), None);
    assert_eq!(interp.welly_table().matching_take_off(1), Some(2));
}

#[test]
fn test_wellies_law_over_a_run() {
    let program = parse(
        "put on my wellies
turn right
put on my wellies
take off my wellies
turn left
take off my wellies
take off my wellies
put on my wellies
",
    );
    let mut interp = Interpreter::new(&program, BufferedIo::new());
    while interp.step().unwrap() {
        let ledger = interp.agent().ledger();
        assert_eq!(
            interp.agent().wellies_depth() as u64,
            ledger.donned - ledger.doffed - ledger.slipped
        );
    }
    let ledger = interp.agent().ledger();
    assert_eq!((ledger.donned, ledger.doffed, ledger.slipped), (3, 2, 0));
    assert_eq!(interp.agent().wellies_depth(), 1);
}
