#![no_main]

use libfuzzer_sys::fuzz_target;

use rdcalc::parse::{Cursor, Lexer, Parser};
use rdcalc::position::HasSpan;

fuzz_target!(|code: &[u8]| {
    let tokens = Lexer::new(Cursor::from_bytes(code)).collect::<Vec<_>>();

    assert!(tokens.last().is_some_and(|token| token.is_eof()));

    for token in &tokens {
        assert!(token.span.start.byte <= token.span.end.byte);
    }

    let parser = Parser::new(Lexer::new(Cursor::from_bytes(code)));

    if let Err(e) = parser.evaluate() {
        assert!(e.span().end.byte <= code.len());
    }
});
