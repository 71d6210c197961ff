#![allow(dead_code)]

use std::path::PathBuf;

use rdcalc::dump::{dump_tokens, TokenDumpFormat};
use rdcalc::parse::token::Token;
use rdcalc::parse::{Cursor, EvalError, Lexer, Parser};
use rdcalc::source::{Source, SourceBuffer};

pub fn tokens(code: &str) -> Vec<Token<'_>> {
    Lexer::new(Cursor::from_bytes(code.as_bytes())).collect()
}

pub fn parser(code: &str) -> Parser<'_> {
    Parser::new(Lexer::new(Cursor::from_bytes(code.as_bytes())))
}

pub fn evaluate_prefix(code: &str) -> Result<(i32, Token<'_>), EvalError<'_>> {
    parser(code).evaluate_prefix()
}

/// Wraps `inner` in `depth` pairs of parentheses.
pub fn nested(depth: usize, inner: &str) -> String {
    format!("{}{}{}", "(".repeat(depth), inner, ")".repeat(depth))
}

pub fn dump(name: &str, code: &[u8], format: TokenDumpFormat) -> String {
    let mut source_buf = SourceBuffer::new();
    let mut source = Source::new(&mut source_buf);
    let source_id = source.load_from_string(PathBuf::from(name), code.to_vec());
    let source_file = source.get(source_id).unwrap();

    let lexer = Lexer::new(Cursor::new(source_file));
    let mut buf = vec![];
    dump_tokens(format, &source, lexer, &mut buf).unwrap();

    String::from_utf8(buf).unwrap()
}
