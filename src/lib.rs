pub mod arith;
pub mod dump;
pub mod errors;
pub mod parse;
pub mod position;
pub mod source;
pub mod util;

#[cfg(target_family = "wasm")]
pub mod wasm;

use crate::parse::{Cursor, EvalError, Lexer, Parser};

/// Evaluates an integer expression such as `2 * (3 + 4)`.
///
/// The whole input must form a single expression; see [`Parser::evaluate_prefix`]
/// for a variant that stops after the first complete expression.
pub fn evaluate(source: &str) -> Result<i32, EvalError<'_>> {
    let cursor = Cursor::from_bytes(source.as_bytes());
    let lexer = Lexer::new(cursor);

    Parser::new(lexer).evaluate()
}
