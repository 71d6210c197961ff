mod cursor;
mod lexer;
mod parser;
pub mod token;

pub use cursor::Cursor;
pub use lexer::Lexer;
pub use parser::{EvalError, Matcher, Parser, RECURSION_LIMIT};
