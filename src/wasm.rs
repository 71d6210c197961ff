use wasm_bindgen::prelude::*;

use crate::parse::{Cursor, Lexer, Parser};
use crate::position::HasSpan;
use crate::source::{Source, SourceBuffer};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
pub fn evaluate_from_string(code: &str) -> Result<i32, String> {
    let mut source_buf = SourceBuffer::new();
    let mut source = Source::new(&mut source_buf);
    let source_id = source.load_from_string("input".into(), code.as_bytes().to_vec());
    let Some(source_file) = source.get(source_id) else {
        return Err("the input could not be loaded".to_owned());
    };

    let cursor = Cursor::new(source_file);
    let lexer = Lexer::new(cursor);

    Parser::new(lexer)
        .evaluate()
        .map_err(|e| format!("{} {}", e.span().display(&source), e))
}
