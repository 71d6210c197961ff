use std::borrow::Cow;
use std::iter::FusedIterator;

use tracing::trace;

use crate::parse::cursor::Cursor;
use crate::parse::token::{Token, TokenValue, FORM_FEED, VERTICAL_TAB};
use crate::position::{Position, Span};

/// The sentinel byte: input ends at the first NUL even if the buffer goes on.
const TERMINATOR: u8 = b'\0';

fn is_whitespace(c: u8) -> bool {
    matches!(c, b' ' | b'\n' | FORM_FEED | b'\r' | b'\t' | VERTICAL_TAB)
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_ident_continuation(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

/// Scans a byte buffer one token at a time.
///
/// Lexing cannot fail: every byte that does not start a literal or an identifier
/// becomes a [`TokenValue::Other`] token of its own.
#[derive(Debug, Clone)]
pub struct Lexer<'buf> {
    cursor: Cursor<'buf>,
    eof: bool,
}

impl<'buf> Lexer<'buf> {
    pub fn new(cursor: Cursor<'buf>) -> Self {
        Self { cursor, eof: false }
    }

    /// Returns the position of the next unscanned byte.
    pub fn pos(&self) -> Position {
        self.cursor.pos()
    }

    fn scan_uint(&mut self) -> TokenValue<'buf> {
        let value = self
            .cursor
            .consume_while(u8::is_ascii_digit)
            .iter()
            .fold(0u32, |acc, &c| {
                acc.wrapping_mul(10).wrapping_add(u32::from(c - b'0'))
            });

        TokenValue::Uint(value)
    }

    fn scan_ident(&mut self) -> TokenValue<'buf> {
        let ident = self.cursor.consume_while(|&c| is_ident_continuation(c));

        TokenValue::Ident(Cow::Borrowed(ident))
    }

    fn skip_whitespace(&mut self) {
        self.cursor.consume_while(|&c| is_whitespace(c));
    }

    /// Scans the next token.
    ///
    /// Once the end of input is reached, every further call returns another
    /// [`TokenValue::Eof`] at the same position.
    pub fn advance(&mut self) -> Token<'buf> {
        self.skip_whitespace();
        let start = self.cursor.pos();

        let value = match self.cursor.peek() {
            // the terminator is not consumed: Eof has an empty span
            None | Some(TERMINATOR) => TokenValue::Eof,
            Some(c) if c.is_ascii_digit() => self.scan_uint(),
            Some(c) if is_ident_start(c) => self.scan_ident(),

            Some(c) => {
                self.cursor.next();

                TokenValue::Other(c)
            }
        };

        let token = Token {
            span: Span {
                start,
                end: self.cursor.pos(),
            },
            value,
        };

        trace!(?token, "scanned a token");

        token
    }
}

impl<'buf> Iterator for Lexer<'buf> {
    type Item = Token<'buf>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.eof {
            return None;
        }

        let token = self.advance();
        self.eof = token.is_eof();

        Some(token)
    }
}

impl<'buf> FusedIterator for Lexer<'buf> {}
