use std::slice;

use crate::position::Position;
use crate::source::SourceFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CursorState {
    Eof,
    HeadByte,
    ContinuationByte(u8),
}

/// A forward-only read cursor over a borrowed byte buffer.
#[derive(Debug, Clone)]
pub struct Cursor<'buf> {
    buf: &'buf [u8],
    iter: slice::Iter<'buf, u8>,
    pos: Position,
    state: CursorState,
}

impl<'buf> Cursor<'buf> {
    pub fn new(src_file: &SourceFile<'buf>) -> Self {
        Self::with_start(src_file.buf(), Position::with_source_file(src_file))
    }

    /// Creates a cursor over a buffer that is not registered in a [`Source`](crate::source::Source).
    pub fn from_bytes(buf: &'buf [u8]) -> Self {
        Self::with_start(buf, Position::default())
    }

    fn with_start(buf: &'buf [u8], pos: Position) -> Self {
        Self {
            buf,
            iter: buf.iter(),
            pos,
            state: CursorState::HeadByte,
        }
    }

    /// Returns the position of the immediately following character.
    pub fn pos(&self) -> Position {
        self.pos
    }

    pub fn peek(&self) -> Option<u8> {
        self.iter.clone().next().copied()
    }

    pub fn consume_n(&mut self, n: usize) -> &'buf [u8] {
        let start = self.pos.byte;

        for _ in 0..n {
            self.next();
        }

        &self.buf[start..self.pos.byte]
    }

    pub fn consume_while(&mut self, mut predicate: impl FnMut(&u8) -> bool) -> &'buf [u8] {
        self.consume_n(self.iter.clone().take_while(|&c| predicate(c)).count())
    }
}

fn is_continuation_byte(c: u8) -> bool {
    (0b1000_0000..=0b1011_1111).contains(&c)
}

impl Cursor<'_> {
    fn advance_head(&mut self, c: u8) -> CursorState {
        match c {
            // the `\n` that follows ends the line
            b'\r' if self.peek() == Some(b'\n') => CursorState::HeadByte,

            b'\n' | b'\r' => {
                self.pos.line += 1;
                self.pos.col = 1;

                CursorState::HeadByte
            }

            _ => {
                self.pos.col += 1;

                match c {
                    0b1100_0000..=0b1101_1111 => CursorState::ContinuationByte(1),
                    0b1110_0000..=0b1110_1111 => CursorState::ContinuationByte(2),
                    0b1111_0000..=0b1111_0111 => CursorState::ContinuationByte(3),

                    // ascii, stray continuation bytes, invalid head bytes
                    _ => CursorState::HeadByte,
                }
            }
        }
    }
}

impl<'buf> Iterator for Cursor<'buf> {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        use CursorState::*;

        if let Eof = self.state {
            return None;
        }

        let Some(c) = self.iter.next().copied() else {
            self.state = Eof;

            return None;
        };

        self.pos.byte += 1;

        self.state = match self.state {
            Eof => unreachable!(),

            ContinuationByte(1) if is_continuation_byte(c) => HeadByte,
            ContinuationByte(remaining) if is_continuation_byte(c) => ContinuationByte(remaining - 1),

            // expected a continuation byte, got something wild
            ContinuationByte(_) | HeadByte => self.advance_head(c),
        };

        Some(c)
    }
}
