use std::io::{self, Write};

use crate::parse::token::{ByteChar, Token, TokenValue};
use crate::position::PositionPath;
use crate::source::Source;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TokenDumpFormat {
    /// One token per line, prefixed with the line it starts on.
    #[default]
    Plain,

    Debug,
}

pub fn dump_tokens<'buf, I>(
    format: TokenDumpFormat,
    source: &Source<'buf>,
    tokens: I,
    out: impl Write,
) -> io::Result<()>
where
    I: Iterator<Item = Token<'buf>>,
{
    match format {
        TokenDumpFormat::Plain => dump_tokens_plain(source, tokens, out),
        TokenDumpFormat::Debug => dump_tokens_debug(tokens, out),
    }
}

fn dump_tokens_debug<'buf, I>(tokens: I, mut out: impl Write) -> io::Result<()>
where
    I: Iterator<Item = Token<'buf>>,
{
    writeln!(out, "{:#?}", tokens.collect::<Vec<_>>())
}

fn dump_tokens_plain<'buf, I>(source: &Source<'buf>, tokens: I, mut out: impl Write) -> io::Result<()>
where
    I: Iterator<Item = Token<'buf>>,
{
    let mut tokens = tokens.peekable();
    let src_id = tokens.peek().and_then(|token| token.span.start.src);
    writeln!(out, "#name {}", PositionPath::new(src_id, source))?;

    for token in tokens {
        write!(out, "#{} ", token.span.start.line)?;

        match token.value {
            TokenValue::Uint(value) => writeln!(out, "TOKEN_UINT: {}", value)?,

            TokenValue::Ident(name) => {
                out.write_all(b"TOKEN_NAME: ")?;
                out.write_all(&name)?;
                writeln!(out)?;
            }

            TokenValue::Other(c) => writeln!(out, "TOKEN: {}", ByteChar(c))?,
            TokenValue::Eof => writeln!(out, "TOKEN_EOF")?,
        }
    }

    Ok(())
}
