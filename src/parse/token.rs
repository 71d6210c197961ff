use std::borrow::Cow;
use std::fmt::{self, Debug, Display};

use byte_string::ByteStr;
use serde::Serialize;

use crate::position::{HasSpan, Span};
use crate::util::CloneStatic;

pub const VERTICAL_TAB: u8 = b'\x0b';
pub const FORM_FEED: u8 = b'\x0c';

#[derive(Serialize, Clone, Eq, PartialEq)]
pub enum TokenValue<'buf> {
    Uint(u32),
    Ident(Cow<'buf, [u8]>),

    /// A single byte that is neither whitespace nor the start of a literal or identifier.
    Other(u8),

    Eof,
}

impl TokenValue<'_> {
    pub fn ty(&self) -> TokenType {
        match self {
            Self::Uint(_) => TokenType::Uint,
            Self::Ident(_) => TokenType::Ident,
            Self::Other(c) => TokenType::Other(*c),
            Self::Eof => TokenType::Eof,
        }
    }
}

impl Debug for TokenValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uint(value) => f.debug_tuple("Uint").field(value).finish(),
            Self::Ident(name) => f.debug_tuple("Ident").field(&ByteStr::new(name)).finish(),
            Self::Other(c) => f.debug_tuple("Other").field(&ByteChar(*c)).finish(),
            Self::Eof => write!(f, "Eof"),
        }
    }
}

#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
pub struct Token<'buf> {
    pub span: Span,
    pub value: TokenValue<'buf>,
}

impl<'buf> Token<'buf> {
    pub fn ty(&self) -> TokenType {
        self.value.ty()
    }

    pub fn is_eof(&self) -> bool {
        self.value == TokenValue::Eof
    }
}

impl CloneStatic<TokenValue<'static>> for TokenValue<'_> {
    fn clone_static(&self) -> TokenValue<'static> {
        match self {
            Self::Uint(value) => TokenValue::Uint(*value),
            Self::Ident(name) => TokenValue::Ident(name.clone_static()),
            Self::Other(c) => TokenValue::Other(*c),
            Self::Eof => TokenValue::Eof,
        }
    }
}

impl CloneStatic<Token<'static>> for Token<'_> {
    fn clone_static(&self) -> Token<'static> {
        Token {
            span: self.span.clone(),
            value: self.value.clone_static(),
        }
    }
}

impl HasSpan for Token<'_> {
    fn span(&self) -> Cow<'_, Span> {
        Cow::Borrowed(&self.span)
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            TokenValue::Uint(value) => write!(f, "integer literal {}", value),
            TokenValue::Ident(ref name) => {
                write!(f, "identifier `{}`", String::from_utf8_lossy(name))
            }
            TokenValue::Other(c) => write!(f, "'{}'", ByteChar(c)),
            TokenValue::Eof => write!(f, "end of input"),
        }
    }
}

/// The kind of a token with the payload stripped off.
#[derive(Serialize, Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum TokenType {
    Uint,
    Ident,
    Other(u8),
    Eof,
}

impl Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uint => write!(f, "an integer literal"),
            Self::Ident => write!(f, "an identifier"),
            Self::Other(c) => write!(f, "'{}'", ByteChar(*c)),
            Self::Eof => write!(f, "end of input"),
        }
    }
}

/// Prints graphic ascii bytes as-is and everything else as a `\xNN` escape.
pub struct ByteChar(pub u8);

impl Display for ByteChar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_ascii_graphic() {
            write!(f, "{}", self.0 as char)
        } else {
            write!(f, "\\x{:02x}", self.0)
        }
    }
}

impl Debug for ByteChar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b'{}'", self)
    }
}
