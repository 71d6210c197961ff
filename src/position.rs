use std::borrow::Cow;
use std::fmt::{self, Display};

use serde::Serialize;

use crate::source::{Source, SourceFile, SourceId};

#[derive(Serialize, Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct Position {
    #[serde(skip)]
    pub src: Option<SourceId>,
    pub byte: usize,
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn with_source_id(src: SourceId) -> Self {
        Self {
            src: Some(src),
            ..Default::default()
        }
    }

    pub fn with_source_file(src_file: &SourceFile<'_>) -> Self {
        Self::with_source_id(src_file.id())
    }

    pub fn display<'a>(&'a self, source: &'a Source<'_>) -> impl Display + 'a {
        PositionDisplay { pos: self, source }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self {
            src: None,
            byte: 0,
            line: 1,
            col: 1,
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

struct PositionDisplay<'a> {
    pos: &'a Position,
    source: &'a Source<'a>,
}

impl Display for PositionDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", PositionPath::new(self.pos.src, self.source), self.pos)
    }
}

/// Displays the name of the source a position belongs to.
pub struct PositionPath<'a, 'buf> {
    src: Option<SourceId>,
    source: &'a Source<'buf>,
}

impl<'a, 'buf> PositionPath<'a, 'buf> {
    pub fn new(src: Option<SourceId>, source: &'a Source<'buf>) -> Self {
        Self { src, source }
    }
}

impl Display for PositionPath<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.src.and_then(|id| self.source.get(id)) {
            Some(src_file) => write!(f, "{}", src_file.path().display()),
            None => write!(f, "<unknown>"),
        }
    }
}

/// A half-open span: `start` is the first byte of the lexeme, `end` is one past the last.
#[derive(Serialize, Debug, Clone, Hash, Eq, PartialEq, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn len(&self) -> usize {
        self.end.byte - self.start.byte
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn display<'a>(&'a self, source: &'a Source<'_>) -> impl Display + 'a {
        self.start.display(source)
    }
}

pub trait HasSpan {
    fn span(&self) -> Cow<'_, Span>;
}

impl HasSpan for Span {
    fn span(&self) -> Cow<'_, Span> {
        Cow::Borrowed(self)
    }
}
