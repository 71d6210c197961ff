use std::borrow::Cow;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{self, Display};
use std::mem;
use std::ops::{Deref, DerefMut};

use itertools::Itertools;
use serde::Serialize;
use tracing::{instrument, trace};

use crate::arith::{self, ArithError, BinOpKind, UnOpKind};
use crate::parse::lexer::Lexer;
use crate::parse::token::{Token, TokenType, TokenValue};
use crate::position::{HasSpan, Position, Span};
use crate::try_match;
use crate::util::CloneStatic;

/// How deep parentheses may nest before parsing gives up.
///
/// Each level costs a handful of instrumented frames; this keeps unoptimized
/// builds well within a 2 MiB thread stack.
pub const RECURSION_LIMIT: usize = 64;

#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
pub enum EvalError<'buf> {
    UnexpectedToken {
        expected: Cow<'static, [TokenType]>,
        actual: Token<'buf>,
    },

    DivisionByZero {
        span: Span,
    },

    RecursionLimit(Span),
}

impl Display for EvalError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken { expected, actual } => {
                write!(f, "encountered an unexpected token: {}", actual)?;

                if expected.is_empty() {
                    Ok(())
                } else {
                    write!(f, " (expected {})", format_expected(expected))
                }
            }

            Self::DivisionByZero { .. } => write!(f, "{}", ArithError::DivisionByZero),

            Self::RecursionLimit(_) => {
                write!(f, "a recursion limit has been reached while parsing")
            }
        }
    }
}

impl Error for EvalError<'_> {}

impl CloneStatic<EvalError<'static>> for EvalError<'_> {
    fn clone_static(&self) -> EvalError<'static> {
        match self {
            Self::UnexpectedToken { expected, actual } => EvalError::UnexpectedToken {
                expected: expected.clone_static(),
                actual: actual.clone_static(),
            },

            Self::DivisionByZero { span } => EvalError::DivisionByZero { span: span.clone() },
            Self::RecursionLimit(span) => EvalError::RecursionLimit(span.clone()),
        }
    }
}

impl HasSpan for EvalError<'_> {
    fn span(&self) -> Cow<'_, Span> {
        match self {
            Self::UnexpectedToken { actual, .. } => actual.span(),
            Self::DivisionByZero { span } => Cow::Borrowed(span),
            Self::RecursionLimit(span) => Cow::Borrowed(span),
        }
    }
}

/// Something the lookahead token can be tested against.
pub trait Matcher {
    fn matches(&self, token: &Token<'_>) -> bool;

    fn expected_tokens(&self) -> Cow<'static, [TokenType]>;
}

impl<const N: usize> Matcher for &'static [u8; N] {
    fn matches(&self, token: &Token<'_>) -> bool {
        match token.ty() {
            TokenType::Other(c) => self.contains(&c),
            _ => false,
        }
    }

    fn expected_tokens(&self) -> Cow<'static, [TokenType]> {
        self.iter().copied().map(TokenType::Other).collect()
    }
}

impl Matcher for TokenType {
    fn matches(&self, token: &Token<'_>) -> bool {
        self == &token.ty()
    }

    fn expected_tokens(&self) -> Cow<'static, [TokenType]> {
        vec![*self].into()
    }
}

/// Matches a single punctuation byte, such as `b'('`.
impl Matcher for u8 {
    fn matches(&self, token: &Token<'_>) -> bool {
        TokenType::Other(*self) == token.ty()
    }

    fn expected_tokens(&self) -> Cow<'static, [TokenType]> {
        vec![TokenType::Other(*self)].into()
    }
}

macro_rules! select {
    ($self:ident : { $( $matcher:expr => $arm:expr, )+ _ => @error, }) => ({
        $(
            if $self.token_is(&$matcher) {
                $arm
            } else
        )+ {
            let expected: BTreeSet<TokenType> = [$( $matcher.expected_tokens().iter().copied(), )+]
                .into_iter()
                .flatten()
                .collect();

            return Err(EvalError::UnexpectedToken {
                expected: expected.into_iter().collect::<Vec<_>>().into(),
                actual: $self.token.clone(),
            });
        }
    });
}

/// Renders `a`, `a or b`, `a, b or c`, and so on.
fn format_expected(tokens: &[TokenType]) -> String {
    match tokens {
        [] => String::new(),
        [ty] => ty.to_string(),
        [init @ .., last] => format!("{} or {}", init.iter().join(", "), last),
    }
}

struct BoundedParser<'buf, 'a> {
    parser: &'a mut Parser<'buf>,
}

impl Drop for BoundedParser<'_, '_> {
    fn drop(&mut self) {
        self.parser.recursion_limit += 1;
    }
}

impl<'buf> Deref for BoundedParser<'buf, '_> {
    type Target = Parser<'buf>;

    fn deref(&self) -> &Parser<'buf> {
        self.parser
    }
}

impl<'buf> DerefMut for BoundedParser<'buf, '_> {
    fn deref_mut(&mut self) -> &mut Parser<'buf> {
        self.parser
    }
}

/// A recursive-descent parser that evaluates the expression as it goes.
///
/// The grammar, from the lowest precedence to the highest:
///
/// ```text
/// expr    = add_sub
/// add_sub = mul_div { ("+" | "-") mul_div }
/// mul_div = unary { ("*" | "/") unary }
/// unary   = ["-"] primary
/// primary = UINT | "(" expr ")"
/// ```
pub struct Parser<'buf> {
    lexer: Lexer<'buf>,
    token: Token<'buf>,
    prev_end: Position,
    recursion_limit: usize,
}

impl<'buf> Parser<'buf> {
    pub fn new(lexer: Lexer<'buf>) -> Self {
        Self::with_recursion_limit(lexer, RECURSION_LIMIT)
    }

    pub fn with_recursion_limit(mut lexer: Lexer<'buf>, recursion_limit: usize) -> Self {
        let prev_end = lexer.pos();
        let token = lexer.advance();

        Self {
            lexer,
            token,
            prev_end,
            recursion_limit,
        }
    }

    /// Enters one more nesting level, failing at the token that would exceed the limit.
    fn bounded(&mut self) -> Result<BoundedParser<'buf, '_>, EvalError<'buf>> {
        self.recursion_limit = self
            .recursion_limit
            .checked_sub(1)
            .ok_or_else(|| EvalError::RecursionLimit(self.token.span.clone()))?;

        Ok(BoundedParser { parser: self })
    }

    /// Returns the lookahead token and scans the next one in its place.
    fn advance(&mut self) -> Token<'buf> {
        let next = self.lexer.advance();
        let token = mem::replace(&mut self.token, next);
        self.prev_end = token.span.end;

        token
    }

    fn token_is(&self, matcher: &impl Matcher) -> bool {
        matcher.matches(&self.token)
    }

    #[instrument(
        level = "trace",
        ret,
        skip(self, matcher),
        fields(matcher = format_expected(&matcher.expected_tokens()))
    )]
    fn expect(&mut self, matcher: impl Matcher) -> Result<Token<'buf>, EvalError<'buf>> {
        trace!(token = ?self.token);

        if self.token_is(&matcher) {
            Ok(self.advance())
        } else {
            Err(EvalError::UnexpectedToken {
                expected: matcher.expected_tokens(),
                actual: self.token.clone(),
            })
        }
    }

    #[instrument(
        level = "trace",
        ret,
        skip(self, matcher),
        fields(matcher = format_expected(&matcher.expected_tokens()))
    )]
    fn try_consume(&mut self, matcher: impl Matcher) -> Option<Token<'buf>> {
        trace!(token = ?self.token);

        self.token_is(&matcher).then(|| self.advance())
    }

    /// Evaluates the whole input, which must consist of exactly one expression.
    #[instrument(level = "trace", skip(self), ret)]
    pub fn evaluate(mut self) -> Result<i32, EvalError<'buf>> {
        let value = self.parse_expr()?;
        self.expect(TokenType::Eof)?;

        Ok(value)
    }

    /// Evaluates the longest expression at the start of the input.
    ///
    /// Returns the value together with the first token that was not consumed,
    /// which is [`TokenValue::Eof`] if the expression spans the whole input.
    #[instrument(level = "trace", skip(self), ret)]
    pub fn evaluate_prefix(mut self) -> Result<(i32, Token<'buf>), EvalError<'buf>> {
        let value = self.parse_expr()?;

        Ok((value, self.token))
    }

    #[instrument(level = "trace", skip(self), ret)]
    fn parse_expr(&mut self) -> Result<i32, EvalError<'buf>> {
        self.parse_expr_addsub()
    }

    #[inline(always)]
    fn parse_bin_op_lassoc<D>(
        &mut self,
        matcher: impl Matcher + Copy,
        mut descend: D,
    ) -> Result<i32, EvalError<'buf>>
    where
        D: FnMut(&mut Self) -> Result<i32, EvalError<'buf>>,
    {
        let start = self.token.span.start;
        let mut lhs = descend(&mut *self)?;

        while let Some(token) = self.try_consume(matcher) {
            let Some(op) = try_match!(token.value, TokenValue::Other(c) => c)
                .and_then(|c| BinOpKind::try_from(c).ok())
            else {
                unreachable!("the matcher only accepts binary operators");
            };

            let rhs = descend(&mut *self)?;

            lhs = op.apply(lhs, rhs).map_err(|e| match e {
                ArithError::DivisionByZero => EvalError::DivisionByZero {
                    span: Span {
                        start,
                        end: self.prev_end,
                    },
                },
            })?;

            trace!(%op, lhs, rhs, "folded");
        }

        Ok(lhs)
    }

    #[instrument(level = "trace", skip(self), ret)]
    fn parse_expr_addsub(&mut self) -> Result<i32, EvalError<'buf>> {
        self.parse_bin_op_lassoc(&[b'+', b'-'], Self::parse_expr_muldiv)
    }

    #[instrument(level = "trace", skip(self), ret)]
    fn parse_expr_muldiv(&mut self) -> Result<i32, EvalError<'buf>> {
        self.parse_bin_op_lassoc(&[b'*', b'/'], Self::parse_expr_unary)
    }

    #[instrument(level = "trace", skip(self), ret)]
    fn parse_expr_unary(&mut self) -> Result<i32, EvalError<'buf>> {
        match self.try_consume(UnOpKind::Negate.byte()) {
            Some(_) => Ok(UnOpKind::Negate.apply(self.parse_expr_primary()?)),
            None => self.parse_expr_primary(),
        }
    }

    #[instrument(level = "trace", skip(self), ret)]
    fn parse_expr_primary(&mut self) -> Result<i32, EvalError<'buf>> {
        select!(self: {
            TokenType::Uint => self.parse_uint_lit(),
            b'(' => self.bounded()?.parse_paren(),
            _ => @error,
        })
    }

    #[instrument(level = "trace", skip(self), ret)]
    fn parse_paren(&mut self) -> Result<i32, EvalError<'buf>> {
        self.expect(b'(')?;
        let value = self.parse_expr()?;
        self.expect(b')')?;

        Ok(value)
    }

    #[instrument(level = "trace", skip(self), ret)]
    fn parse_uint_lit(&mut self) -> Result<i32, EvalError<'buf>> {
        match self.expect(TokenType::Uint)?.value {
            TokenValue::Uint(value) => Ok(arith::literal_value(value)),
            _ => unreachable!("expect only returns matching tokens"),
        }
    }
}
