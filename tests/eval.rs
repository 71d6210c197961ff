mod common;

use insta::assert_ron_snapshot;
use paste::paste;
use pretty_assertions::assert_eq;

use rdcalc::evaluate;
use rdcalc::parse::token::{TokenType, TokenValue};
use rdcalc::parse::{Cursor, EvalError, Lexer, Parser, RECURSION_LIMIT};
use rdcalc::position::HasSpan;

use self::common::{evaluate_prefix, nested, parser};

/// Checks the evaluator against the value Rust computes for the same expression.
macro_rules! assert_expr {
    ($expr:expr) => {
        assert_eq!(evaluate(stringify!($expr)), Ok($expr), stringify!($expr));
    };
}

macro_rules! run_eval_test {
    { $( $name:ident : $code:literal => $expected:expr ),+ $(,)? } => {
        $(
            paste! {
                #[test]
                fn [< test_ $name >]() {
                    assert_eq!(evaluate($code), Ok($expected), $code);
                }
            }
        )+
    };
}

run_eval_test! {
    add: "1 + 2" => 3,
    paren_add: "(1 + 2) + 3" => 6,
    literal: "3" => 3,
    paren_literal: "(4)" => 4,
    sub_left_assoc: "1 - 2 - 3" => -4,
    mul_before_add: "2 * 3 + 4 * 5" => 26,
    unary_in_add: "2 + -3" => -1,
    paren_in_mul: "2 * (3 + 4) * 5" => 70,
    div: "4 / 2" => 2,
    precedence: "2 + 3 * 4" => 14,
    div_left_assoc: "100 / 10 / 5" => 2,
    div_truncates: "7 / 2" => 3,
    div_truncates_towards_zero: "-7 / 2" => -3,
    sub_negative: "2 - -3" => 5,
    negate_paren: "-(2 + 3)" => -5,
    negate_binds_tighter_than_mul: "-2 * 3" => -6,
    nested_parens: "((((7))))" => 7,
    no_whitespace: "2*(3+4)*5" => 70,
    leading_zeros: "007 + 0" => 7,
}

macro_rules! run_snapshot_test {
    { $( $name:ident : $code:expr ),+ $(,)? } => {
        $(
            paste! {
                #[test]
                fn [< test_snapshot_ $name >]() {
                    let code = String::from($code);
                    let result = evaluate(&code);

                    insta::with_settings!({
                        description => code.as_str(),
                    }, {
                        assert_ron_snapshot!(result);
                    });
                }
            }
        )+
    };
}

run_snapshot_test! {
    sum: "1 + 2 * 3",
    wrapping_sum: "2147483647 + 1",
    empty: "",
    unclosed_paren: "(1",
    trailing_literal: "1 2",
    division_by_zero: "1 / (2-2)",
    too_deep: nested(RECURSION_LIMIT + 1, "1"),
}

run_eval_test! {
    add_wraps: "2147483647 + 1" => i32::MIN,
    sub_wraps: "0 - 2147483647 - 2" => i32::MAX,
    mul_wraps: "65536 * 65536" => 0,
    literal_reinterpreted: "4294967295" => -1,
    literal_accumulation_wraps: "4294967296 + 1" => 1,
    negate_min_wraps: "-2147483648" => i32::MIN,
    div_min_by_minus_one_wraps: "-2147483648 / -1" => i32::MIN,
}

#[test]
fn test_matches_native_arithmetic() {
    assert_expr!(1 + 2);
    assert_expr!((1 + 2) + 3);
    assert_expr!(3);
    assert_expr!((4));
    assert_expr!(1 - 2 - 3);
    assert_expr!(2 * 3 + 4 * 5);
    assert_expr!(2 + -3);
    assert_expr!(2 * (3 + 4) * 5);
    assert_expr!(4 / 2);
    assert_expr!(17 - 4 * 3 / 2 + (8 - 10) * -3);
    assert_expr!(-9 / 4 * 4 + 9 - -2);
    assert_expr!(1000 * 1000 / 7 / 11 - 12345);
}

const WELL_FORMED: &[&str] = &[
    "1+2",
    "(1+2)+3",
    "1-2-3",
    "2*3+4*5",
    "2+-3",
    "2*(3+4)*5",
    "4/2",
    "9/(1+2)*-4",
    "-(8-9)*(7/3)",
];

#[test]
fn test_parens_are_transparent() {
    for code in WELL_FORMED {
        let wrapped = format!("({})", code);

        assert_eq!(evaluate(&wrapped), evaluate(code), "{}", code);
    }
}

#[test]
fn test_whitespace_is_insignificant() {
    for code in WELL_FORMED {
        for ws in [" ", "\t", "\n", "\r\n", "  \x0b\x0c "] {
            let spaced = code
                .chars()
                .map(String::from)
                .collect::<Vec<_>>()
                .join(ws);
            let padded = format!("{ws}{spaced}{ws}");

            assert_eq!(evaluate(&padded), evaluate(code), "{:?}", padded);
        }
    }
}

#[test]
fn test_left_associativity() {
    for (a, b, c) in [(1, 2, 3), (10, 4, 3), (0, 7, 9), (100, 50, 25)] {
        let code = format!("{a} - {b} - {c}");
        assert_eq!(evaluate(&code), Ok((a - b) - c));

        let code = format!("{a} / {b} / {c}");
        assert_eq!(evaluate(&code), Ok((a / b) / c));
    }
}

fn unexpected(code: &str) -> (Vec<TokenType>, TokenType, usize) {
    match evaluate(code) {
        Err(EvalError::UnexpectedToken { expected, actual }) => {
            (expected.into_owned(), actual.ty(), actual.span.start.byte)
        }

        other => panic!("{:?}: expected a syntax error, got {:?}", code, other),
    }
}

const LITERAL_OR_PAREN: &[TokenType] = &[TokenType::Uint, TokenType::Other(b'(')];

#[test]
fn test_empty_input() {
    assert_eq!(unexpected(""), (LITERAL_OR_PAREN.to_vec(), TokenType::Eof, 0));
    assert_eq!(unexpected("   "), (LITERAL_OR_PAREN.to_vec(), TokenType::Eof, 3));
}

#[test]
fn test_unclosed_paren() {
    assert_eq!(unexpected("("), (LITERAL_OR_PAREN.to_vec(), TokenType::Eof, 1));
    assert_eq!(
        unexpected("(1"),
        (vec![TokenType::Other(b')')], TokenType::Eof, 2)
    );
}

#[test]
fn test_missing_operand() {
    assert_eq!(unexpected("1 +"), (LITERAL_OR_PAREN.to_vec(), TokenType::Eof, 3));
    assert_eq!(
        unexpected("* 2"),
        (LITERAL_OR_PAREN.to_vec(), TokenType::Other(b'*'), 0)
    );
}

#[test]
fn test_double_negation_is_rejected() {
    assert_eq!(
        unexpected("--3"),
        (LITERAL_OR_PAREN.to_vec(), TokenType::Other(b'-'), 1)
    );
}

#[test]
fn test_identifiers_are_not_operands() {
    assert_eq!(unexpected("a + 1"), (LITERAL_OR_PAREN.to_vec(), TokenType::Ident, 0));
}

#[test]
fn test_trailing_input_is_rejected() {
    assert_eq!(
        unexpected("1 2"),
        (vec![TokenType::Eof], TokenType::Uint, 2)
    );
    assert_eq!(
        unexpected("(1 + 2))"),
        (vec![TokenType::Eof], TokenType::Other(b')'), 7)
    );
    assert_eq!(
        unexpected("1 $ 2"),
        (vec![TokenType::Eof], TokenType::Other(b'$'), 2)
    );
}

#[test]
fn test_evaluate_prefix_stops_at_trailing_input() {
    let (value, rest) = evaluate_prefix("1 + 2 $ 4").unwrap();

    assert_eq!(value, 3);
    assert_eq!(rest.value, TokenValue::Other(b'$'));
    assert_eq!(rest.span.start.byte, 6);

    let (value, rest) = evaluate_prefix("2 * 3").unwrap();

    assert_eq!(value, 6);
    assert!(rest.is_eof());
}

#[test]
fn test_evaluate_prefix_still_reports_syntax_errors() {
    assert!(matches!(
        evaluate_prefix("(1 + 2"),
        Err(EvalError::UnexpectedToken { .. })
    ));
}

#[test]
fn test_input_ends_at_nul() {
    assert_eq!(evaluate("1 + 2\0 garbage"), Ok(3));
}

#[test]
fn test_division_by_zero() {
    let Err(EvalError::DivisionByZero { span }) = evaluate("7 / 0") else {
        panic!("expected a division by zero");
    };

    assert_eq!((span.start.byte, span.end.byte), (0, 5));

    let Err(e @ EvalError::DivisionByZero { .. }) = evaluate("1 + 8 / (2 - 2)") else {
        panic!("expected a division by zero");
    };

    assert_eq!((e.span().start.byte, e.span().end.byte), (4, 15));
}

#[test]
fn test_division_by_zero_inside_parens() {
    assert!(matches!(
        evaluate("2 * (5 / (3 - 3)) + 1"),
        Err(EvalError::DivisionByZero { .. })
    ));
}

#[test]
fn test_error_messages() {
    let message = |code| evaluate(code).unwrap_err().to_string();

    assert_eq!(
        message(""),
        "encountered an unexpected token: end of input (expected an integer literal or '(')"
    );
    assert_eq!(
        message("(1"),
        "encountered an unexpected token: end of input (expected ')')"
    );
    assert_eq!(
        message("1 2"),
        "encountered an unexpected token: integer literal 2 (expected end of input)"
    );
    assert_eq!(
        message("x"),
        "encountered an unexpected token: identifier `x` (expected an integer literal or '(')"
    );
    assert_eq!(message("1 / 0"), "attempted to divide by zero");
}

#[test]
fn test_recursion_limit() {
    let lexer = |code: &'static str| Lexer::new(Cursor::from_bytes(code.as_bytes()));

    assert_eq!(Parser::with_recursion_limit(lexer("(((1)))"), 3).evaluate(), Ok(1));
    assert_eq!(
        Parser::with_recursion_limit(lexer("(1) + (2) * -(3)"), 1).evaluate(),
        Ok(-5)
    );

    let Err(EvalError::RecursionLimit(span)) =
        Parser::with_recursion_limit(lexer("1 + ((((1))))"), 3).evaluate()
    else {
        panic!("expected the recursion limit to be hit");
    };

    // the first parenthesis past the limit
    assert_eq!((span.start.byte, span.end.byte), (7, 8));
}

#[test]
fn test_deep_nesting_hits_the_limit() {
    let code = nested(5000, "1");

    assert!(matches!(
        parser(&code).evaluate(),
        Err(EvalError::RecursionLimit(_))
    ));
}

#[test]
fn test_deepest_nesting_fits_a_default_thread() {
    // spawned threads get the default stack size, unlike the main thread
    let result = std::thread::spawn(|| {
        let code = nested(RECURSION_LIMIT, "1 + -2 * 3");

        parser(&code).evaluate().ok()
    })
    .join()
    .unwrap();

    assert_eq!(result, Some(-5));
}

#[test]
fn test_limit_applies_to_nesting_not_length() {
    let code = (0..1000).map(|i| format!("({i})")).collect::<Vec<_>>().join(" + ");

    assert_eq!(evaluate(&code), Ok((0..1000).sum::<i32>()));
}

#[test]
fn test_parsers_are_independent() {
    let mut a = Vec::new();
    let mut b = Vec::new();

    for i in 0..4 {
        a.push(format!("{i} * 2"));
        b.push(format!("({i} + 1)"));
    }

    let handles = a
        .into_iter()
        .zip(b)
        .map(|(a, b)| std::thread::spawn(move || (evaluate(&a).ok(), evaluate(&b).ok())))
        .collect::<Vec<_>>();

    for (i, handle) in handles.into_iter().enumerate() {
        let i = i as i32;

        assert_eq!(handle.join().unwrap(), (Some(i * 2), Some(i + 1)));
    }
}
