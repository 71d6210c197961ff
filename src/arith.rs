//! Operator kinds and the integer semantics they evaluate with.
//!
//! All arithmetic is performed on `i32` and wraps on overflow. Division truncates
//! towards zero; dividing by zero is reported as an error instead.

use std::error::Error;
use std::fmt::{self, Display};

macro_rules! define_op_kind {
    ($name:ident { $( $op:ident => $byte:literal, )+ }) => {
        #[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
        pub enum $name {
            $( $op, )+
        }

        impl $name {
            pub fn byte(self) -> u8 {
                match self {
                    $( Self::$op => $byte, )+
                }
            }
        }

        impl TryFrom<u8> for $name {
            type Error = ();

            fn try_from(byte: u8) -> Result<Self, Self::Error> {
                match byte {
                    $( $byte => Ok(Self::$op), )+
                    _ => Err(()),
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.byte() as char)
            }
        }
    }
}

define_op_kind!(BinOpKind {
    Add => b'+',
    Subtract => b'-',
    Multiply => b'*',
    Divide => b'/',
});

define_op_kind!(UnOpKind {
    Negate => b'-',
});

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ArithError {
    DivisionByZero,
}

impl Display for ArithError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DivisionByZero => write!(f, "attempted to divide by zero"),
        }
    }
}

impl Error for ArithError {}

impl BinOpKind {
    pub fn apply(self, lhs: i32, rhs: i32) -> Result<i32, ArithError> {
        Ok(match self {
            Self::Add => lhs.wrapping_add(rhs),
            Self::Subtract => lhs.wrapping_sub(rhs),
            Self::Multiply => lhs.wrapping_mul(rhs),

            Self::Divide if rhs == 0 => return Err(ArithError::DivisionByZero),
            // i32::MIN / -1 wraps back to i32::MIN
            Self::Divide => lhs.wrapping_div(rhs),
        })
    }
}

impl UnOpKind {
    pub fn apply(self, value: i32) -> i32 {
        match self {
            Self::Negate => value.wrapping_neg(),
        }
    }
}

/// Reinterprets an unsigned literal as a two's complement `i32`.
pub fn literal_value(value: u32) -> i32 {
    value as i32
}
