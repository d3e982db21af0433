//! Broadcasting arithmetic and comparisons over bubbles.
//!
//! `a` is always the bubble that was on top, `b` the one below it.

use crate::bytecode::op::Opcode;
use crate::lang::Bubble;

use super::runtime_error::ErrorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub fn from_opcode(op: Opcode) -> Option<ArithOp> {
        match op {
            Opcode::Add => Some(ArithOp::Add),
            Opcode::Sub => Some(ArithOp::Sub),
            Opcode::Mul => Some(ArithOp::Mul),
            Opcode::Div => Some(ArithOp::Div),
            _ => None,
        }
    }

    fn opcode(self) -> Opcode {
        match self {
            ArithOp::Add => Opcode::Add,
            ArithOp::Sub => Opcode::Sub,
            ArithOp::Mul => Opcode::Mul,
            ArithOp::Div => Opcode::Div,
        }
    }

    fn scalar(self, x: i64, y: i64) -> Result<Bubble, ErrorKind> {
        let op = self.opcode().mnemonic();
        let overflow = || ErrorKind::Overflow { op };

        let result = match self {
            ArithOp::Add => x.checked_add(y).ok_or_else(overflow)?,
            ArithOp::Sub => x.checked_sub(y).ok_or_else(overflow)?,
            ArithOp::Mul => x.checked_mul(y).ok_or_else(overflow)?,
            ArithOp::Div => {
                let (remainder, quotient) = divide(x, y).ok_or(if y == 0 {
                    ErrorKind::DivisionByZero { op }
                } else {
                    ErrorKind::Overflow { op }
                })?;
                return Ok(Bubble::from_ints([remainder, quotient]));
            }
        };
        Ok(Bubble::Scalar(result))
    }
}

/// Truncating division: `(x % y, x / y)` with `y * q + r == x`.
pub fn divide(x: i64, y: i64) -> Option<(i64, i64)> {
    Some((x.checked_rem(y)?, x.checked_div(y)?))
}

/// Applies `op` to `a` and `b`. A scalar is broadcast over a double; two
/// doubles combine elementwise up to the shorter length.
pub fn apply(op: ArithOp, a: &Bubble, b: &Bubble) -> Result<Bubble, ErrorKind> {
    match (a, b) {
        (Bubble::Scalar(x), Bubble::Scalar(y)) => op.scalar(*x, *y),
        (Bubble::Scalar(_), Bubble::Double(ys)) => ys
            .iter()
            .map(|y| apply(op, a, y))
            .collect::<Result<Vec<_>, _>>()
            .map(Bubble::from_vec),
        (Bubble::Double(xs), Bubble::Scalar(_)) => xs
            .iter()
            .map(|x| apply(op, x, b))
            .collect::<Result<Vec<_>, _>>()
            .map(Bubble::from_vec),
        (Bubble::Double(xs), Bubble::Double(ys)) => xs
            .iter()
            .zip(ys)
            .map(|(x, y)| apply(op, x, y))
            .collect::<Result<Vec<_>, _>>()
            .map(Bubble::from_vec),
    }
}

pub fn equal(a: &Bubble, b: &Bubble) -> bool {
    a == b
}

/// Only defined between scalars.
pub fn less(a: &Bubble, b: &Bubble) -> bool {
    match (a, b) {
        (Bubble::Scalar(x), Bubble::Scalar(y)) => x < y,
        _ => false,
    }
}

/// Same direction test as [`less`].
pub fn greater(a: &Bubble, b: &Bubble) -> bool {
    less(a, b)
}

pub fn zero(a: &Bubble) -> bool {
    a.is_zero()
}
