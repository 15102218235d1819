//! Safe arithmetic evaluation.
//!
//! Input goes through a dedicated tokenizer and parser that only know
//! numbers, `+ - * / % **`, unary signs and parentheses. There is no
//! name lookup, so there is nothing for hostile input to reach.

mod ast;
mod lexer;
mod parser;

pub use ast::{BinaryOp, Expr, UnaryOp};

use crate::error::EvalError;

/// A numeric value: integers stay exact until an operation needs floats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(f) => f,
        }
    }

    fn is_zero(self) -> bool {
        self.as_f64() == 0.0
    }

    fn float(value: f64) -> Result<Self, EvalError> {
        if value.is_nan() {
            Err(EvalError::Undefined)
        } else if value.is_infinite() {
            Err(EvalError::Overflow)
        } else {
            Ok(Number::Float(value))
        }
    }
}

/// Parse and evaluate an arithmetic expression.
pub fn evaluate(input: &str) -> Result<Number, EvalError> {
    let tokens = lexer::tokenize(input)?;
    let expr = parser::parse(&tokens)?;
    eval(&expr)
}

/// Evaluate a parsed expression tree.
pub fn eval(expr: &Expr) -> Result<Number, EvalError> {
    match expr {
        Expr::Number(n) => Ok(*n),
        Expr::Unary { op, operand } => {
            let value = eval(operand)?;
            match op {
                UnaryOp::Plus => Ok(value),
                UnaryOp::Minus => negate(value),
            }
        }
        Expr::Binary { op, left, right } => {
            let lhs = eval(left)?;
            let rhs = eval(right)?;
            apply(*op, lhs, rhs)
        }
    }
}

fn negate(value: Number) -> Result<Number, EvalError> {
    match value {
        Number::Int(n) => n.checked_neg().map(Number::Int).ok_or(EvalError::Overflow),
        Number::Float(f) => Ok(Number::Float(-f)),
    }
}

fn apply(op: BinaryOp, lhs: Number, rhs: Number) -> Result<Number, EvalError> {
    use Number::Int;

    match op {
        BinaryOp::Add => match (lhs, rhs) {
            (Int(a), Int(b)) => a.checked_add(b).map(Int).ok_or(EvalError::Overflow),
            _ => Number::float(lhs.as_f64() + rhs.as_f64()),
        },
        BinaryOp::Sub => match (lhs, rhs) {
            (Int(a), Int(b)) => a.checked_sub(b).map(Int).ok_or(EvalError::Overflow),
            _ => Number::float(lhs.as_f64() - rhs.as_f64()),
        },
        BinaryOp::Mul => match (lhs, rhs) {
            (Int(a), Int(b)) => a.checked_mul(b).map(Int).ok_or(EvalError::Overflow),
            _ => Number::float(lhs.as_f64() * rhs.as_f64()),
        },
        // True division, even for two integers.
        BinaryOp::Div => {
            if rhs.is_zero() {
                return Err(EvalError::DivideByZero);
            }
            Number::float(lhs.as_f64() / rhs.as_f64())
        }
        // Remainder takes the sign of the dividend.
        BinaryOp::Rem => {
            if rhs.is_zero() {
                return Err(EvalError::DivideByZero);
            }
            match (lhs, rhs) {
                (Int(a), Int(b)) => a.checked_rem(b).map(Int).ok_or(EvalError::Overflow),
                _ => Number::float(lhs.as_f64() % rhs.as_f64()),
            }
        }
        BinaryOp::Pow => {
            if lhs.is_zero() && rhs.as_f64() < 0.0 {
                return Err(EvalError::DivideByZero);
            }
            match (lhs, rhs) {
                // Bases whose powers never grow are exact for any exponent.
                (Int(0), Int(b)) if b > 0 => Ok(Int(0)),
                (Int(1), Int(b)) if b >= 0 => Ok(Int(1)),
                (Int(-1), Int(b)) if b >= 0 => Ok(Int(if b % 2 == 0 { 1 } else { -1 })),
                (Int(a), Int(b)) if b >= 0 => {
                    let exp = u32::try_from(b).map_err(|_| EvalError::Overflow)?;
                    a.checked_pow(exp).map(Int).ok_or(EvalError::Overflow)
                }
                _ => Number::float(lhs.as_f64().powf(rhs.as_f64())),
            }
        }
    }
}

/// Below this magnitude `{:?}` prints floats positionally; at or above it
/// switches to exponent form.
const POSITIONAL_LIMIT: f64 = 1e16;

/// Render a result: integral values without a decimal point, everything
/// else in shortest round-trip form.
pub fn format_number(value: Number) -> String {
    match value {
        Number::Int(n) => n.to_string(),
        Number::Float(f) if f.fract() == 0.0 && f.abs() < POSITIONAL_LIMIT => {
            format!("{}", f as i64)
        }
        Number::Float(f) => format!("{:?}", f),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn calc(input: &str) -> String {
        format_number(evaluate(input).unwrap())
    }

    #[test]
    fn test_basic_arithmetic() {
        assert_eq!(calc("2 + 2"), "4");
        assert_eq!(calc("10 * 5"), "50");
        assert_eq!(calc("100 / 4"), "25");
        assert_eq!(calc("2+2*3"), "8");
        assert_eq!(calc("12.5 * 3 + 2"), "39.5");
    }

    #[test]
    fn test_known_values() {
        assert_eq!(evaluate("7 % 3"), Ok(Number::Int(1)));
        assert_eq!(evaluate("2**10"), Ok(Number::Int(1024)));
        assert_eq!(evaluate("1/0"), Err(EvalError::DivideByZero));
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(calc("(2 + 3) * 4"), "20");
        assert_eq!(calc("-(2 + 3)"), "-5");
    }

    #[test]
    fn test_true_division() {
        assert_eq!(calc("7 / 2"), "3.5");
        assert_eq!(calc("1 / 3"), "0.3333333333333333");
        assert_eq!(evaluate("4 / 2"), Ok(Number::Float(2.0)));
        assert_eq!(calc("4 / 2"), "2");
    }

    #[test]
    fn test_remainder_sign_follows_dividend() {
        assert_eq!(calc("-7 % 3"), "-1");
        assert_eq!(calc("7 % -3"), "1");
        assert_eq!(calc("7.5 % 2"), "1.5");
        assert_eq!(evaluate("5 % 0"), Err(EvalError::DivideByZero));
        assert_eq!(evaluate("5 % 0.0"), Err(EvalError::DivideByZero));
    }

    #[test]
    fn test_power_semantics() {
        assert_eq!(calc("-2**2"), "-4");
        assert_eq!(calc("(-2)**2"), "4");
        assert_eq!(calc("2**-1"), "0.5");
        assert_eq!(calc("2**3**2"), "512");
        assert_eq!(calc("4**0.5"), "2");
        assert_eq!(calc("-4.5**2"), "-20.25");
        assert_eq!(evaluate("0**-1"), Err(EvalError::DivideByZero));
        assert_eq!(evaluate("(-8)**0.5"), Err(EvalError::Undefined));
    }

    #[test]
    fn test_overflow() {
        assert_eq!(evaluate("2**64"), Err(EvalError::Overflow));
        assert_eq!(evaluate("9223372036854775807 + 1"), Err(EvalError::Overflow));
        assert_eq!(evaluate("10.0**400"), Err(EvalError::Overflow));
        assert_eq!(evaluate("2**99999999999"), Err(EvalError::Overflow));
    }

    #[test]
    fn test_power_of_unit_bases() {
        assert_eq!(evaluate("1**99999999999"), Ok(Number::Int(1)));
        assert_eq!(evaluate("0**99999999999"), Ok(Number::Int(0)));
        assert_eq!(evaluate("(-1)**99999999999"), Ok(Number::Int(-1)));
        assert_eq!(evaluate("(-1)**99999999998"), Ok(Number::Int(1)));
        assert_eq!(evaluate("0**0"), Ok(Number::Int(1)));
        assert_eq!(evaluate("0**-1"), Err(EvalError::DivideByZero));
    }

    #[test]
    fn test_unary_signs() {
        assert_eq!(calc("+5"), "5");
        assert_eq!(calc("--5"), "5");
        assert_eq!(calc("3 - -2"), "5");
    }

    #[test]
    fn test_disallowed_input() {
        for input in [
            "__import__('os')",
            "[1,2,3]",
            "a+1",
            "abs(-1)",
            "(1).real",
            "1 == 1",
            "1 and 2",
            "'2' * 3",
            "{1: 2}",
            "7 // 2",
        ] {
            assert_err!(evaluate(input), "{:?} must not evaluate", input);
        }
    }

    #[test]
    fn test_invalid_expression() {
        assert_err!(evaluate("2 +"));
        assert_err!(evaluate(""));
        assert_err!(evaluate("   "));
    }

    #[test]
    fn test_idempotent() {
        let first = assert_ok!(evaluate("2+2"));
        let second = assert_ok!(evaluate("2+2"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(Number::Int(-12)), "-12");
        assert_eq!(format_number(Number::Float(3.0)), "3");
        assert_eq!(format_number(Number::Float(0.1 + 0.2)), "0.30000000000000004");
        assert_eq!(format_number(Number::Float(1e20)), "1e20");
        assert_eq!(format_number(Number::Float(1e16)), "1e16");
    }

    #[test]
    fn test_large_integral_floats_have_no_decimal_point() {
        assert_eq!(calc("10.0**15"), "1000000000000000");
        assert_eq!(calc("2.0**50"), "1125899906842624");
        assert_eq!(calc("1e15"), "1000000000000000");
        assert_eq!(calc("-9999999999999998.0"), "-9999999999999998");
    }
}
