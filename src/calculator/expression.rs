//! Three-slot integer expressions: `operand operator operand`.
//!
//! Tokens are separated by single spaces. Operands are arbitrary-precision
//! integers, so results never overflow.

use num_bigint::{BigInt, Sign};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Token separator used by both the editor and the evaluator.
pub const SEPARATOR: char = ' ';

/// One of the five supported binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
}

impl Operator {
    pub const ALL: [Operator; 5] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
        Operator::Remainder,
    ];

    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
            Self::Remainder => '%',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    /// Applies the operator. `/` and `%` truncate toward zero.
    pub fn apply(self, lhs: &BigInt, rhs: &BigInt) -> Result<BigInt, ExpressionError> {
        if matches!(self, Self::Divide | Self::Remainder) && rhs.sign() == Sign::NoSign {
            return Err(ExpressionError::DivisionByZero);
        }

        Ok(match self {
            Self::Add => lhs + rhs,
            Self::Subtract => lhs - rhs,
            Self::Multiply => lhs * rhs,
            Self::Divide => lhs / rhs,
            Self::Remainder => lhs % rhs,
        })
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Reasons a piece of text is not an evaluable expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    #[error("expected 3 tokens, found {0}")]
    WrongShape(usize),
    #[error("'{0}' is not an integer")]
    InvalidOperand(String),
    #[error("'{0}' is not an operator")]
    UnknownOperator(String),
    #[error("division by zero")]
    DivisionByZero,
}

/// Returns true if `token` is an optionally signed run of ASCII digits.
pub fn is_integer(token: &str) -> bool {
    let digits = token
        .strip_prefix(['-', '+'])
        .unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn parse_operand(token: &str) -> Result<BigInt, ExpressionError> {
    if !is_integer(token) {
        return Err(ExpressionError::InvalidOperand(token.to_string()));
    }
    BigInt::from_str(token).map_err(|_| ExpressionError::InvalidOperand(token.to_string()))
}

fn parse_operator(token: &str) -> Result<Operator, ExpressionError> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Operator::from_symbol(symbol),
        _ => None,
    }
    .ok_or_else(|| ExpressionError::UnknownOperator(token.to_string()))
}

/// A well-formed `lhs op rhs` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub lhs: BigInt,
    pub operator: Operator,
    pub rhs: BigInt,
}

impl Expression {
    pub fn evaluate(&self) -> Result<BigInt, ExpressionError> {
        self.operator.apply(&self.lhs, &self.rhs)
    }
}

impl FromStr for Expression {
    type Err = ExpressionError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = text.split(SEPARATOR).collect();
        let [lhs, operator, rhs] = tokens.as_slice() else {
            return Err(ExpressionError::WrongShape(tokens.len()));
        };

        Ok(Expression {
            lhs: parse_operand(lhs)?,
            operator: parse_operator(operator)?,
            rhs: parse_operand(rhs)?,
        })
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.operator, self.rhs)
    }
}

/// Evaluates display text into result text.
///
/// Anything that is not a complete, well-formed expression yields an empty
/// string (nothing to show yet). Division or remainder by zero is the only
/// error and is not meant to be recovered from.
pub fn evaluate(text: &str) -> Result<String, ExpressionError> {
    match text.parse::<Expression>() {
        Ok(expression) => Ok(expression.evaluate()?.to_string()),
        Err(ExpressionError::DivisionByZero) => Err(ExpressionError::DivisionByZero),
        Err(_) => Ok(String::new()),
    }
}
