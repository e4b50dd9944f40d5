//! Key-by-key editing of the calculator display.
//!
//! The display holds at most one operator. Rejected keys leave every field
//! untouched and report a [`CalculatorError`] that the screen shows briefly.

use super::expression::{self, ExpressionError, Operator, SEPARATOR};
use thiserror::Error;

/// Longest operand, in characters, that can be typed.
pub const MAX_TOKEN_LEN: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalculatorError {
    #[error("Only 15 digits can be used.")]
    TooManyDigits,
    #[error("0 cannot come first.")]
    LeadingZero,
    #[error("Only one operator can be used.")]
    DuplicateOperator,
    #[error("The expression is not complete yet.")]
    Incomplete,
    #[error("An error occurred.")]
    InvalidNumber,
    #[error("Division by zero.")]
    DivisionByZero,
}

impl CalculatorError {
    /// Transient errors are shown to the user and otherwise ignored; the rest end the session.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::DivisionByZero)
    }
}

impl From<ExpressionError> for CalculatorError {
    fn from(err: ExpressionError) -> Self {
        match err {
            ExpressionError::DivisionByZero => Self::DivisionByZero,
            ExpressionError::WrongShape(_) => Self::Incomplete,
            ExpressionError::InvalidOperand(_) | ExpressionError::UnknownOperator(_) => {
                Self::InvalidNumber
            }
        }
    }
}

/// An evaluated expression ready to be written to history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub expression: String,
    pub result: String,
}

/// Display state of the calculator.
#[derive(Debug, Default, Clone)]
pub struct Calculator {
    expression: String,
    result: String,
    /// The last thing typed was an operator
    is_operator: bool,
    /// The current expression already contains an operator
    has_operator: bool,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Live result of the expression typed so far; empty until it is complete.
    pub fn result(&self) -> &str {
        &self.result
    }

    pub fn has_operator(&self) -> bool {
        self.has_operator
    }

    pub fn is_operator(&self) -> bool {
        self.is_operator
    }

    /// Appends one decimal digit to the current operand.
    pub fn push_digit(&mut self, digit: char) -> Result<(), CalculatorError> {
        debug_assert!(digit.is_ascii_digit());

        let current_token = if self.is_operator {
            ""
        } else {
            self.expression.rsplit(SEPARATOR).next().unwrap_or("")
        };

        if current_token.chars().count() >= MAX_TOKEN_LEN {
            return Err(CalculatorError::TooManyDigits);
        }
        if current_token.is_empty() && digit == '0' {
            return Err(CalculatorError::LeadingZero);
        }

        let mut expression = self.expression.clone();
        if self.is_operator {
            expression.push(SEPARATOR);
        }
        expression.push(digit);

        let result = expression::evaluate(&expression)?;

        self.expression = expression;
        self.result = result;
        self.is_operator = false;
        Ok(())
    }

    /// Adds, or replaces, the operator between the two operands.
    pub fn push_operator(&mut self, operator: Operator) -> Result<(), CalculatorError> {
        if self.expression.is_empty() {
            return Ok(());
        }

        if self.is_operator {
            self.expression.pop();
            self.expression.push(operator.symbol());
        } else if self.has_operator {
            return Err(CalculatorError::DuplicateOperator);
        } else {
            self.expression.push(SEPARATOR);
            self.expression.push(operator.symbol());
        }

        self.is_operator = true;
        self.has_operator = true;
        Ok(())
    }

    /// Finalizes the expression (the `=` key).
    ///
    /// Returns `Ok(None)` when there is nothing to evaluate. On success the
    /// display is replaced by the result and the returned [`Evaluation`]
    /// should be recorded in history.
    pub fn evaluate(&mut self) -> Result<Option<Evaluation>, CalculatorError> {
        let tokens: Vec<&str> = self.expression.split(SEPARATOR).collect();

        if self.expression.is_empty() || tokens.len() == 1 {
            return Ok(None);
        }
        if tokens.len() != 3 {
            return Err(CalculatorError::Incomplete);
        }
        if !expression::is_integer(tokens[0]) || !expression::is_integer(tokens[2]) {
            return Err(CalculatorError::InvalidNumber);
        }

        let result = expression::evaluate(&self.expression)?;
        let evaluation = Evaluation {
            expression: std::mem::replace(&mut self.expression, result.clone()),
            result,
        };

        self.result.clear();
        self.is_operator = false;
        self.has_operator = false;
        Ok(Some(evaluation))
    }

    /// Empties the display. History is not affected.
    pub fn clear(&mut self) {
        self.expression.clear();
        self.result.clear();
        self.is_operator = false;
        self.has_operator = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_keys(calculator: &mut Calculator, keys: &str) -> Result<(), CalculatorError> {
        for key in keys.chars() {
            match Operator::from_symbol(key) {
                Some(operator) => calculator.push_operator(operator)?,
                None => calculator.push_digit(key)?,
            }
        }
        Ok(())
    }

    #[test]
    fn builds_expression_and_live_result() {
        let mut calculator = Calculator::new();
        type_keys(&mut calculator, "12+30").unwrap();

        assert_eq!(calculator.expression(), "12 + 30");
        assert_eq!(calculator.result(), "42");
    }

    #[test]
    fn leading_zero_is_rejected_only_on_empty_operand() {
        let mut calculator = Calculator::new();
        assert_eq!(calculator.push_digit('0'), Err(CalculatorError::LeadingZero));
        assert_eq!(calculator.expression(), "");

        type_keys(&mut calculator, "100").unwrap();
        assert_eq!(calculator.expression(), "100");

        calculator.push_operator(Operator::Add).unwrap();
        assert_eq!(calculator.push_digit('0'), Err(CalculatorError::LeadingZero));
        assert_eq!(calculator.expression(), "100 +");
        assert!(calculator.is_operator());
    }

    #[test]
    fn operand_stops_at_fifteen_characters() {
        let mut calculator = Calculator::new();
        type_keys(&mut calculator, "999999999999999").unwrap();

        assert_eq!(calculator.push_digit('9'), Err(CalculatorError::TooManyDigits));
        assert_eq!(calculator.expression(), "999999999999999");

        type_keys(&mut calculator, "+1").unwrap();
        assert_eq!(calculator.result(), "1000000000000000");
    }

    #[test]
    fn second_operator_in_a_row_replaces_the_first() {
        let mut calculator = Calculator::new();
        type_keys(&mut calculator, "8+").unwrap();
        calculator.push_operator(Operator::Multiply).unwrap();

        assert_eq!(calculator.expression(), "8 *");
        assert!(calculator.has_operator());

        type_keys(&mut calculator, "3").unwrap();
        assert_eq!(calculator.result(), "24");
    }

    #[test]
    fn operator_after_complete_expression_is_rejected() {
        let mut calculator = Calculator::new();
        type_keys(&mut calculator, "8+3").unwrap();

        assert_eq!(
            calculator.push_operator(Operator::Subtract),
            Err(CalculatorError::DuplicateOperator)
        );
        assert_eq!(calculator.expression(), "8 + 3");
    }

    #[test]
    fn operator_on_empty_display_is_ignored() {
        let mut calculator = Calculator::new();
        calculator.push_operator(Operator::Divide).unwrap();
        assert_eq!(calculator.expression(), "");
        assert!(!calculator.has_operator());
    }

    #[test]
    fn incomplete_expression_is_not_evaluated() {
        let mut calculator = Calculator::new();
        type_keys(&mut calculator, "12+").unwrap();

        assert_eq!(calculator.evaluate(), Err(CalculatorError::Incomplete));
        assert_eq!(calculator.expression(), "12 +");
        assert!(calculator.has_operator());
    }

    #[test]
    fn single_operand_evaluates_to_nothing() {
        let mut calculator = Calculator::new();
        assert_eq!(calculator.evaluate(), Ok(None));
        type_keys(&mut calculator, "12").unwrap();
        assert_eq!(calculator.evaluate(), Ok(None));
        assert_eq!(calculator.expression(), "12");
    }

    #[test]
    fn evaluation_replaces_display_with_result() {
        let mut calculator = Calculator::new();
        type_keys(&mut calculator, "7-10").unwrap();

        let evaluation = calculator.evaluate().unwrap().unwrap();

        assert_eq!(
            evaluation,
            Evaluation {
                expression: "7 - 10".to_string(),
                result: "-3".to_string(),
            }
        );
        assert_eq!(calculator.expression(), "-3");
        assert_eq!(calculator.result(), "");
        assert!(!calculator.has_operator());
        assert!(!calculator.is_operator());
    }

    #[test]
    fn result_can_be_extended_and_reused() {
        let mut calculator = Calculator::new();
        type_keys(&mut calculator, "7-10").unwrap();
        calculator.evaluate().unwrap();

        type_keys(&mut calculator, "5*2").unwrap();
        assert_eq!(calculator.expression(), "-35 * 2");
        assert_eq!(calculator.result(), "-70");
    }

    #[test]
    fn clear_resets_display_and_flags() {
        let mut calculator = Calculator::new();
        type_keys(&mut calculator, "4%").unwrap();
        calculator.clear();

        assert_eq!(calculator.expression(), "");
        assert_eq!(calculator.result(), "");
        assert!(!calculator.has_operator());
        assert!(!calculator.is_operator());

        calculator.push_operator(Operator::Add).unwrap();
        assert_eq!(calculator.expression(), "");
    }

    #[test]
    fn only_division_by_zero_is_fatal() {
        assert!(CalculatorError::DuplicateOperator.is_transient());
        assert!(CalculatorError::Incomplete.is_transient());
        assert!(!CalculatorError::DivisionByZero.is_transient());
    }
}
