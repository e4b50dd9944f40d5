//! Arbitrary-precision integer calculator.
//!
//! `expression` evaluates `operand operator operand` text, `editor` applies
//! keypad input to the display, and `ui` draws the calculator screen.

pub mod editor;
pub mod expression;
pub mod ui;

pub use editor::{Calculator, CalculatorError, Evaluation};
pub use expression::{evaluate, Expression, ExpressionError, Operator};
pub use ui::{CalculatorTui, CalculatorCommand};
