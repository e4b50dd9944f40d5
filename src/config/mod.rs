//! Configuration management for recalc.
//!
//! Loads `recalc.toml` from the user's config directory. The recorder and the
//! calculator each get their own section; logging has a third.

pub mod file;

pub use file::{CalculatorConfig, RecalcConfig, RecorderConfig};
