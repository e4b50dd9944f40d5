//! One-shot evaluation from the command line.

use crate::calculator::expression::SEPARATOR;
use crate::calculator::Expression;
use crate::config::RecalcConfig;
use crate::history::HistoryStore;
use anyhow::{anyhow, Context};

/// Evaluates `tokens` joined by single spaces and prints the result.
///
/// With `save`, the expression and result are appended to the calculator history.
///
/// # Errors
/// - If the input is not `operand operator operand`
/// - On division or remainder by zero
/// - If the history database cannot be written
pub fn handle_eval(tokens: &[String], save: bool, config: &RecalcConfig) -> anyhow::Result<()> {
    let text = tokens.join(&SEPARATOR.to_string());
    let result = evaluate_text(&text)?;
    println!("{result}");

    if save {
        let path = config.calculator.history_path()?;
        let id = HistoryStore::open(&path)
            .and_then(|store| store.insert(&text, &result))
            .with_context(|| format!("Failed to save to {}", path.display()))?;
        tracing::info!("Saved history entry {}: {} = {}", id, text, result);
    }

    Ok(())
}

fn evaluate_text(text: &str) -> anyhow::Result<String> {
    let expression: Expression = text
        .parse()
        .map_err(|e| anyhow!("'{text}' is not a valid expression: {e}"))?;
    let value = expression
        .evaluate()
        .map_err(|e| anyhow!("Cannot evaluate '{text}': {e}"))?;
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CalculatorConfig;

    fn config_with_history(path: &std::path::Path) -> RecalcConfig {
        RecalcConfig {
            calculator: CalculatorConfig {
                history_file: path.to_string_lossy().into_owned(),
                ..CalculatorConfig::default()
            },
            ..RecalcConfig::default()
        }
    }

    #[test]
    fn reports_why_input_is_rejected() {
        assert_eq!(evaluate_text("6 * 7").unwrap(), "42");
        assert_eq!(evaluate_text("-7 / 2").unwrap(), "-3");

        let shape = evaluate_text("1 + 2 + 3").unwrap_err().to_string();
        assert!(shape.contains("expected 3 tokens, found 5"), "{shape}");

        let operand = evaluate_text("12a + 3").unwrap_err().to_string();
        assert!(operand.contains("'12a' is not an integer"), "{operand}");

        let zero = evaluate_text("5 % 0").unwrap_err().to_string();
        assert!(zero.contains("division by zero"), "{zero}");
    }

    #[test]
    fn save_appends_to_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.db");
        let config = config_with_history(&path);

        let tokens: Vec<String> = ["100", "-", "1"].iter().map(|s| s.to_string()).collect();
        handle_eval(&tokens, true, &config).unwrap();
        handle_eval(&tokens, false, &config).unwrap();

        let entries = HistoryStore::open(&path).unwrap().get_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].expression, "100 - 1");
        assert_eq!(entries[0].result, "99");
    }

    #[test]
    fn failed_evaluation_is_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.db");
        let config = config_with_history(&path);

        let tokens = vec!["1".to_string(), "/".to_string(), "0".to_string()];
        assert!(handle_eval(&tokens, true, &config).is_err());
        assert!(!path.exists());
    }
}
