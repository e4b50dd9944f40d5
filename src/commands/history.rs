//! Calculator history listing from the command line.

use crate::config::RecalcConfig;
use crate::history::{HistoryEntry, HistoryStore};
use cliclack::{confirm, outro};
use console::style;

/// Prints the history newest first, or clears it with `clear`.
///
/// Clearing asks for confirmation unless `yes` is set.
///
/// # Errors
/// - If the history database cannot be opened or queried
/// - If the confirmation prompt fails
pub fn handle_history(clear: bool, yes: bool, config: &RecalcConfig) -> anyhow::Result<()> {
    let path = config.calculator.history_path()?;
    let store = HistoryStore::open(&path)?;

    if clear {
        let confirmed = yes
            || confirm("Delete every calculator history entry?")
                .initial_value(false)
                .interact()?;
        if confirmed {
            let removed = store.delete_all()?;
            tracing::info!("Cleared {} history entries", removed);
            outro(format!("Removed {removed} entries"))?;
        }
        return Ok(());
    }

    let entries = store.get_all()?;
    if entries.is_empty() {
        println!("No calculator history yet.");
        return Ok(());
    }

    for line in format_entries(&entries) {
        println!("{line}");
    }
    Ok(())
}

/// One line per entry, newest first.
fn format_entries(entries: &[HistoryEntry]) -> Vec<String> {
    entries
        .iter()
        .rev()
        .map(|entry| {
            format!(
                "{}  {} = {}",
                style(entry.created_at.format("%Y-%m-%d %H:%M")).dim(),
                entry.expression,
                style(&entry.result).bold()
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    #[test]
    fn lists_newest_first() {
        console::set_colors_enabled(false);
        let at = Local.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap();
        let entries = vec![
            HistoryEntry {
                id: 1,
                expression: "1 + 1".into(),
                result: "2".into(),
                created_at: at,
            },
            HistoryEntry {
                id: 2,
                expression: "6 * 7".into(),
                result: "42".into(),
                created_at: at,
            },
        ];

        assert_eq!(
            format_entries(&entries),
            ["2026-10-19 09:30  6 * 7 = 42", "2026-10-19 09:30  1 + 1 = 2"]
        );
    }
}
