//! Configuration file editor command.

use crate::{paths, setup};
use std::path::Path;
use std::process::Command;

/// Opens the recalc configuration file in the user's preferred editor,
/// writing the default template first if the file does not exist yet.
///
/// # Errors
/// - If the config file cannot be created
/// - If no editor can be found or executed
pub fn handle_config() -> anyhow::Result<()> {
    let config_path = paths::config_file()?;
    setup::ensure_config(&config_path)?;
    open_in_editor(&config_path)
}

/// Opens `path` in `$EDITOR`, falling back to nano and then vi.
///
/// # Errors
/// - If no editor is available, or the editor exits unsuccessfully
pub fn open_in_editor(path: &Path) -> anyhow::Result<()> {
    tracing::info!("Opening config file: {}", path.display());

    let editor = find_editor()?;
    tracing::debug!("Using editor: {}", editor);

    let status = Command::new(&editor).arg(path).status().map_err(|e| {
        anyhow::anyhow!(
            "Failed to open editor '{editor}': {e}. Make sure the editor is installed and accessible."
        )
    })?;

    if !status.success() {
        return Err(anyhow::anyhow!(
            "Editor exited with error code: {}",
            status.code().unwrap_or(-1)
        ));
    }

    tracing::info!("Config file edited successfully");
    Ok(())
}

fn find_editor() -> anyhow::Result<String> {
    if let Some(editor) = editor_from_env(std::env::var("EDITOR").ok()) {
        return Ok(editor);
    }

    for editor in ["nano", "vi"] {
        if is_editor_available(editor) {
            return Ok(editor.to_string());
        }
    }

    Err(anyhow::anyhow!(
        "No editor found. Please set the $EDITOR environment variable."
    ))
}

fn editor_from_env(value: Option<String>) -> Option<String> {
    value.filter(|editor| !editor.trim().is_empty())
}

fn is_editor_available(editor: &str) -> bool {
    Command::new("which")
        .arg(editor)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}
