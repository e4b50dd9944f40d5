//! Microphone access check run once before the recorder screen opens.

use super::capture::open_input_device;
use crate::commands::config::open_in_editor;
use anyhow::Result;
use cliclack::{intro, outro, outro_cancel, select};
use console::style;
use cpal::traits::DeviceTrait;
use std::path::Path;

/// What the audio host lets us do with the configured input device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MicrophoneAccess {
    Granted,
    /// The device exists but refuses to hand out an input configuration.
    Denied,
    /// The device cannot be found; only a settings change can fix it.
    DeniedPermanently,
}

/// Answer from the "microphone unavailable" dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsChoice {
    OpenSettings,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionOutcome {
    Proceed,
    OpenSettings,
    Exit,
}

/// Probes the configured input device.
pub fn check_microphone_access(device_name: &str) -> MicrophoneAccess {
    let device = match open_input_device(device_name) {
        Ok(device) => device,
        Err(e) => {
            tracing::warn!("Microphone unavailable: {:#}", e);
            return MicrophoneAccess::DeniedPermanently;
        }
    };

    match device.default_input_config() {
        Ok(_) => MicrophoneAccess::Granted,
        Err(e) => {
            tracing::warn!("Microphone refused an input configuration: {}", e);
            MicrophoneAccess::Denied
        }
    }
}

/// Maps an access result to what the app should do next.
///
/// `ask` is only consulted for [`MicrophoneAccess::DeniedPermanently`].
pub fn resolve(
    access: MicrophoneAccess,
    ask: impl FnOnce() -> Result<SettingsChoice>,
) -> Result<PermissionOutcome> {
    Ok(match access {
        MicrophoneAccess::Granted => PermissionOutcome::Proceed,
        MicrophoneAccess::Denied => PermissionOutcome::Exit,
        MicrophoneAccess::DeniedPermanently => match ask()? {
            SettingsChoice::OpenSettings => PermissionOutcome::OpenSettings,
            SettingsChoice::Quit => PermissionOutcome::Exit,
        },
    })
}

/// Runs the full check, including the dialog and the editor redirect.
///
/// Returns `true` when recording may start.
pub fn ensure_microphone_access(device_name: &str, config_path: &Path) -> Result<bool> {
    let access = check_microphone_access(device_name);
    tracing::info!("Microphone access: {:?}", access);

    match resolve(access, || ask_for_settings(device_name))? {
        PermissionOutcome::Proceed => Ok(true),
        PermissionOutcome::OpenSettings => {
            open_in_editor(config_path)?;
            outro("Settings saved. Run `recalc record` again to use the new device.")?;
            Ok(false)
        }
        PermissionOutcome::Exit => {
            if access == MicrophoneAccess::Denied {
                eprintln!("Microphone access was denied.");
            }
            Ok(false)
        }
    }
}

fn ask_for_settings(device_name: &str) -> Result<SettingsChoice> {
    // cliclack handles Ctrl-C itself; keep the default handler from killing the terminal state.
    if let Err(e) = ctrlc::set_handler(|| {}) {
        tracing::debug!("Ctrl-C handler already installed: {}", e);
    }

    intro(style(" microphone ").on_white().black())?;
    let choice = select(format!(
        "No microphone matching '{device_name}' was found. Recording needs one."
    ))
    .item(SettingsChoice::OpenSettings, "Open settings", "choose another device")
    .item(SettingsChoice::Quit, "Quit", "")
    .interact();

    match choice {
        Ok(choice) => Ok(choice),
        Err(e) => {
            tracing::debug!("Permission dialog cancelled: {}", e);
            outro_cancel("Cancelled")?;
            Ok(SettingsChoice::Quit)
        }
    }
}
