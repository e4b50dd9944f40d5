//! Application command handlers for recalc.
//!
//! # Commands
//! - `record`: recorder screen with waveform, timer and playback
//! - `calc`: calculator screen with history panel
//! - `eval`: evaluate one expression and optionally save it to history
//! - `history`: list or clear calculator history
//! - `config`: open configuration file in the user's preferred editor
//! - `list_devices`: list available audio input devices
//! - `logs`: display recent log entries

pub mod calc;
pub mod config;
pub mod eval;
pub mod history;
pub mod list_devices;
pub mod logs;
pub mod record;

pub use calc::handle_calc;
pub use config::handle_config;
pub use eval::handle_eval;
pub use history::handle_history;
pub use list_devices::handle_list_devices;
pub use logs::handle_logs;
pub use record::handle_record;
