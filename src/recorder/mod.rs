//! Audio recorder: state machine, media backend and screen.
//!
//! - `state`: pure transition table
//! - `controller`: applies transitions through a [`MediaBackend`]
//! - `capture` / `playback`: cpal + hound input, rodio output
//! - `permission`: microphone availability check before the screen opens
//! - `visualizer`, `timer`, `view`, `ui`: what the user sees

pub mod capture;
pub mod controller;
pub mod media;
pub mod permission;
pub mod playback;
pub mod state;
pub mod timer;
pub mod ui;
pub mod view;
pub mod visualizer;

pub use capture::CpalBackend;
pub use controller::RecorderController;
pub use media::{CaptureHandle, MediaBackend, PlaybackHandle};
pub use permission::ensure_microphone_access;
pub use state::{Affordance, RecorderEvent, RecorderState};
pub use ui::{RecorderInput, RecorderTui};
pub use view::RecorderView;
