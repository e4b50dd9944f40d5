//! Seam between the recorder state machine and the audio stack.
//!
//! The controller only ever talks to these traits; `capture` and `playback`
//! provide the cpal/hound and rodio implementations.

use anyhow::Result;
use std::path::Path;

/// An in-progress microphone capture writing to a file.
pub trait CaptureHandle {
    /// Highest absolute sample level seen since the previous call (0..=32768).
    fn max_amplitude(&mut self) -> u16;

    /// Stops capturing and finalizes the output file.
    fn stop(self) -> Result<()>;
}

/// An in-progress playback of a recorded file.
pub trait PlaybackHandle {
    /// True once everything has been played.
    fn is_finished(&self) -> bool;

    /// Stops playback and releases the output device.
    fn stop(self) -> Result<()>;
}

/// Factory for capture and playback handles.
pub trait MediaBackend {
    type Capture: CaptureHandle;
    type Playback: PlaybackHandle;

    /// Starts recording to `path`, replacing any previous file there.
    fn start_capture(&mut self, path: &Path) -> Result<Self::Capture>;

    /// Opens `path` and starts playing it.
    fn start_playback(&mut self, path: &Path) -> Result<Self::Playback>;
}
