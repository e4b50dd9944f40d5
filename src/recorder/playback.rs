//! Playback of the recorded take through the default output device.

use super::media::PlaybackHandle;
use anyhow::{Context, Result};
use rodio::{OutputStream, OutputStreamBuilder, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Owns the output stream for as long as the sink plays.
pub struct RodioPlayback {
    _stream: OutputStream,
    sink: Sink,
}

impl RodioPlayback {
    /// Decodes `path` and starts playing it immediately.
    ///
    /// # Errors
    /// - If the file is missing or not a decodable audio file
    /// - If no output device can be opened
    pub fn start(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open recording {}", path.display()))?;

        let mut stream = OutputStreamBuilder::open_default_stream()
            .context("Failed to open audio output device")?;
        stream.log_on_drop(false);

        let sink = rodio::play(stream.mixer(), BufReader::new(file))
            .with_context(|| format!("Failed to play {}", path.display()))?;

        Ok(Self {
            _stream: stream,
            sink,
        })
    }
}

impl PlaybackHandle for RodioPlayback {
    fn is_finished(&self) -> bool {
        self.sink.empty()
    }

    fn stop(self) -> Result<()> {
        self.sink.stop();
        tracing::debug!("Playback stopped");
        Ok(())
    }
}
