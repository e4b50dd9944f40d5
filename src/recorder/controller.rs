//! Recording session: current state plus the single active media handle.

use super::media::{CaptureHandle, MediaBackend, PlaybackHandle};
use super::state::{self, Affordance, MediaEffect, RecorderEvent, RecorderState};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// The recorder and the player are never active at the same time.
enum ActiveMedia<C, P> {
    Idle,
    Capturing(C),
    Playing(P),
}

/// Drives a [`MediaBackend`] from [`RecorderEvent`]s.
pub struct RecorderController<B: MediaBackend> {
    backend: B,
    recording_path: PathBuf,
    state: RecorderState,
    media: ActiveMedia<B::Capture, B::Playback>,
}

impl<B: MediaBackend> RecorderController<B> {
    /// Creates a controller in `BeforeRecording`. Every take overwrites `recording_path`.
    pub fn new(backend: B, recording_path: PathBuf) -> Self {
        Self {
            backend,
            recording_path,
            state: RecorderState::BeforeRecording,
            media: ActiveMedia::Idle,
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn recording_path(&self) -> &Path {
        &self.recording_path
    }

    /// Presentation for the initial state, to apply before the first event.
    pub fn initial_affordances(&self) -> Vec<Affordance> {
        state::entry_affordances(self.state).to_vec()
    }

    /// Applies `event` and returns the presentation updates to perform.
    ///
    /// Events that do not apply in the current state return no updates.
    ///
    /// # Errors
    /// - If the media backend fails to start or stop; the state is left unchanged
    pub fn handle(&mut self, event: RecorderEvent) -> Result<Vec<Affordance>> {
        let Some(transition) = state::transition(self.state, event) else {
            tracing::debug!("Ignoring {:?} while {}", event, self.state);
            return Ok(Vec::new());
        };

        if let Some(effect) = transition.media {
            self.perform(effect)?;
        }

        tracing::info!("Recorder {} -> {}", self.state, transition.next);
        self.state = transition.next;
        Ok(transition.affordances)
    }

    /// Checks whether playback has reached the end and, if so, handles the completion.
    pub fn poll_playback_completion(&mut self) -> Result<Option<Vec<Affordance>>> {
        let finished = matches!(&self.media, ActiveMedia::Playing(player) if player.is_finished());
        if !finished {
            return Ok(None);
        }

        tracing::debug!("Playback reached the end");
        self.handle(RecorderEvent::PlaybackCompleted).map(Some)
    }

    /// Current input level for the visualizer; 0 unless recording.
    pub fn current_amplitude(&mut self) -> u16 {
        match &mut self.media {
            ActiveMedia::Capturing(recorder) => recorder.max_amplitude(),
            _ => 0,
        }
    }

    /// Stops whatever is active. Used when the screen closes mid-session.
    pub fn shutdown(&mut self) -> Result<()> {
        self.release()?;
        self.state = match self.state {
            RecorderState::Recording | RecorderState::Playing => RecorderState::AfterRecording,
            other => other,
        };
        Ok(())
    }

    fn perform(&mut self, effect: MediaEffect) -> Result<()> {
        match effect {
            MediaEffect::StartCapture => {
                self.release()?;
                let recorder = self.backend.start_capture(&self.recording_path)?;
                self.media = ActiveMedia::Capturing(recorder);
                tracing::info!("Capturing to {}", self.recording_path.display());
            }
            MediaEffect::StartPlayback => {
                self.release()?;
                let player = self.backend.start_playback(&self.recording_path)?;
                self.media = ActiveMedia::Playing(player);
                tracing::info!("Playing {}", self.recording_path.display());
            }
            MediaEffect::StopCapture | MediaEffect::StopPlayback => self.release()?,
        }
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.media, ActiveMedia::Idle) {
            ActiveMedia::Idle => {}
            ActiveMedia::Capturing(recorder) => {
                recorder.stop()?;
                tracing::debug!("Recorder released");
            }
            ActiveMedia::Playing(player) => {
                player.stop()?;
                tracing::debug!("Player released");
            }
        }
        Ok(())
    }
}
