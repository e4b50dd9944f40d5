//! Recorder screen.
//!
//! Records the microphone to a fixed WAV file with a live waveform and plays
//! the take back. Supports an external record/stop/play trigger via SIGUSR1.

use crate::config::RecalcConfig;
use crate::paths;
use crate::recorder::{
    ensure_microphone_access, CpalBackend, MediaBackend, RecorderController, RecorderEvent,
    RecorderInput, RecorderState, RecorderTui, RecorderView,
};
use crate::recorder::visualizer::TICK_INTERVAL;
use crate::ui::report_fatal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Controller plus the presentation it drives.
struct RecorderSession<B: MediaBackend> {
    controller: RecorderController<B>,
    view: RecorderView,
}

impl<B: MediaBackend> RecorderSession<B> {
    fn new(controller: RecorderController<B>, now: Instant) -> Self {
        let mut view = RecorderView::default();
        view.apply(&controller.initial_affordances(), now);
        Self { controller, view }
    }

    /// Handles one input. Returns `false` when the screen should close.
    fn apply(&mut self, input: RecorderInput, now: Instant) -> anyhow::Result<bool> {
        let event = match input {
            RecorderInput::None => return Ok(true),
            RecorderInput::Quit => return Ok(false),
            RecorderInput::Primary => RecorderEvent::PrimaryPressed,
            RecorderInput::Reset => RecorderEvent::ResetPressed,
        };

        let affordances = self.controller.handle(event)?;
        self.view.apply(&affordances, now);
        Ok(true)
    }

    /// Per-frame work: playback completion and the visualizer tick.
    fn tick(&mut self, now: Instant) -> anyhow::Result<()> {
        if let Some(affordances) = self.controller.poll_playback_completion()? {
            self.view.apply(&affordances, now);
        }

        let controller = &mut self.controller;
        self.view
            .visualizer
            .tick(now, || controller.current_amplitude());
        Ok(())
    }
}

/// Opens the recorder screen.
///
/// # Errors
/// - If the terminal cannot be initialized
/// - If capture or playback fails; the error is shown full-screen first
pub fn handle_record(config: &RecalcConfig) -> anyhow::Result<()> {
    tracing::info!("=== recalc recorder started ===");
    tracing::info!(
        "Recorder configuration: device={}, sample_rate={}Hz",
        config.recorder.device,
        config.recorder.sample_rate
    );

    if !ensure_microphone_access(&config.recorder.device, &paths::config_file()?)? {
        tracing::info!("Recorder closed before start: microphone unavailable");
        return Ok(());
    }

    let recording_path = config.recorder.recording_path()?;
    let backend = CpalBackend::new(config.recorder.device.clone(), config.recorder.sample_rate);
    let controller = RecorderController::new(backend, recording_path);
    let mut session = RecorderSession::new(controller, Instant::now());

    let trigger = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGUSR1, Arc::clone(&trigger))
        .map_err(|e| anyhow::anyhow!("Failed to register signal handler: {e}"))?;

    let mut tui = RecorderTui::new()?;
    let outcome = run(&mut tui, &mut session, &trigger);
    let released = session.controller.shutdown();
    drop(tui);

    match outcome.and(released) {
        Ok(()) => {
            if session.controller.state() != RecorderState::BeforeRecording {
                let path = session.controller.recording_path();
                tracing::info!(
                    "Take kept at {} ({} waveform samples)",
                    path.display(),
                    session.view.visualizer.len()
                );
                println!("Recording saved to {}", path.display());
            }
            tracing::info!("=== recalc recorder exited ===");
            Ok(())
        }
        Err(e) => Err(report_fatal("Recording failed", e)),
    }
}

fn run<B: MediaBackend>(
    tui: &mut RecorderTui,
    session: &mut RecorderSession<B>,
    trigger: &AtomicBool,
) -> anyhow::Result<()> {
    loop {
        let mut input = tui.handle_input(TICK_INTERVAL)?;
        if trigger.swap(false, Ordering::Relaxed) {
            tracing::info!("Received SIGUSR1: pressing primary control");
            input = RecorderInput::Primary;
        }

        let now = Instant::now();
        if !session.apply(input, now)? {
            return Ok(());
        }
        session.tick(now)?;
        tui.render(&session.view, now)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::controller::testing::ScriptedBackend;
    use crate::recorder::state::PrimaryIcon;
    use std::path::PathBuf;
    use std::time::Duration;

    fn session() -> (RecorderSession<ScriptedBackend>, ScriptedBackend, Instant) {
        let backend = ScriptedBackend::default();
        let controller = RecorderController::new(backend.clone(), PathBuf::from("/tmp/take.wav"));
        let start = Instant::now();
        (RecorderSession::new(controller, start), backend, start)
    }

    #[test]
    fn recording_fills_the_waveform_and_playback_replays_it() {
        let (mut session, backend, start) = session();
        backend.0.amplitude.set(16_000);

        assert!(session.apply(RecorderInput::Primary, start).unwrap());
        for i in 0..3 {
            session.tick(start + TICK_INTERVAL * i).unwrap();
        }
        assert_eq!(session.view.visualizer.len(), 3);

        let stopped_at = start + Duration::from_secs(2);
        session.apply(RecorderInput::Primary, stopped_at).unwrap();
        assert_eq!(session.view.primary_icon, PrimaryIcon::Play);
        assert_eq!(session.view.timer.display(stopped_at), "00:02");

        session.apply(RecorderInput::Primary, stopped_at).unwrap();
        session.tick(stopped_at).unwrap();
        assert_eq!(session.view.visualizer.bars(80).len(), 1);

        backend.0.playback_finished.set(true);
        session.tick(stopped_at + TICK_INTERVAL).unwrap();
        assert_eq!(session.controller.state(), RecorderState::AfterRecording);
        assert_eq!(session.view.primary_icon, PrimaryIcon::Play);
        assert_eq!(session.view.visualizer.len(), 3);
    }

    #[test]
    fn reset_wipes_the_take_from_the_screen() {
        let (mut session, _backend, start) = session();
        session.apply(RecorderInput::Primary, start).unwrap();
        session.tick(start).unwrap();
        session.apply(RecorderInput::Primary, start).unwrap();

        session.apply(RecorderInput::Reset, start).unwrap();

        assert_eq!(session.controller.state(), RecorderState::BeforeRecording);
        assert!(session.view.visualizer.is_empty());
        assert!(!session.view.reset_enabled);
    }

    #[test]
    fn quit_closes_and_idle_frames_continue() {
        let (mut session, backend, start) = session();
        assert!(session.apply(RecorderInput::None, start).unwrap());
        assert!(!session.apply(RecorderInput::Quit, start).unwrap());
        assert!(backend.0.calls.borrow().is_empty());
    }
}
