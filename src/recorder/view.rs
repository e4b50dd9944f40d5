//! Presentation state of the recorder screen, driven by [`Affordance`] updates.

use super::state::{Affordance, PrimaryIcon};
use super::timer::CountUpTimer;
use super::visualizer::SoundVisualizer;
use std::time::Instant;

#[derive(Debug)]
pub struct RecorderView {
    pub visualizer: SoundVisualizer,
    pub timer: CountUpTimer,
    pub primary_icon: PrimaryIcon,
    pub reset_enabled: bool,
}

impl Default for RecorderView {
    fn default() -> Self {
        Self {
            visualizer: SoundVisualizer::new(),
            timer: CountUpTimer::default(),
            primary_icon: PrimaryIcon::Record,
            reset_enabled: false,
        }
    }
}

impl RecorderView {
    pub fn apply(&mut self, affordances: &[Affordance], now: Instant) {
        for affordance in affordances {
            match *affordance {
                Affordance::ResetEnabled(enabled) => self.reset_enabled = enabled,
                Affordance::PrimaryIcon(icon) => self.primary_icon = icon,
                Affordance::StartVisualizing { replaying } => self.visualizer.start(replaying),
                Affordance::StopVisualizing => self.visualizer.stop(),
                Affordance::ClearVisualization => self.visualizer.clear(),
                Affordance::StartTimer => self.timer.start(now),
                Affordance::StopTimer => self.timer.stop(now),
                Affordance::ClearTimer => self.timer.clear(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::state::{transition, RecorderEvent, RecorderState};
    use std::time::Duration;

    #[test]
    fn reset_after_recording_clears_waveform_and_timer() {
        let start = Instant::now();
        let mut view = RecorderView::default();

        let recording = transition(RecorderState::BeforeRecording, RecorderEvent::PrimaryPressed).unwrap();
        view.apply(&recording.affordances, start);
        view.visualizer.tick(start, || 4000);
        assert_eq!(view.primary_icon, PrimaryIcon::Stop);

        let stop_at = start + Duration::from_secs(3);
        let stopped = transition(recording.next, RecorderEvent::PrimaryPressed).unwrap();
        view.apply(&stopped.affordances, stop_at);
        assert_eq!(view.primary_icon, PrimaryIcon::Play);
        assert!(view.reset_enabled);
        assert_eq!(view.timer.display(stop_at + Duration::from_secs(10)), "00:03");
        assert_eq!(view.visualizer.len(), 1);

        let reset = transition(stopped.next, RecorderEvent::ResetPressed).unwrap();
        view.apply(&reset.affordances, stop_at);
        assert!(view.visualizer.is_empty());
        assert_eq!(view.timer.display(stop_at), "00:00");
        assert!(!view.reset_enabled);
        assert_eq!(view.primary_icon, PrimaryIcon::Record);
    }
}
