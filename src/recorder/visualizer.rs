//! Amplitude waveform shown while recording and redrawn during playback.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How often a new amplitude is taken while visualizing.
pub const TICK_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Idle,
    Live,
    Replay,
}

/// Keeps every amplitude of the current take, newest first.
#[derive(Debug)]
pub struct SoundVisualizer {
    amplitudes: VecDeque<u16>,
    mode: Mode,
    replay_position: usize,
    last_tick: Option<Instant>,
}

impl Default for SoundVisualizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SoundVisualizer {
    pub fn new() -> Self {
        Self {
            amplitudes: VecDeque::new(),
            mode: Mode::Idle,
            replay_position: 0,
            last_tick: None,
        }
    }

    /// Starts ticking. In replay mode the stored amplitudes are revealed from
    /// the oldest one onward instead of sampling new ones.
    pub fn start(&mut self, replaying: bool) {
        self.mode = if replaying { Mode::Replay } else { Mode::Live };
        self.last_tick = None;
    }

    pub fn stop(&mut self) {
        self.mode = Mode::Idle;
        self.replay_position = 0;
        self.last_tick = None;
    }

    pub fn clear(&mut self) {
        self.amplitudes.clear();
    }

    pub fn len(&self) -> usize {
        self.amplitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amplitudes.is_empty()
    }

    /// Advances one step if a tick is due. `sample` is only called in live mode.
    pub fn tick(&mut self, now: Instant, sample: impl FnOnce() -> u16) {
        if self.mode == Mode::Idle {
            return;
        }
        if let Some(last) = self.last_tick {
            if now.saturating_duration_since(last) < TICK_INTERVAL {
                return;
            }
        }
        self.last_tick = Some(now);

        match self.mode {
            Mode::Live => self.amplitudes.push_front(sample()),
            Mode::Replay => {
                self.replay_position = (self.replay_position + 1).min(self.amplitudes.len());
            }
            Mode::Idle => {}
        }
    }

    /// Bar heights in percent of full scale, oldest on the left, at most `width` bars.
    pub fn bars(&self, width: usize) -> Vec<u64> {
        let visible = match self.mode {
            Mode::Replay => self.replay_position,
            Mode::Live | Mode::Idle => self.amplitudes.len(),
        };

        // Newest first in the deque, so the oldest entries come out of `rev()` first.
        let mut bars: Vec<u64> = self
            .amplitudes
            .iter()
            .rev()
            .take(visible)
            .map(|&amplitude| scale(amplitude))
            .collect();

        if bars.len() > width {
            bars.drain(..bars.len() - width);
        }
        bars
    }
}

fn scale(amplitude: u16) -> u64 {
    (u64::from(amplitude) * 100 / i16::MAX as u64).min(100)
}
