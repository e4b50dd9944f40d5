//! Count-up timer for the recorder footer.

use std::time::{Duration, Instant};

#[derive(Debug, Default, Clone, Copy)]
pub struct CountUpTimer {
    started_at: Option<Instant>,
    frozen: Duration,
}

impl CountUpTimer {
    /// Restarts counting from zero.
    pub fn start(&mut self, now: Instant) {
        self.started_at = Some(now);
        self.frozen = Duration::ZERO;
    }

    /// Freezes the shown value.
    pub fn stop(&mut self, now: Instant) {
        self.frozen = self.elapsed(now);
        self.started_at = None;
    }

    pub fn clear(&mut self) {
        self.started_at = None;
        self.frozen = Duration::ZERO;
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.started_at {
            Some(start) => now.saturating_duration_since(start),
            None => self.frozen,
        }
    }

    /// `MM:SS`; minutes keep counting past 59.
    pub fn display(&self, now: Instant) -> String {
        let secs = self.elapsed(now).as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}
