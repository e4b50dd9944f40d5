//! Short-lived notification drawn in the middle of the screen.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};
use std::time::{Duration, Instant};

/// A message that disappears on its own after a fixed duration.
#[derive(Debug, Clone)]
pub struct Toast {
    message: String,
    shown_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>, now: Instant) -> Self {
        Self {
            message: message.into(),
            shown_at: now,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_expired(&self, now: Instant, lifetime: Duration) -> bool {
        now.saturating_duration_since(self.shown_at) >= lifetime
    }

    /// Draws the toast as a bordered box centered in `screen_area`.
    pub fn render(&self, frame: &mut Frame, screen_area: Rect) {
        let width = (self.message().chars().count() as u16)
            .saturating_add(4)
            .min(screen_area.width);
        let height = 3.min(screen_area.height);

        let area = Rect {
            x: screen_area.x + screen_area.width.saturating_sub(width) / 2,
            y: screen_area.y + screen_area.height.saturating_sub(height) / 2,
            width,
            height,
        };

        let style = Style::default().bg(Color::Yellow).fg(Color::Black);
        let block = Block::default().borders(Borders::ALL).style(style);
        let inner = block.inner(area);

        frame.render_widget(Clear, area);
        frame.render_widget(block, area);
        frame.render_widget(
            Paragraph::new(self.message())
                .style(style)
                .alignment(Alignment::Center),
            inner,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_after_its_lifetime() {
        let start = Instant::now();
        let toast = Toast::new("Only one operator can be used.", start);
        let lifetime = Duration::from_millis(1500);

        assert!(!toast.is_expired(start + Duration::from_millis(1499), lifetime));
        assert!(toast.is_expired(start + lifetime, lifetime));
        assert_eq!(toast.message(), "Only one operator can be used.");
    }
}
