//! History panel drawn over the calculator keypad.
//!
//! Shows evaluated expressions newest first, each as the expression line
//! followed by `= result`. Scrolls with the arrow keys.

use super::storage::HistoryEntry;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, HighlightSpacing, List, ListItem, ListState, Padding, Paragraph},
};

const BG: Color = Color::Rgb(0, 0, 0);
const FG: Color = Color::Rgb(255, 255, 255);
const RESULT_FG: Color = Color::Rgb(100, 100, 100);
const HIGHLIGHT_BG: Color = Color::Rgb(20, 20, 20);
const HELP_FG: Color = Color::Rgb(100, 100, 100);

/// Open/closed history panel and the rows it currently shows.
#[derive(Default)]
pub struct HistoryPanel {
    visible: bool,
    /// Newest first
    entries: Vec<HistoryEntry>,
    list_state: ListState,
}

impl HistoryPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Shows the panel with no rows; rows arrive later through [`Self::show_entries`].
    pub fn open(&mut self) {
        self.visible = true;
        self.clear_rows();
    }

    pub fn close(&mut self) {
        self.visible = false;
    }

    /// Removes every row from the panel without touching storage.
    pub fn clear_rows(&mut self) {
        self.entries.clear();
        self.list_state.select(None);
    }

    /// Replaces the rows with `entries`, given oldest first as storage returns them.
    pub fn show_entries(&mut self, mut entries: Vec<HistoryEntry>) {
        entries.reverse();
        self.entries = entries;
        self.list_state
            .select(if self.entries.is_empty() { None } else { Some(0) });
    }

    /// Rows in display order.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn select_previous(&mut self) {
        self.list_state.select_previous();
    }

    pub fn select_next(&mut self) {
        self.list_state.select_next();
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" History ")
            .borders(Borders::ALL)
            .padding(Padding::horizontal(1))
            .style(Style::default().fg(FG).bg(BG));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [list_area, footer_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);

        if self.entries().is_empty() {
            let empty = Paragraph::new("No history yet")
                .alignment(Alignment::Center)
                .style(Style::default().fg(HELP_FG));
            frame.render_widget(empty, list_area);
        } else {
            let items: Vec<ListItem> = self
                .entries
                .iter()
                .map(|entry| {
                    ListItem::new(vec![
                        Line::styled(entry.expression.clone(), Style::default().fg(FG)),
                        Line::styled(
                            format!("= {}", entry.result),
                            Style::default().fg(RESULT_FG),
                        )
                        .alignment(Alignment::Right),
                    ])
                })
                .collect();

            let list = List::new(items)
                .highlight_style(Style::default().bg(HIGHLIGHT_BG))
                .highlight_symbol("> ")
                .highlight_spacing(HighlightSpacing::Always);
            frame.render_stateful_widget(list, list_area, &mut self.list_state);
        }

        let help = Paragraph::new("↑↓ scroll, d clear history, h/esc close")
            .alignment(Alignment::Center)
            .style(Style::default().fg(HELP_FG));
        frame.render_widget(help, footer_area);
    }
}
