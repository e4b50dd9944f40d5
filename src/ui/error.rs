//! Full-screen notice for errors that end a session.
//!
//! Media and storage faults are not recovered from; before the process exits
//! the user gets one screen explaining what failed.

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};
use std::io::{self, Stdout};

const ERROR_BG: Color = Color::Rgb(255, 0, 0);
const ERROR_FG: Color = Color::Rgb(255, 255, 255);

/// Red full-screen error display, dismissed by any key.
pub struct ErrorScreen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl ErrorScreen {
    /// Enters the alternate screen.
    ///
    /// # Errors
    /// - If raw mode or the alternate screen cannot be entered
    pub fn new() -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(ErrorScreen { terminal })
    }

    /// Draws `title` and `message` centered on red and waits for a key press.
    ///
    /// # Errors
    /// - If terminal rendering or event polling fails
    pub fn show(&mut self, title: &str, message: &str) -> anyhow::Result<()> {
        loop {
            self.terminal.draw(|frame| {
                let area = frame.area();
                frame.render_widget(
                    ratatui::widgets::Block::default().style(Style::default().bg(ERROR_BG)),
                    area,
                );

                let text = Text::from(vec![
                    Line::styled(title.to_string(), Style::default().add_modifier(Modifier::BOLD)),
                    Line::raw(""),
                    Line::raw(message.to_string()),
                    Line::raw(""),
                    Line::styled("press any key to exit", Style::default().add_modifier(Modifier::DIM)),
                ]);
                let paragraph = Paragraph::new(text)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true })
                    .style(Style::default().fg(ERROR_FG).bg(ERROR_BG));

                let [_, middle, _] = Layout::vertical([
                    Constraint::Fill(1),
                    Constraint::Length(8),
                    Constraint::Fill(1),
                ])
                .areas(area);
                let [_, centered, _] = Layout::horizontal([
                    Constraint::Percentage(10),
                    Constraint::Percentage(80),
                    Constraint::Percentage(10),
                ])
                .areas(middle);

                frame.render_widget(paragraph, centered);
            })?;

            if event::poll(std::time::Duration::from_millis(100))? {
                if let Event::Key(_) = event::read()? {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Leaves the alternate screen and restores the cursor.
    ///
    /// # Errors
    /// - If terminal mode cannot be restored
    pub fn cleanup(&mut self) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for ErrorScreen {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Shows `error` on an [`ErrorScreen`] and hands it back for propagation.
///
/// A failure to draw the notice is only logged.
pub fn report_fatal(title: &str, error: anyhow::Error) -> anyhow::Error {
    tracing::error!("{}: {:#}", title, error);

    let shown = ErrorScreen::new().and_then(|mut screen| {
        screen.show(title, &format!("{error:#}"))?;
        screen.cleanup()
    });
    if let Err(e) = shown {
        tracing::warn!("Could not display error screen: {}", e);
    }

    error
}
