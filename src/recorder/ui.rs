//! Terminal screen for the recorder: waveform, timer and the two controls.

use super::state::PrimaryIcon;
use super::view::RecorderView;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    style::{Color, Style},
    widgets::{Paragraph, Sparkline},
};
use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};

const WAVE_BG: Color = Color::Rgb(0, 0, 0);
const WAVE_FG: Color = Color::Rgb(206, 224, 220);
const MIRROR_BG: Color = Color::Rgb(185, 207, 212);
const DISABLED_FG: Color = Color::Rgb(90, 90, 90);

/// Key press translated for the recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderInput {
    None,
    Primary,
    Reset,
    Quit,
}

/// Maps a key to a recorder input. `ctrl-c` quits.
pub fn map_key(code: KeyCode, modifiers: KeyModifiers) -> RecorderInput {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => RecorderInput::Quit,
        KeyCode::Char(' ') | KeyCode::Enter => RecorderInput::Primary,
        KeyCode::Char('r') | KeyCode::Backspace => RecorderInput::Reset,
        KeyCode::Char('q') | KeyCode::Esc => RecorderInput::Quit,
        _ => RecorderInput::None,
    }
}

pub struct RecorderTui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl RecorderTui {
    /// Enters raw mode and the alternate screen.
    ///
    /// # Errors
    /// - If the terminal cannot be initialized
    pub fn new() -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(RecorderTui { terminal })
    }

    /// Draws the mirrored waveform with the control footer underneath.
    pub fn render(&mut self, view: &RecorderView, now: Instant) -> anyhow::Result<()> {
        self.terminal.draw(|frame| {
            let area = frame.area();
            let [content_area, footer_area] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
            let top_height = content_area.height / 3 * 2;
            let [top_area, bottom_area] = Layout::vertical([
                Constraint::Length(top_height),
                Constraint::Fill(1),
            ])
            .areas(content_area);

            let bars = view.visualizer.bars(area.width as usize);

            frame.render_widget(
                Sparkline::default()
                    .data(&bars)
                    .max(100)
                    .style(Style::default().bg(WAVE_BG).fg(WAVE_FG)),
                top_area,
            );

            let mirrored: Vec<u64> = bars.iter().map(|&v| 100_u64.saturating_sub(v)).collect();
            frame.render_widget(
                Sparkline::default()
                    .data(&mirrored)
                    .max(100)
                    .style(Style::default().bg(MIRROR_BG).fg(WAVE_BG)),
                bottom_area,
            );

            frame.render_widget(footer(view, now), footer_area);
        })?;
        Ok(())
    }

    /// Waits up to `timeout` for a key press.
    pub fn handle_input(&mut self, timeout: Duration) -> anyhow::Result<RecorderInput> {
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    return Ok(RecorderInput::None);
                }
                let input = map_key(key.code, key.modifiers);
                if input != RecorderInput::None {
                    tracing::debug!("Key {:?} -> {:?}", key.code, input);
                }
                return Ok(input);
            }
        }
        Ok(RecorderInput::None)
    }

    /// Leaves the alternate screen and restores the cursor.
    pub fn cleanup(&mut self) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for RecorderTui {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

fn footer(view: &RecorderView, now: Instant) -> Paragraph<'static> {
    let (icon, label, icon_style) = match view.primary_icon {
        PrimaryIcon::Record => ("● ", "record", Style::default().fg(Color::Red)),
        PrimaryIcon::Stop => ("■ ", "stop", Style::default().fg(Color::Yellow)),
        PrimaryIcon::Play => ("▶ ", "play", Style::default().fg(Color::Green)),
    };
    let reset_style = if view.reset_enabled {
        Style::default().fg(MIRROR_BG)
    } else {
        Style::default().fg(DISABLED_FG)
    };

    let timer_style = if view.timer.is_running() {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let line = Line::from(vec![
        Span::styled(icon, icon_style),
        Span::styled(view.timer.display(now), timer_style),
        Span::raw("   space "),
        Span::raw(label),
        Span::styled("   r reset", reset_style),
        Span::raw("   q quit"),
    ]);

    Paragraph::new(line).style(Style::default().fg(MIRROR_BG).bg(WAVE_BG))
}
