//! Calculator screen: expression display, live result, keypad hints,
//! transient messages and the history overlay.

use super::editor::Calculator;
use super::expression::{Operator, SEPARATOR};
use crate::history::HistoryPanel;
use crate::ui::Toast;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};
use std::io::{stdout, Stdout};
use std::time::Duration;

const BG: Color = Color::Rgb(0, 0, 0);
const FG: Color = Color::Rgb(255, 255, 255);
const OPERATOR_FG: Color = Color::Rgb(80, 200, 120);
const RESULT_FG: Color = Color::Rgb(140, 140, 140);
const HELP_FG: Color = Color::Rgb(100, 100, 100);

/// Key press translated for the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculatorCommand {
    None,
    Digit(char),
    Operator(Operator),
    Evaluate,
    Clear,
    ToggleHistory,
    ClearHistory,
    ScrollUp,
    ScrollDown,
    Quit,
}

/// Maps a key to a command. While the history panel is open only the panel
/// keys apply and `esc` closes the panel instead of quitting.
pub fn map_key(code: KeyCode, modifiers: KeyModifiers, history_open: bool) -> CalculatorCommand {
    if let KeyCode::Char('c') = code {
        if modifiers.contains(KeyModifiers::CONTROL) {
            return CalculatorCommand::Quit;
        }
    }

    if history_open {
        return match code {
            KeyCode::Char('h') | KeyCode::Esc => CalculatorCommand::ToggleHistory,
            KeyCode::Char('d') => CalculatorCommand::ClearHistory,
            KeyCode::Up | KeyCode::Char('k') => CalculatorCommand::ScrollUp,
            KeyCode::Down | KeyCode::Char('j') => CalculatorCommand::ScrollDown,
            KeyCode::Char('q') => CalculatorCommand::Quit,
            _ => CalculatorCommand::None,
        };
    }

    match code {
        KeyCode::Char(digit @ '0'..='9') => CalculatorCommand::Digit(digit),
        KeyCode::Enter | KeyCode::Char('=') => CalculatorCommand::Evaluate,
        KeyCode::Char('c') | KeyCode::Delete => CalculatorCommand::Clear,
        KeyCode::Char('h') => CalculatorCommand::ToggleHistory,
        KeyCode::Char('q') | KeyCode::Esc => CalculatorCommand::Quit,
        KeyCode::Char(symbol) => {
            Operator::from_symbol(symbol).map_or(CalculatorCommand::None, CalculatorCommand::Operator)
        }
        _ => CalculatorCommand::None,
    }
}

/// Splits the expression into spans, colouring lone operator tokens.
fn expression_line(expression: &str) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, token) in expression.split(SEPARATOR).enumerate() {
        if i > 0 {
            spans.push(Span::raw(SEPARATOR.to_string()));
        }
        let is_operator = token.chars().count() == 1
            && token.chars().next().and_then(Operator::from_symbol).is_some();
        let style = if is_operator {
            Style::default().fg(OPERATOR_FG).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(FG).add_modifier(Modifier::BOLD)
        };
        spans.push(Span::styled(token.to_string(), style));
    }
    Line::from(spans)
}

pub struct CalculatorTui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl CalculatorTui {
    /// Enters raw mode and the alternate screen.
    ///
    /// # Errors
    /// - If the terminal cannot be initialized
    pub fn new() -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(CalculatorTui { terminal })
    }

    pub fn render(
        &mut self,
        calculator: &Calculator,
        history: &mut HistoryPanel,
        toast: Option<&Toast>,
    ) -> anyhow::Result<()> {
        self.terminal.draw(|frame| {
            let area = frame.area();
            frame.render_widget(Block::default().style(Style::default().bg(BG)), area);

            let [display_area, help_area] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(3)]).areas(area);

            let display = Block::default()
                .borders(Borders::BOTTOM)
                .padding(Padding::horizontal(2))
                .style(Style::default().fg(HELP_FG).bg(BG));
            let inner = display.inner(display_area);
            frame.render_widget(display, display_area);

            let [_, expression_area, result_area] = Layout::vertical([
                Constraint::Fill(1),
                Constraint::Length(2),
                Constraint::Length(1),
            ])
            .areas(inner);

            frame.render_widget(
                Paragraph::new(expression_line(calculator.expression()))
                    .alignment(Alignment::Right)
                    .wrap(Wrap { trim: false }),
                expression_area,
            );
            frame.render_widget(
                Paragraph::new(calculator.result().to_string())
                    .alignment(Alignment::Right)
                    .style(Style::default().fg(RESULT_FG)),
                result_area,
            );

            let keypad_hint = if calculator.is_operator() {
                "0-9 second operand"
            } else if calculator.has_operator() {
                "0-9 digits   enter/= evaluate"
            } else {
                "0-9 digits   + - * / % operators"
            };
            let help = Text::from(vec![
                Line::raw(keypad_hint),
                Line::raw("c clear   h history   q quit"),
            ]);
            frame.render_widget(
                Paragraph::new(help)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(HELP_FG)),
                help_area,
            );

            history.render(frame, area);

            if let Some(toast) = toast {
                toast.render(frame, area);
            }
        })?;
        Ok(())
    }

    /// Waits up to `timeout` for a key press.
    pub fn handle_input(
        &mut self,
        timeout: Duration,
        history_open: bool,
    ) -> anyhow::Result<CalculatorCommand> {
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    return Ok(CalculatorCommand::None);
                }
                let command = map_key(key.code, key.modifiers, history_open);
                if command != CalculatorCommand::None {
                    tracing::debug!("Key {:?} -> {:?}", key.code, command);
                }
                return Ok(command);
            }
        }
        Ok(CalculatorCommand::None)
    }

    /// Leaves the alternate screen and restores the cursor.
    pub fn cleanup(&mut self) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for CalculatorTui {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
