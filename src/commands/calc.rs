//! Calculator screen.
//!
//! Keypad editing with a live result, `=` to finalize and record the
//! expression in history, and a history panel that can be cleared.

use crate::calculator::{Calculator, CalculatorCommand, CalculatorError, CalculatorTui};
use crate::config::RecalcConfig;
use crate::history::{HistoryEvent, HistoryPanel, HistoryTasks};
use crate::ui::{report_fatal, Toast};
use anyhow::anyhow;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;

const FRAME_INTERVAL: Duration = Duration::from_millis(50);

/// Everything the calculator screen shows, plus the history dispatcher.
struct CalculatorSession {
    calculator: Calculator,
    history: HistoryPanel,
    toast: Option<Toast>,
    toast_lifetime: Duration,
    tasks: HistoryTasks,
}

impl CalculatorSession {
    fn new(tasks: HistoryTasks, toast_lifetime: Duration) -> Self {
        Self {
            calculator: Calculator::new(),
            history: HistoryPanel::new(),
            toast: None,
            toast_lifetime,
            tasks,
        }
    }

    /// Handles one command. Returns `false` when the screen should close.
    ///
    /// # Errors
    /// - On a non-transient calculator error such as division by zero
    fn apply(&mut self, command: CalculatorCommand, now: Instant) -> anyhow::Result<bool> {
        let outcome = match command {
            CalculatorCommand::None => Ok(()),
            CalculatorCommand::Quit => return Ok(false),
            CalculatorCommand::Digit(digit) => self.calculator.push_digit(digit),
            CalculatorCommand::Operator(operator) => self.calculator.push_operator(operator),
            CalculatorCommand::Evaluate => self.calculator.evaluate().map(|evaluation| {
                if let Some(evaluation) = evaluation {
                    tracing::info!("{} = {}", evaluation.expression, evaluation.result);
                    // Completion or failure is reported through the event channel.
                    drop(self.tasks.insert(evaluation.expression, evaluation.result));
                }
            }),
            CalculatorCommand::Clear => {
                self.calculator.clear();
                Ok(())
            }
            CalculatorCommand::ToggleHistory => {
                if self.history.is_visible() {
                    self.history.close();
                } else {
                    self.history.open();
                    drop(self.tasks.load_all());
                }
                Ok(())
            }
            CalculatorCommand::ClearHistory => {
                self.history.clear_rows();
                drop(self.tasks.delete_all());
                Ok(())
            }
            CalculatorCommand::ScrollUp => {
                self.history.select_previous();
                Ok(())
            }
            CalculatorCommand::ScrollDown => {
                self.history.select_next();
                Ok(())
            }
        };

        match outcome {
            Ok(()) => Ok(true),
            Err(e) => self.reject(e, now).map(|()| true),
        }
    }

    fn reject(&mut self, error: CalculatorError, now: Instant) -> anyhow::Result<()> {
        if !error.is_transient() {
            return Err(anyhow!(error).context(format!(
                "Evaluating '{}' failed",
                self.calculator.expression()
            )));
        }
        tracing::debug!("Rejected: {}", error);
        self.toast = Some(Toast::new(error.to_string(), now));
        Ok(())
    }

    /// Applies a result posted by a history task.
    fn on_history_event(&mut self, event: HistoryEvent) -> anyhow::Result<()> {
        match event {
            HistoryEvent::Loaded(entries) => {
                tracing::debug!("Loaded {} history entries", entries.len());
                if self.history.is_visible() {
                    self.history.show_entries(entries);
                }
                Ok(())
            }
            HistoryEvent::Failed { operation, error } => {
                Err(anyhow!("History {operation} failed: {error}"))
            }
        }
    }

    fn expire_toast(&mut self, now: Instant) {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.is_expired(now, self.toast_lifetime))
        {
            self.toast = None;
        }
    }
}

/// Opens the calculator screen.
///
/// # Errors
/// - If the terminal cannot be initialized
/// - On arithmetic or storage faults; the error is shown full-screen first
pub async fn handle_calc(config: &RecalcConfig) -> anyhow::Result<()> {
    tracing::info!("=== recalc calculator started ===");

    let database_path = config.calculator.history_path()?;
    tracing::info!("History database: {}", database_path.display());
    let (tasks, mut events) = HistoryTasks::new(database_path);
    let mut session = CalculatorSession::new(tasks, config.calculator.toast_duration());

    let mut tui = CalculatorTui::new()?;
    let outcome = run(&mut tui, &mut session, &mut events);
    drop(tui);

    match outcome {
        Ok(()) => {
            tracing::info!("=== recalc calculator exited ===");
            Ok(())
        }
        Err(e) => Err(report_fatal("Calculator stopped", e)),
    }
}

fn run(
    tui: &mut CalculatorTui,
    session: &mut CalculatorSession,
    events: &mut UnboundedReceiver<HistoryEvent>,
) -> anyhow::Result<()> {
    loop {
        while let Ok(event) = events.try_recv() {
            session.on_history_event(event)?;
        }

        let now = Instant::now();
        session.expire_toast(now);
        tui.render(&session.calculator, &mut session.history, session.toast.as_ref())?;

        let command = tui.handle_input(FRAME_INTERVAL, session.history.is_visible())?;
        if !session.apply(command, Instant::now())? {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::Operator;
    use crate::history::{HistoryOperation, HistoryStore};
    use std::path::PathBuf;

    fn session(dir: &tempfile::TempDir) -> (CalculatorSession, UnboundedReceiver<HistoryEvent>, PathBuf) {
        let path = dir.path().join("history.db");
        let (tasks, events) = HistoryTasks::new(path.clone());
        (CalculatorSession::new(tasks, Duration::from_millis(1500)), events, path)
    }

    fn press(session: &mut CalculatorSession, commands: &[CalculatorCommand]) {
        let now = Instant::now();
        for &command in commands {
            assert!(session.apply(command, now).unwrap());
        }
    }

    #[tokio::test]
    async fn equals_records_the_evaluation() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _events, path) = session(&dir);

        press(
            &mut session,
            &[
                CalculatorCommand::Digit('4'),
                CalculatorCommand::Digit('2'),
                CalculatorCommand::Operator(Operator::Multiply),
                CalculatorCommand::Digit('2'),
            ],
        );
        assert_eq!(session.calculator.result(), "84");

        press(&mut session, &[CalculatorCommand::Evaluate]);
        assert_eq!(session.calculator.expression(), "84");
        assert_eq!(session.calculator.result(), "");

        let store = HistoryStore::open(&path).unwrap();
        let mut entries = store.get_all().unwrap();
        for _ in 0..100 {
            if !entries.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
            entries = store.get_all().unwrap();
        }
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].expression, "42 * 2");
        assert_eq!(entries[0].result, "84");
    }

    #[tokio::test]
    async fn opening_history_shows_loaded_rows_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, mut events, _path) = session(&dir);
        session.tasks.insert("1 + 1".into(), "2".into()).await.unwrap().unwrap();
        session.tasks.insert("2 + 2".into(), "4".into()).await.unwrap().unwrap();

        press(&mut session, &[CalculatorCommand::ToggleHistory]);
        assert!(session.history.is_visible());

        let event = events.recv().await.unwrap();
        session.on_history_event(event).unwrap();
        let shown: Vec<_> = session.history.entries().iter().map(|e| e.result.as_str()).collect();
        assert_eq!(shown, ["4", "2"]);

        press(&mut session, &[CalculatorCommand::ClearHistory]);
        assert!(session.history.entries().is_empty());

        press(&mut session, &[CalculatorCommand::ToggleHistory]);
        assert!(!session.history.is_visible());
    }

    #[tokio::test]
    async fn rows_loaded_after_closing_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _events, _path) = session(&dir);

        session
            .on_history_event(HistoryEvent::Loaded(Vec::new()))
            .unwrap();
        assert!(!session.history.is_visible());
    }

    #[tokio::test]
    async fn transient_rejections_become_toasts() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _events, _path) = session(&dir);
        let now = Instant::now();

        session.apply(CalculatorCommand::Digit('0'), now).unwrap();
        assert_eq!(
            session.toast.as_ref().map(Toast::message),
            Some("0 cannot come first.")
        );

        session.expire_toast(now + Duration::from_millis(1500));
        assert!(session.toast.is_none());
    }

    #[tokio::test]
    async fn division_by_zero_ends_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _events, _path) = session(&dir);

        let err = session
            .reject(CalculatorError::DivisionByZero, Instant::now())
            .unwrap_err();
        assert!(format!("{err:#}").contains("Division by zero."));
        assert!(session.toast.is_none());
    }

    #[tokio::test]
    async fn storage_failures_end_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _events, _path) = session(&dir);

        let err = session.on_history_event(HistoryEvent::Failed {
            operation: HistoryOperation::Insert,
            error: "disk full".into(),
        });
        assert_eq!(err.unwrap_err().to_string(), "History insert failed: disk full");
    }

    #[tokio::test]
    async fn quit_closes_the_screen() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _events, _path) = session(&dir);
        assert!(!session.apply(CalculatorCommand::Quit, Instant::now()).unwrap());
    }
}
