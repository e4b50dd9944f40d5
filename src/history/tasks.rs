//! Off-thread dispatch of history operations.
//!
//! Every call runs on tokio's blocking pool with its own database connection
//! and returns the task's `JoinHandle`. The UI drops the handle (fire and
//! forget); loaded entries and failures come back as [`HistoryEvent`]s on the
//! channel returned by [`HistoryTasks::new`]. Calls dispatched close together
//! may complete in any order.

use super::storage::{HistoryEntry, HistoryStore};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryOperation {
    Insert,
    LoadAll,
    DeleteAll,
}

impl fmt::Display for HistoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert => write!(f, "insert"),
            Self::LoadAll => write!(f, "load"),
            Self::DeleteAll => write!(f, "clear"),
        }
    }
}

/// Results posted back to the UI loop.
#[derive(Debug)]
pub enum HistoryEvent {
    /// All entries, oldest first
    Loaded(Vec<HistoryEntry>),
    Failed {
        operation: HistoryOperation,
        error: String,
    },
}

/// Dispatcher for history operations against one database file.
#[derive(Clone)]
pub struct HistoryTasks {
    database_path: Arc<PathBuf>,
    events: mpsc::UnboundedSender<HistoryEvent>,
}

impl HistoryTasks {
    pub fn new(database_path: PathBuf) -> (Self, mpsc::UnboundedReceiver<HistoryEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let tasks = Self {
            database_path: Arc::new(database_path),
            events,
        };
        (tasks, receiver)
    }

    pub fn insert(&self, expression: String, result: String) -> JoinHandle<anyhow::Result<()>> {
        self.dispatch(HistoryOperation::Insert, move |store| {
            store.insert(&expression, &result)?;
            Ok(None)
        })
    }

    /// Loads every entry; the result arrives as [`HistoryEvent::Loaded`].
    pub fn load_all(&self) -> JoinHandle<anyhow::Result<()>> {
        self.dispatch(HistoryOperation::LoadAll, |store| {
            Ok(Some(HistoryEvent::Loaded(store.get_all()?)))
        })
    }

    pub fn delete_all(&self) -> JoinHandle<anyhow::Result<()>> {
        self.dispatch(HistoryOperation::DeleteAll, |store| {
            store.delete_all()?;
            Ok(None)
        })
    }

    fn dispatch<F>(&self, operation: HistoryOperation, work: F) -> JoinHandle<anyhow::Result<()>>
    where
        F: FnOnce(&HistoryStore) -> anyhow::Result<Option<HistoryEvent>> + Send + 'static,
    {
        let database_path = Arc::clone(&self.database_path);
        let events = self.events.clone();

        tokio::task::spawn_blocking(move || {
            let outcome = HistoryStore::open(&database_path).and_then(|store| work(&store));

            match outcome {
                Ok(Some(event)) => {
                    // The receiver is gone once the screen has closed; nothing left to notify.
                    let _ = events.send(event);
                    Ok(())
                }
                Ok(None) => Ok(()),
                Err(e) => {
                    tracing::error!("History {} failed: {:#}", operation, e);
                    let _ = events.send(HistoryEvent::Failed {
                        operation,
                        error: format!("{e:#}"),
                    });
                    Err(e)
                }
            }
        })
    }
}
