//! Calculator history: SQLite storage, off-thread task dispatch and the
//! on-screen history panel.

pub mod storage;
pub mod tasks;
pub mod ui;

pub use storage::{HistoryEntry, HistoryStore};
pub use tasks::{HistoryEvent, HistoryOperation, HistoryTasks};
pub use ui::HistoryPanel;
