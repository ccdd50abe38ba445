//! Recording executor for tests.
//!
//! Nothing is executed.  Every command handed to [`RecordingExecutor::run`] is
//! pushed into a `Mutex<Vec<String>>`, so tests can assert on exactly which
//! commands ran and in what order.
//!
//! ```ignore
//! let executor = Arc::new(RecordingExecutor::new());
//! let dispatcher = Dispatcher::new(table, executor.clone());
//!
//! dispatcher.dispatch_pair(&RawEvent::scan(30), &RawEvent::key(4, 1));
//!
//! assert_eq!(executor.commands(), vec!["X".to_string()]);
//! ```

use std::sync::Mutex;

use crate::application::dispatch::CommandExecutor;

#[derive(Debug, Default)]
pub struct RecordingExecutor {
    runs: Mutex<Vec<String>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command passed to `run`, in call order.
    pub fn commands(&self) -> Vec<String> {
        self.runs.lock().expect("lock poisoned").clone()
    }
}

impl CommandExecutor for RecordingExecutor {
    fn run(&self, command: &str) {
        self.runs.lock().expect("lock poisoned").push(command.to_string());
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
