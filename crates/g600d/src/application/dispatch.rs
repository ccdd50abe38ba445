//! Dispatcher: turns a record pair into at most one command execution.
//!
//! For every pair handed over by the event loop the dispatcher:
//!
//! 1. Classifies the pair (noise is dropped silently).
//! 2. Checks the scancode against the table bounds.  A violation means the
//!    device reported a button the table was never sized for, so it panics.
//! 3. Looks the scancode up and re-checks the slot's self-index.
//! 4. Warns about unmapped keys, skips empty commands, and otherwise runs the
//!    down- or up-command synchronously through the [`CommandExecutor`].

use std::sync::Arc;

use g600_core::{classify_pair, ButtonAction, CommandTable, Lookup, PairClass, RawEvent, ScanCode};
use tracing::{info, trace, warn};

/// Runs a resolved command to completion.
///
/// The call blocks until the command has finished.  Whether it succeeded is
/// the executor's business: nothing is reported back to the dispatcher.
#[cfg_attr(test, mockall::automock)]
pub trait CommandExecutor: Send + Sync {
    /// Runs `command`, blocking until it terminates.
    fn run(&self, command: &str);
}

/// What one dispatched pair did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The pair was not a button transition.
    Noise,
    /// The button has no binding; a warning was logged.
    Unmapped { scancode: ScanCode },
    /// The button is bound but this transition's command is empty.
    NoOp { action: ButtonAction },
    /// The command ran to completion.
    Executed { action: ButtonAction, command: String },
}

/// Resolves record pairs against the command table.
pub struct Dispatcher {
    table: CommandTable,
    executor: Arc<dyn CommandExecutor>,
}

impl Dispatcher {
    /// Creates a dispatcher that owns the validated `table`.
    pub fn new(table: CommandTable, executor: Arc<dyn CommandExecutor>) -> Self {
        Self { table, executor }
    }

    /// The table this dispatcher resolves against.
    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    /// Interprets two consecutive records.
    ///
    /// # Panics
    ///
    /// Panics if the pair carries a scancode outside the table bounds, or if
    /// the table slot does not store its own index.
    pub fn dispatch_pair(&self, first: &RawEvent, second: &RawEvent) -> DispatchOutcome {
        let class = match classify_pair(first, second) {
            Ok(class) => class,
            Err(e) => panic!("device reported a button the command table cannot hold: {e}"),
        };

        match class {
            PairClass::Noise => {
                trace!(?first, ?second, "discarding non-button record pair");
                DispatchOutcome::Noise
            }
            PairClass::Action(action) => self.dispatch_action(action),
        }
    }

    /// Resolves and runs the command for one button transition.
    ///
    /// # Panics
    ///
    /// Panics if the table slot for the scancode does not store its own index.
    pub fn dispatch_action(&self, action: ButtonAction) -> DispatchOutcome {
        let scancode = action.scancode;
        let binding = match self.table.lookup(scancode) {
            Lookup::Unmapped => return unmapped(scancode),
            Lookup::Bound(binding) => binding,
        };

        assert_eq!(
            binding.scancode(),
            Some(scancode.value()),
            "command table slot {scancode} is not self-indexed"
        );

        if binding.is_silent() {
            return unmapped(scancode);
        }

        let command = binding.command_for(action.transition).unwrap_or_default();
        info!(
            "{} scancode {}. Mapped command: \"{}\"",
            action.transition.verb(),
            scancode,
            command
        );

        if command.is_empty() {
            return DispatchOutcome::NoOp { action };
        }

        self.executor.run(command);
        info!("Subprocess finished.");
        DispatchOutcome::Executed {
            action,
            command: command.to_string(),
        }
    }
}

fn unmapped(scancode: ScanCode) -> DispatchOutcome {
    warn!("Pressed a key ({scancode}) without a mapping.");
    warn!("Suggestion: add a mapping for scancode {scancode} to the command table.");
    DispatchOutcome::Unmapped { scancode }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
