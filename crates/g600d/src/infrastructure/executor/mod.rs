//! Command executors.
//!
//! - [`ShellExecutor`] hands the command string to `/bin/sh -c` and waits for
//!   it.  Shell syntax (quoting, pipes, redirection) is the shell's business.
//! - [`DryRunExecutor`] only logs what would have run (`--dry-run`).
//! - [`mock::RecordingExecutor`] records commands for tests.
//!
//! Failures are never reported back to the dispatcher: a command that cannot
//! be spawned, or exits non-zero, is logged at debug level and forgotten.

use std::process::Command;

use tracing::{debug, info};

use crate::application::dispatch::CommandExecutor;

pub mod mock;

/// Shell used to interpret command strings.
pub const SHELL: &str = "/bin/sh";

/// Runs commands through `/bin/sh -c`, blocking until they exit.
///
/// The child inherits stdin, stdout and stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellExecutor;

impl ShellExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl CommandExecutor for ShellExecutor {
    fn run(&self, command: &str) {
        match Command::new(SHELL).arg("-c").arg(command).status() {
            Ok(status) if status.success() => {}
            Ok(status) => debug!(command, %status, "command exited unsuccessfully"),
            Err(e) => debug!(command, error = %e, "could not start shell"),
        }
    }
}

/// Logs commands instead of running them.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunExecutor;

impl CommandExecutor for DryRunExecutor {
    fn run(&self, command: &str) {
        info!(command, "dry run, not executing");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
