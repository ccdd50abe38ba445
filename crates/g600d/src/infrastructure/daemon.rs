//! Wires the daemon together: banner, discovery, session, signals, loop.
//!
//! [`run`] is what the binary calls after parsing its arguments.  Errors come
//! back as `anyhow` chains; [`operator_hints`] turns the known failure kinds
//! into suggestions the binary logs after the error itself.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use anyhow::Context;
use g600_core::profile::SETUP_HINTS;
use g600_core::{CommandTable, G600};
use tracing::{info, warn};

use crate::application::dispatch::{CommandExecutor, Dispatcher};
use crate::application::event_loop::{run_event_loop, EventReader, LoopExit};
use crate::config::DaemonConfig;
use crate::infrastructure::device::session::{DeviceSession, SessionError};
use crate::infrastructure::executor::{DryRunExecutor, ShellExecutor};
use crate::infrastructure::locator::{locate_device, LocateError};
use crate::infrastructure::signals;

/// Printed with every discovery failure.
const PERMISSION_HINT: &str = "Maybe a permission is missing. Try running this program with sudo.";

/// Discovers and opens the device, then reads until the loop stops.
///
/// The session is dropped (and the grab released) before this returns.
///
/// # Errors
///
/// Returns an error wrapping [`LocateError`], [`SessionError`] or
/// [`crate::application::event_loop::ReadError`].
pub fn run(config: &DaemonConfig, table: CommandTable) -> anyhow::Result<LoopExit> {
    info!("Starting {} command controller", G600.name);
    info!("Before running this program, open the vendor configuration software and");
    for hint in SETUP_HINTS {
        info!("  - {hint}");
    }

    let path = locate_device(&config.device_dir, &config.device_prefix, &config.device_suffix)
        .context("could not find the G600 keyboard interface")?;
    info!(path = %path.display(), "found device");

    let session =
        DeviceSession::open(&path).context("could not open the G600 keyboard interface")?;

    let running = Arc::new(AtomicBool::new(true));
    if let Err(e) = signals::install_shutdown_handler(Arc::clone(&running)) {
        warn!(error = %e, "signal handlers not installed; stop the daemon with SIGKILL");
    }

    let executor: Arc<dyn CommandExecutor> = if config.dry_run {
        info!("dry run: commands will be logged, not executed");
        Arc::new(DryRunExecutor)
    } else {
        Arc::new(ShellExecutor::new())
    };

    let dispatcher = Dispatcher::new(table, executor);
    info!(
        bindings = dispatcher.table().bound_count(),
        "ready, waiting for button events"
    );

    let mut reader = EventReader::new(session, running);
    let exit = run_event_loop(&mut reader, &dispatcher).context("event loop stopped")?;
    Ok(exit)
}

/// Suggestions for the operator after `err`, most specific first.
pub fn operator_hints(err: &anyhow::Error) -> Vec<String> {
    if let Some(locate) = err.downcast_ref::<LocateError>() {
        let specific = match locate {
            LocateError::DirectoryUnavailable { dir, .. } => {
                format!("Check that {} exists.", dir.display())
            }
            LocateError::DeviceNotFound { dir, prefix, .. } => format!(
                "Check that a device starting with {prefix} exists in {}.",
                dir.display()
            ),
        };
        return vec![specific, PERMISSION_HINT.to_string()];
    }

    if let Some(session) = err.downcast_ref::<SessionError>() {
        return session.hint().map(str::to_string).into_iter().collect();
    }

    Vec::new()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
