//! g600d entry point.
//!
//! Runs a shell command whenever one of the Logitech G600's programmable
//! buttons is pressed or released.
//!
//! # Usage
//!
//! ```text
//! g600d [OPTIONS]
//!
//! Options:
//!   --device-dir    <DIR>     Directory holding device symlinks [default: /dev/input/by-id/]
//!   --device-prefix <PREFIX>  Device file name prefix [default: usb-Logitech_Gaming_Mouse_G600_]
//!   --device-suffix <SUFFIX>  Device file name suffix [default: -if01-event-kbd]
//!   --dry-run                 Log commands instead of running them
//!   --list-bindings           Print the command table and exit
//!   --log-level     <LEVEL>   Log filter when RUST_LOG is unset [default: info]
//! ```
//!
//! # Exit codes
//!
//! | Code | Meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | `0`  | Stopped by SIGINT/SIGTERM/SIGHUP, or `--list-bindings`    |
//! | `1`  | Device not found, not openable, or a device read failed   |
//! | `2`  | The device reported end of stream                         |

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use g600_core::profile::default_bindings;
use g600_core::{CommandTable, GButton, G600};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use g600d::application::event_loop::{exit_status, LoopExit};
use g600d::config::DaemonConfig;
use g600d::infrastructure::daemon::{operator_hints, run};
use g600d::infrastructure::signals;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Logitech G600 button-to-command daemon.
#[derive(Debug, Parser)]
#[command(
    name = "g600d",
    about = "Runs shell commands on Logitech G600 button presses and releases",
    version
)]
struct Cli {
    /// Directory scanned for the mouse's device symlink.
    #[arg(long, default_value = G600.device_dir, env = "G600_DEVICE_DIR")]
    device_dir: PathBuf,

    /// Required prefix of the device file name.
    #[arg(long, default_value = G600.prefix, env = "G600_DEVICE_PREFIX")]
    device_prefix: String,

    /// Required suffix of the device file name.
    ///
    /// The G600's remappable buttons report through its keyboard interface
    /// (`-if01-event-kbd`), not the mouse interface.
    #[arg(long, default_value = G600.suffix, env = "G600_DEVICE_SUFFIX")]
    device_suffix: String,

    /// Log resolved commands instead of running them.
    #[arg(long, env = "G600_DRY_RUN")]
    dry_run: bool,

    /// Print the compiled-in command table and exit.
    #[arg(long)]
    list_bindings: bool,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    /// Converts the parsed CLI arguments into a [`DaemonConfig`].
    fn into_daemon_config(self) -> DaemonConfig {
        DaemonConfig {
            device_dir: self.device_dir,
            device_prefix: self.device_prefix,
            device_suffix: self.device_suffix,
            dry_run: self.dry_run,
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    // The table is compiled in; an inconsistent one is a programming error.
    let table = match default_bindings() {
        Ok(table) => table,
        Err(e) => panic!("built-in command table is inconsistent: {e}"),
    };

    if cli.list_bindings {
        print_bindings(&table);
        return ExitCode::SUCCESS;
    }

    let config = cli.into_daemon_config();
    let outcome = run(&config, table);

    match &outcome {
        Ok(LoopExit::Shutdown) => match signals::last_signal() {
            Some(signal) => info!(signal, "shutdown requested, exiting"),
            None => info!("shutdown requested, exiting"),
        },
        Ok(LoopExit::EndOfStream) => debug!("device stream ended"),
        Err(e) => {
            error!("{e:#}");
            for hint in operator_hints(e) {
                warn!("Suggestion: {hint}");
            }
        }
    }

    ExitCode::from(exit_status(&outcome))
}

fn print_bindings(table: &CommandTable) {
    for (scancode, binding) in table.bindings() {
        let button = GButton::from_scancode(scancode)
            .map(|b| b.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>3}  {:<4}  down: {:?}  up: {:?}",
            scancode.value(),
            button,
            binding.down().unwrap_or_default(),
            binding.up().unwrap_or_default()
        );
    }
}
