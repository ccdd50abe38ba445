//! g600d library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does g600d do?
//!
//! The daemon turns the G600's extra buttons into shell commands:
//!
//! 1. Finds the mouse's keyboard interface under `/dev/input/by-id/`.
//! 2. Opens it and grabs it exclusively, so the raw keystrokes the mouse is
//!    programmed to send never reach the desktop.
//! 3. Reads `input_event` records in a blocking loop, classifies each
//!    `MSC_SCAN` + `EV_KEY` pair as a press or release of one button.
//! 4. Looks the button up in the command table and runs the down- or
//!    up-command through `sh -c`, waiting for it to finish before reading on.

/// Application layer: dispatcher and the read → dispatch loop.
pub mod application;

/// Runtime settings assembled by the binary.
pub mod config;

/// Infrastructure layer: device discovery, the grabbed device session,
/// command executors, and signal handling.
pub mod infrastructure;
