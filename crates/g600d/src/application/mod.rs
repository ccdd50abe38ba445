//! Application layer for the daemon.
//!
//! The application layer sits between the pure rules in `g600_core` and the
//! OS-facing infrastructure.  Code here orchestrates domain objects, depends on
//! abstractions (`std::io::Read` for the device, [`dispatch::CommandExecutor`]
//! for subprocesses), and makes no OS calls of its own.
//!
//! # Sub-modules
//!
//! - **`dispatch`** – Interprets one record pair: noise, unmapped key, no-op,
//!   or a command to run.
//! - **`event_loop`** – The blocking read → dispatch loop, including the
//!   interrupted-read, short-read and end-of-stream rules.

pub mod dispatch;
pub mod event_loop;
