//! Infrastructure layer for the daemon.
//!
//! Contains the OS-facing adapters: directory scanning for the device node,
//! the grabbed device session, subprocess executors, signal handlers, and the
//! `daemon` module that wires them to the application layer.
//!
//! **Dependency rule**: this layer may depend on `application` and `g600_core`,
//! but MUST NOT be imported by the `application` layer outside of tests.

pub mod daemon;
pub mod device;
pub mod executor;
pub mod locator;
pub mod signals;
