//! Exclusive access to the evdev node.
//!
//! The node is opened and grabbed through [`evdev::Device`].  While grabbed,
//! events from the device are delivered only to this file descriptor, so the
//! keystrokes the G600 is programmed to emit never reach the rest of the
//! desktop.  The grab is released when the session drops.
//!
//! Reads bypass evdev's event decoding: each [`Read::read`] waits for the
//! descriptor (letting shutdown signals through) and then performs one raw
//! `read(2)` of whole records, so the event loop sees exactly what one read
//! returned.

use std::io::{self, Read};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

use evdev::Device;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::infrastructure::signals;

/// Errors that can occur while opening the device node.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("couldn't open \"{}\" for reading: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SessionError {
    /// A one-line suggestion for the operator, if one applies.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            SessionError::Open { source, .. } => match source.kind() {
                io::ErrorKind::PermissionDenied => {
                    Some("Maybe a permission is missing. Try running this program with sudo.")
                }
                io::ErrorKind::NotFound => {
                    Some("The device disappeared after discovery. Is the mouse still plugged in?")
                }
                _ if source.raw_os_error() == Some(libc::ENOTTY) => {
                    Some("The path is not an input event device. Check --device-suffix.")
                }
                _ => None,
            },
        }
    }
}

/// An open, possibly grabbed, input device.
pub struct DeviceSession {
    device: Device,
    path: PathBuf,
    grabbed: bool,
}

impl DeviceSession {
    /// Opens `path` and tries to grab it.
    ///
    /// A failed grab is logged as a warning and the session stays usable:
    /// events are still read, they just also reach other readers.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Open`] if the node cannot be opened as an
    /// evdev device.
    pub fn open(path: &Path) -> Result<Self, SessionError> {
        let device = Device::open(path).map_err(|source| SessionError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut session = Self {
            device,
            path: path.to_path_buf(),
            grabbed: false,
        };

        match session.device.grab() {
            Ok(()) => {
                session.grabbed = true;
                info!(
                    path = %session.path.display(),
                    name = session.device.name().unwrap_or("unknown"),
                    "device grabbed"
                );
            }
            Err(e) => warn!(
                path = %session.path.display(),
                error = %e,
                "could not grab the device; its keystrokes will also reach other programs"
            ),
        }

        Ok(session)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `true` if the exclusive grab is held.
    pub fn is_grabbed(&self) -> bool {
        self.grabbed
    }
}

impl Read for DeviceSession {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let fd = self.device.as_raw_fd();
        signals::wait_readable(fd)?;

        // SAFETY: `fd` stays open for the lifetime of `self.device`, and the
        // kernel writes at most `buf.len()` bytes into `buf`.
        let n = unsafe { libc::read(fd, buf.as_mut_ptr().cast(), buf.len()) };
        if n < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(n as usize)
    }
}

impl Drop for DeviceSession {
    fn drop(&mut self) {
        if !self.grabbed {
            return;
        }
        match self.device.ungrab() {
            Ok(()) => debug!(path = %self.path.display(), "device released"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to release device grab"),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
