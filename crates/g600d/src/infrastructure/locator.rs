//! Device discovery.
//!
//! udev publishes stable, serial-qualified symlinks for input devices under
//! `/dev/input/by-id/`.  The G600's keyboard interface is the entry whose name
//! starts with the model prefix and ends with the interface suffix; the serial
//! number in between varies per unit.

use std::ffi::OsStr;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, trace};

/// Errors that can occur while locating the device node.
#[derive(Debug, Error)]
pub enum LocateError {
    #[error("cannot list {}: {source}", dir.display())]
    DirectoryUnavailable {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no entry in {} matches {prefix}*{suffix}", dir.display())]
    DeviceNotFound {
        dir: PathBuf,
        prefix: String,
        suffix: String,
    },
}

/// `true` when `name` starts with `prefix` and ends with `suffix`.
///
/// Compares raw bytes, so names that are not valid UTF-8 still match.
pub fn name_matches(name: &OsStr, prefix: &str, suffix: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.starts_with(prefix.as_bytes()) && bytes.ends_with(suffix.as_bytes())
}

/// Finds the first entry of `dir` whose name matches `prefix`/`suffix`.
///
/// "First" is whatever order the directory listing yields.  Entries that
/// cannot be read are skipped.  The returned path is `dir` joined with the
/// entry name; symlinks are not resolved.
///
/// # Errors
///
/// - [`LocateError::DirectoryUnavailable`] if `dir` cannot be listed.
/// - [`LocateError::DeviceNotFound`] if no entry matches.
pub fn locate_device(dir: &Path, prefix: &str, suffix: &str) -> Result<PathBuf, LocateError> {
    let entries = std::fs::read_dir(dir).map_err(|source| LocateError::DirectoryUnavailable {
        dir: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };

        let name = entry.file_name();
        if name_matches(&name, prefix, suffix) {
            let path = dir.join(&name);
            debug!(path = %path.display(), "device node found");
            return Ok(path);
        }
        trace!(entry = ?name, "not the device");
    }

    Err(LocateError::DeviceNotFound {
        dir: dir.to_path_buf(),
        prefix: prefix.to_string(),
        suffix: suffix.to_string(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
