//! Daemon configuration types.
//!
//! [`DaemonConfig`] is the single source of truth for all runtime settings.
//! The binary builds it from CLI arguments and environment variables; tests
//! build it directly.  The command table itself is not part of it: bindings
//! are compiled in (see [`g600_core::profile::default_bindings`]).

use std::path::PathBuf;

use g600_core::{DeviceProfile, G600};

/// All runtime configuration for the daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    /// Directory scanned for the device symlink.
    pub device_dir: PathBuf,
    /// Required prefix of the device file name.
    pub device_prefix: String,
    /// Required suffix of the device file name.
    pub device_suffix: String,
    /// Log resolved commands instead of running them.
    pub dry_run: bool,
}

impl DaemonConfig {
    /// Configuration that locates the device described by `profile`.
    pub fn for_profile(profile: &DeviceProfile) -> Self {
        Self {
            device_dir: PathBuf::from(profile.device_dir),
            device_prefix: profile.prefix.to_string(),
            device_suffix: profile.suffix.to_string(),
            dry_run: false,
        }
    }
}

impl Default for DaemonConfig {
    /// Returns the G600 settings.
    ///
    /// | Field         | Default                            |
    /// |---------------|------------------------------------|
    /// | device_dir    | `/dev/input/by-id/`                |
    /// | device_prefix | `usb-Logitech_Gaming_Mouse_G600_`  |
    /// | device_suffix | `-if01-event-kbd`                  |
    /// | dry_run       | `false`                            |
    fn default() -> Self {
        Self::for_profile(&G600)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dir_is_by_id() {
        let cfg = DaemonConfig::default();
        assert_eq!(cfg.device_dir, PathBuf::from("/dev/input/by-id/"));
    }

    #[test]
    fn test_default_matches_g600_keyboard_interface() {
        let cfg = DaemonConfig::default();
        assert_eq!(cfg.device_prefix, "usb-Logitech_Gaming_Mouse_G600_");
        assert_eq!(cfg.device_suffix, "-if01-event-kbd");
    }

    #[test]
    fn test_default_runs_commands() {
        assert!(!DaemonConfig::default().dry_run);
    }

    #[test]
    fn test_for_profile_uses_profile_fields() {
        let profile = DeviceProfile {
            name: "test",
            device_dir: "/tmp/devs",
            prefix: "usb-Test_",
            suffix: "-event-kbd",
        };
        let cfg = DaemonConfig::for_profile(&profile);
        assert_eq!(cfg.device_dir, PathBuf::from("/tmp/devs"));
        assert_eq!(cfg.device_prefix, "usb-Test_");
        assert_eq!(cfg.device_suffix, "-event-kbd");
    }
}
