//! Fixed facts about the Logitech G600.
//!
//! The G600 enumerates as several USB interfaces.  Interface 1 is a keyboard
//! whose udev symlink lives in `/dev/input/by-id/` and looks like
//! `usb-Logitech_Gaming_Mouse_G600_<serial>-if01-event-kbd`.  All remappable
//! G-buttons report through that node.

use std::fmt;

use crate::domain::scancode::ScanCode;
use crate::domain::table::{CommandTable, TableError};

/// Where and how to find a device node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceProfile {
    /// Human-readable device name for log lines.
    pub name: &'static str,
    /// Directory holding the stable device symlinks.
    pub device_dir: &'static str,
    /// Required file name prefix.
    pub prefix: &'static str,
    /// Required file name suffix.
    pub suffix: &'static str,
}

/// The Logitech G600 keyboard interface.
pub const G600: DeviceProfile = DeviceProfile {
    name: "Logitech G600",
    device_dir: "/dev/input/by-id/",
    prefix: "usb-Logitech_Gaming_Mouse_G600_",
    suffix: "-if01-event-kbd",
};

/// How the mouse should be prepared in the vendor software before use.
pub const SETUP_HINTS: &[&str] = &[
    "assign left, right, middle mouse button and vertical mouse wheel to their normal functions",
    "assign the G-Shift button to \"G-Shift\"",
    "assign all other keys (including horizontal mouse wheel) to arbitrary (unique) keyboard keys",
];

/// The remappable G-buttons and the scancodes they report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum GButton {
    G7 = 30,
    G8 = 31,
    G9 = 32,
    G10 = 33,
    G11 = 34,
    G12 = 35,
    G13 = 36,
    G14 = 37,
    G15 = 38,
    G16 = 39,
    G17 = 45,
    G18 = 48,
    G19 = 47,
    G20 = 46,
}

impl GButton {
    /// Every G-button, in label order.
    pub const ALL: [GButton; 14] = [
        GButton::G7,
        GButton::G8,
        GButton::G9,
        GButton::G10,
        GButton::G11,
        GButton::G12,
        GButton::G13,
        GButton::G14,
        GButton::G15,
        GButton::G16,
        GButton::G17,
        GButton::G18,
        GButton::G19,
        GButton::G20,
    ];

    /// The scancode this button reports.
    pub fn scancode(self) -> ScanCode {
        ScanCode(self as u16)
    }

    /// Finds the button that reports `scancode`, if any.
    pub fn from_scancode(scancode: ScanCode) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.scancode() == scancode)
    }
}

impl From<GButton> for ScanCode {
    fn from(button: GButton) -> Self {
        button.scancode()
    }
}

impl fmt::Display for GButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The bindings shipped with the controller.
///
/// G7 holds `t`, G8 closes the focused window, G9..G14 hold the digits 1..6 and
/// G15..G20 hold `z x c v b n`, all through `xdotool`/`xte` on X11.
///
/// # Errors
///
/// Returns [`TableError`] only if this function itself is edited into an
/// inconsistent state.
pub fn default_bindings() -> Result<CommandTable, TableError> {
    CommandTable::builder()
        .bind(GButton::G7, "xdotool keydown t", "xdotool keyup   t")
        .bind(
            GButton::G8,
            "/usr/bin/xte 'keydown Alt_L' 'key F4' 'keyup Alt_L'",
            "",
        )
        .bind(GButton::G9, "xdotool keydown 1", "xdotool keyup   1")
        .bind(GButton::G10, "xdotool keydown 2", "xdotool keyup   2")
        .bind(GButton::G11, "xdotool keydown 3", "xdotool keyup   3")
        .bind(GButton::G12, "xdotool keydown 4", "xdotool keyup   4")
        .bind(GButton::G13, "xdotool keydown 5", "xdotool keyup   5")
        .bind(GButton::G14, "xdotool keydown 6", "xdotool keyup   6")
        .bind(GButton::G15, "xdotool keydown z", "xdotool keyup   z")
        .bind(GButton::G16, "xdotool keydown x", "xdotool keyup   x")
        .bind(GButton::G17, "xdotool keydown c", "xdotool keyup   c")
        .bind(GButton::G18, "xdotool keydown v", "xdotool keyup   v")
        .bind(GButton::G19, "xdotool keydown b", "xdotool keyup   b")
        .bind(GButton::G20, "xdotool keydown n", "xdotool keyup   n")
        .build()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
