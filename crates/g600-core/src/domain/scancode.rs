//! Button scancodes and their bounds.
//!
//! The G600 reports each button through a `MSC_SCAN` record whose value is a
//! USB usage with vendor/bus flag bits set in `0x70000` (e.g. `0x7001E` for
//! G7).  Clearing those bits yields a small, dense index that is used
//! directly as the [`CommandTable`](super::table::CommandTable) slot.

use std::fmt;

use thiserror::Error;

/// Highest scancode the command table is sized for.
pub const HIGHEST: u16 = 48;

/// Number of command table slots (`HIGHEST + 1`).
pub const NELEM: usize = HIGHEST as usize + 1;

/// Vendor/bus flag bits cleared from the raw `MSC_SCAN` payload.
pub const SCANCODE_FLAG_MASK: i32 = 0x70000;

/// Error returned when a value does not fit the command table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScanCodeError {
    /// The masked payload lies outside `0..=HIGHEST`.
    #[error("scancode {masked} (raw 0x{raw:X}) outside table bounds 0..={HIGHEST}")]
    OutOfRange { raw: i32, masked: i32 },
}

/// Identifies one physical button; always within `0..=HIGHEST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScanCode(pub(crate) u16);

impl ScanCode {
    /// Recovers the button index from a raw `MSC_SCAN` payload.
    ///
    /// # Errors
    ///
    /// Returns [`ScanCodeError::OutOfRange`] if the masked value is negative or
    /// exceeds [`HIGHEST`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use g600_core::ScanCode;
    ///
    /// assert_eq!(ScanCode::from_raw(0x7001E).unwrap().index(), 30);
    /// assert!(ScanCode::from_raw(49).is_err());
    /// ```
    pub fn from_raw(raw: i32) -> Result<Self, ScanCodeError> {
        let masked = raw & !SCANCODE_FLAG_MASK;
        if !(0..=i32::from(HIGHEST)).contains(&masked) {
            return Err(ScanCodeError::OutOfRange { raw, masked });
        }
        Ok(Self(masked as u16))
    }

    /// Builds a scancode from an already-clean index.
    ///
    /// # Errors
    ///
    /// Returns [`ScanCodeError::OutOfRange`] if `code` exceeds [`HIGHEST`].
    pub fn new(code: u16) -> Result<Self, ScanCodeError> {
        if code > HIGHEST {
            return Err(ScanCodeError::OutOfRange {
                raw: i32::from(code),
                masked: i32::from(code),
            });
        }
        Ok(Self(code))
    }

    /// Returns the scancode as a table index.
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// Returns the numeric scancode.
    pub fn value(self) -> u16 {
        self.0
    }

    /// Iterates every scancode the table can hold, in ascending order.
    pub fn all() -> impl Iterator<Item = ScanCode> {
        (0..=HIGHEST).map(ScanCode)
    }
}

impl fmt::Display for ScanCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
