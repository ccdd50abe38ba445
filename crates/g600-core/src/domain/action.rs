//! Classification of raw record pairs into button actions.
//!
//! A G600 button transition always arrives as two consecutive records:
//!
//! ```text
//! { type: EV_MSC, code: MSC_SCAN, value: 0x7001E }   ← which button
//! { type: EV_KEY, code: <keycode>, value: 1 | 0 }    ← press or release
//! ```
//!
//! Anything else in those two positions (sync markers, relative motion, a pair
//! split across reads) is noise.

use std::fmt;

use crate::protocol::record::{RawEvent, EV_KEY, EV_MSC, MSC_SCAN};

use super::scancode::{ScanCode, ScanCodeError};

/// Edge of a button transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Button went down.
    Press,
    /// Button came up.
    Release,
}

impl Transition {
    /// Maps an `EV_KEY` value to a transition; any non-zero value is a press.
    pub fn from_key_value(value: i32) -> Self {
        if value != 0 {
            Transition::Press
        } else {
            Transition::Release
        }
    }

    /// `true` for [`Transition::Press`].
    pub fn is_press(self) -> bool {
        matches!(self, Transition::Press)
    }

    /// Operator-facing verb for log lines.
    pub fn verb(self) -> &'static str {
        match self {
            Transition::Press => "Pressed",
            Transition::Release => "Released",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Press => write!(f, "down"),
            Transition::Release => write!(f, "up"),
        }
    }
}

/// One logical press or release of a G600 button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonAction {
    pub scancode: ScanCode,
    pub transition: Transition,
}

impl ButtonAction {
    /// Shorthand for `transition.is_press()`.
    pub fn pressed(&self) -> bool {
        self.transition.is_press()
    }
}

/// What a record pair turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairClass {
    /// Not a `{MSC,SCAN} → {KEY,*}` pair.
    Noise,
    /// A button transition.
    Action(ButtonAction),
}

/// Classifies two consecutive records.
///
/// # Errors
///
/// Returns [`ScanCodeError::OutOfRange`] when the pair matches but its
/// scancode does not fit the command table.  The device has produced a payload
/// the table was never sized for; callers treat this as fatal.
pub fn classify_pair(first: &RawEvent, second: &RawEvent) -> Result<PairClass, ScanCodeError> {
    if first.event_type != EV_MSC || first.code != MSC_SCAN || second.event_type != EV_KEY {
        return Ok(PairClass::Noise);
    }

    let scancode = ScanCode::from_raw(first.value)?;
    Ok(PairClass::Action(ButtonAction {
        scancode,
        transition: Transition::from_key_value(second.value),
    }))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::record::EV_SYN;

    fn action(pair: Result<PairClass, ScanCodeError>) -> ButtonAction {
        match pair.expect("pair must be in range") {
            PairClass::Action(action) => action,
            PairClass::Noise => panic!("expected a button action, got noise"),
        }
    }

    #[test]
    fn test_classify_press_pair() {
        // Arrange
        let first = RawEvent::scan(0x7001E);
        let second = RawEvent::key(4, 1);

        // Act
        let action = action(classify_pair(&first, &second));

        // Assert
        assert_eq!(action.scancode.value(), 30);
        assert!(action.pressed());
    }

    #[test]
    fn test_classify_release_pair() {
        let action = action(classify_pair(&RawEvent::scan(0x7002D), &RawEvent::key(4, 0)));
        assert_eq!(action.scancode.value(), 45);
        assert_eq!(action.transition, Transition::Release);
    }

    #[test]
    fn test_classify_treats_autorepeat_as_press() {
        let action = action(classify_pair(&RawEvent::scan(31), &RawEvent::key(4, 2)));
        assert_eq!(action.transition, Transition::Press);
    }

    #[test]
    fn test_classify_ignores_key_code_of_second_record() {
        let a = action(classify_pair(&RawEvent::scan(32), &RawEvent::key(0, 1)));
        let b = action(classify_pair(&RawEvent::scan(32), &RawEvent::key(0x1FF, 1)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_classify_wrong_first_type_is_noise() {
        let first = RawEvent::new(EV_SYN, MSC_SCAN, 30);
        assert_eq!(classify_pair(&first, &RawEvent::key(4, 1)), Ok(PairClass::Noise));
    }

    #[test]
    fn test_classify_wrong_first_code_is_noise() {
        let first = RawEvent::new(EV_MSC, 0x05, 30);
        assert_eq!(classify_pair(&first, &RawEvent::key(4, 1)), Ok(PairClass::Noise));
    }

    #[test]
    fn test_classify_wrong_second_type_is_noise() {
        assert_eq!(
            classify_pair(&RawEvent::scan(30), &RawEvent::sync()),
            Ok(PairClass::Noise)
        );
    }

    #[test]
    fn test_classify_noise_is_checked_before_bounds() {
        // An out-of-range value in a non-matching pair is still just noise.
        let first = RawEvent::new(EV_KEY, MSC_SCAN, 0x7FFFF);
        assert_eq!(classify_pair(&first, &RawEvent::key(4, 1)), Ok(PairClass::Noise));
    }

    #[test]
    fn test_classify_out_of_range_scancode_is_error() {
        let result = classify_pair(&RawEvent::scan(0x70031), &RawEvent::key(4, 1));
        assert!(matches!(result, Err(ScanCodeError::OutOfRange { masked: 49, .. })));
    }

    #[test]
    fn test_transition_display_matches_binding_field_names() {
        assert_eq!(Transition::Press.to_string(), "down");
        assert_eq!(Transition::Release.to_string(), "up");
        assert_eq!(Transition::Press.verb(), "Pressed");
    }
}
