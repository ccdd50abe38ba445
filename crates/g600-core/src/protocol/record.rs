//! Decoder for the generic Linux `input_event` record.
//!
//! Wire format is `struct input_event` from `linux/input.h` in native layout:
//! ```text
//! [time:struct timeval][type:u16][code:u16][value:i32]
//! ```
//! That is 24 bytes per record on 64-bit Linux.  The timestamp is skipped on
//! decode; nothing downstream orders by it.
//!
//! # Record classes used by the G600
//!
//! | Constant | evdev name                   | Meaning                                 |
//! |----------|------------------------------|-----------------------------------------|
//! | `EV_SYN` | `EventType::SYNCHRONIZATION` | Frame separator, carries no button data |
//! | `EV_KEY` | `EventType::KEY`             | Key/button state; 1 = down, 0 = up      |
//! | `EV_MSC` | `EventType::MISC`            | With code `MSC_SCAN` it holds the raw   |
//! |          |                              | hardware scancode of the button         |

use std::mem::size_of;
use std::ptr;

use evdev::{EventType, MiscType};
use thiserror::Error;

/// Synchronisation record class.
pub const EV_SYN: u16 = EventType::SYNCHRONIZATION.0;
/// Key/button record class.
pub const EV_KEY: u16 = EventType::KEY.0;
/// Miscellaneous record class.
pub const EV_MSC: u16 = EventType::MISC.0;
/// `EV_MSC` code carrying a raw scancode.
pub const MSC_SCAN: u16 = MiscType::MSC_SCAN.0;

/// Size in bytes of one `input_event` record on this platform.
pub const RECORD_SIZE: usize = size_of::<libc::input_event>();

/// Errors that can occur while decoding records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// The byte slice is shorter than one record.
    #[error("insufficient data: need at least {needed} bytes, got {available}")]
    InsufficientData { needed: usize, available: usize },
}

/// One raw `input_event` as delivered by the kernel, minus its timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    /// Record class (`EV_KEY`, `EV_MSC`, `EV_SYN`, ...).
    pub event_type: u16,
    /// Sub-classification within the class.
    pub code: u16,
    /// Payload.
    pub value: i32,
}

impl RawEvent {
    /// Creates a record from its three fields.
    pub const fn new(event_type: u16, code: u16, value: i32) -> Self {
        Self {
            event_type,
            code,
            value,
        }
    }

    /// The `MSC_SCAN` record the G600 emits ahead of a key transition.
    pub const fn scan(raw_scancode: i32) -> Self {
        Self::new(EV_MSC, MSC_SCAN, raw_scancode)
    }

    /// An `EV_KEY` record; `value` 1 is a press, 0 a release.
    pub const fn key(code: u16, value: i32) -> Self {
        Self::new(EV_KEY, code, value)
    }

    /// An `EV_SYN` / `SYN_REPORT` frame separator.
    pub const fn sync() -> Self {
        Self::new(EV_SYN, 0, 0)
    }

    /// Serialises the record in the kernel layout with a zero timestamp.
    ///
    /// Used to feed scripted devices; the kernel is the only real producer.
    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        // SAFETY: `input_event` is plain old data; all-zero is a valid value.
        let mut raw: libc::input_event = unsafe { std::mem::zeroed() };
        raw.type_ = self.event_type;
        raw.code = self.code;
        raw.value = self.value;

        let mut buf = [0u8; RECORD_SIZE];
        // SAFETY: `buf` is exactly `size_of::<input_event>()` bytes and the
        // destination needs no alignment.
        unsafe { ptr::write_unaligned(buf.as_mut_ptr().cast::<libc::input_event>(), raw) };
        buf
    }
}

/// Decodes one [`RawEvent`] from the beginning of `bytes`.
///
/// # Errors
///
/// Returns [`RecordError::InsufficientData`] if `bytes` holds less than one
/// full record.
pub fn decode_record(bytes: &[u8]) -> Result<RawEvent, RecordError> {
    if bytes.len() < RECORD_SIZE {
        return Err(RecordError::InsufficientData {
            needed: RECORD_SIZE,
            available: bytes.len(),
        });
    }

    // SAFETY: at least `size_of::<input_event>()` bytes are available, every
    // bit pattern is a valid `input_event`, and the read is unaligned.
    let raw: libc::input_event = unsafe { ptr::read_unaligned(bytes.as_ptr().cast()) };
    Ok(RawEvent {
        event_type: raw.type_,
        code: raw.code,
        value: raw.value,
    })
}

/// Decodes every whole record in `bytes`; a trailing partial record is ignored.
pub fn decode_records(bytes: &[u8]) -> impl Iterator<Item = RawEvent> + '_ {
    bytes.chunks_exact(RECORD_SIZE).filter_map(|chunk| decode_record(chunk).ok())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_record_size_is_kernel_layout() {
        assert_eq!(RECORD_SIZE, 24);
    }

    #[test]
    fn test_decode_record_reads_fields_after_timestamp() {
        // Arrange: a timestamp full of garbage must not leak into the fields
        let mut bytes = RawEvent::scan(0x7001E).to_bytes();
        for b in bytes.iter_mut().take(size_of::<libc::timeval>()) {
            *b = 0xFF;
        }

        // Act
        let event = decode_record(&bytes).expect("full record must decode");

        // Assert
        assert_eq!(event.event_type, EV_MSC);
        assert_eq!(event.code, MSC_SCAN);
        assert_eq!(event.value, 0x7001E);
    }

    #[test]
    fn test_decode_record_preserves_negative_values() {
        let bytes = RawEvent::new(0x02, 0x08, -1).to_bytes();
        assert_eq!(decode_record(&bytes).unwrap().value, -1);
    }

    #[test]
    fn test_decode_record_rejects_short_input() {
        // Arrange
        let bytes = [0u8; RECORD_SIZE - 1];

        // Act
        let result = decode_record(&bytes);

        // Assert
        assert_eq!(
            result,
            Err(RecordError::InsufficientData {
                needed: RECORD_SIZE,
                available: RECORD_SIZE - 1
            })
        );
    }

    #[test]
    fn test_decode_records_skips_trailing_partial_record() {
        // Arrange
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&RawEvent::scan(30).to_bytes());
        bytes.extend_from_slice(&RawEvent::key(4, 1).to_bytes());
        bytes.extend_from_slice(&RawEvent::sync().to_bytes()[..5]);

        // Act
        let events: Vec<RawEvent> = decode_records(&bytes).collect();

        // Assert
        assert_eq!(events, vec![RawEvent::scan(30), RawEvent::key(4, 1)]);
    }

    #[test]
    fn test_constants_match_kernel_values() {
        assert_eq!((EV_SYN, EV_KEY, EV_MSC, MSC_SCAN), (0x00, 0x01, 0x04, 0x04));
    }

    #[test]
    fn test_sync_record_has_zero_fields() {
        let event = RawEvent::sync();
        assert_eq!((event.event_type, event.code, event.value), (EV_SYN, 0, 0));
    }
}
