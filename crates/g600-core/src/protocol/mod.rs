//! Protocol module containing the raw evdev record layout and its decoder.

pub mod record;

pub use record::{decode_record, decode_records, RawEvent, RecordError, RECORD_SIZE};
