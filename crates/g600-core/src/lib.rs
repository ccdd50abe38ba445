//! # g600-core
//!
//! Shared library for the G600 controller containing the raw input record
//! codec, the scancode and command-table domain, and the device profile of the
//! Logitech G600 gaming mouse.
//!
//! It never opens a device file or spawns a subprocess.  The record layout
//! and event constants come from `libc` and `evdev`.
//!
//! # Architecture overview
//!
//! The G600 exposes its twelve thumb buttons (G9..G20) plus G7/G8 as a USB
//! keyboard interface.  Every button transition arrives on the evdev character
//! device as a pair of fixed-size records: a `MSC_SCAN` record carrying the
//! button's scancode followed by an `EV_KEY` record carrying press/release.
//! The daemon (`g600d`) turns those pairs into shell commands.
//!
//! This crate is the pure foundation:
//!
//! - **`protocol`** – How bytes come off the device.  Raw `input_event`
//!   records are decoded into [`RawEvent`] values.
//!
//! - **`domain`** – The rules: scancode masking and bounds, the dense
//!   [`CommandTable`] with its validation pass, and classification of a record
//!   pair into a [`ButtonAction`].
//!
//! - **`profile`** – The fixed facts about the G600: where its device node
//!   lives, the G-button scancodes, and the default bindings.

pub mod domain;
pub mod profile;
pub mod protocol;

pub use domain::action::{classify_pair, ButtonAction, PairClass, Transition};
pub use domain::scancode::{ScanCode, ScanCodeError, HIGHEST, NELEM, SCANCODE_FLAG_MASK};
pub use domain::table::{CommandBinding, CommandTable, Lookup, TableBuilder, TableError};
pub use profile::{DeviceProfile, GButton, G600};
pub use protocol::record::{decode_record, decode_records, RawEvent, RecordError, RECORD_SIZE};
