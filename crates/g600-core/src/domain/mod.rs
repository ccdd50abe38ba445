//! Domain entities for the G600 controller.
//!
//! This module contains pure rules with no infrastructure dependencies: it
//! never opens a file, reads a device, or spawns a process, so every rule here
//! can be tested on any machine without the mouse attached.
//!
//! - **`scancode`** – Masking raw `MSC_SCAN` payloads and enforcing the table
//!   bounds.
//! - **`table`** – The dense scancode → command table and its validation pass.
//! - **`action`** – Turning a pair of raw records into a press or release.

pub mod action;
pub mod scancode;
pub mod table;
