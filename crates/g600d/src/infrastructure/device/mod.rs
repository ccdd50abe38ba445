//! The device node as a byte source.
//!
//! [`session::DeviceSession`] is the real evdev node, opened read-only and
//! grabbed for exclusive use.  [`mock::ScriptedDevice`] replays a fixed script
//! of read results so the event loop can be driven without hardware.
//!
//! Both implement [`std::io::Read`]; the event loop depends on nothing else.

pub mod mock;
pub mod session;
