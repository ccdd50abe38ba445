//! Scripted byte source for tests.
//!
//! Replays a queue of read results in order.  Once the script is exhausted
//! every read returns `Ok(0)`, which the event loop treats as end of stream.

use std::collections::VecDeque;
use std::io::{self, Read};

/// One scripted result of [`Read::read`].
#[derive(Debug, Clone)]
pub enum ReadStep {
    /// Deliver these bytes, truncated to the caller's buffer.
    Data(Vec<u8>),
    /// Fail with [`io::ErrorKind::Interrupted`], as a signal would.
    Interrupted,
    /// Fail with the given kind.
    Fail(io::ErrorKind),
}

/// A [`Read`] implementation that replays [`ReadStep`]s.
#[derive(Debug, Default)]
pub struct ScriptedDevice {
    steps: VecDeque<ReadStep>,
}

impl ScriptedDevice {
    pub fn new(steps: Vec<ReadStep>) -> Self {
        Self {
            steps: steps.into(),
        }
    }

    /// Number of steps not yet replayed.
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

impl Read for ScriptedDevice {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.steps.pop_front() {
            None => Ok(0),
            Some(ReadStep::Data(bytes)) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                Ok(n)
            }
            Some(ReadStep::Interrupted) => Err(io::Error::from(io::ErrorKind::Interrupted)),
            Some(ReadStep::Fail(kind)) => Err(io::Error::from(kind)),
        }
    }
}
