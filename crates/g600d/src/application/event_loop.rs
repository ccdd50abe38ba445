//! The blocking read → dispatch loop.
//!
//! Each read asks for up to [`READ_CAPACITY`] records at once.  Only the first
//! two records of a read are ever interpreted: the G600 delivers one button
//! transition per read as `MSC_SCAN`, `EV_KEY`, `SYN_REPORT`, and anything
//! after the first pair is a trailing sync.
//!
//! Read results are handled as follows:
//!
//! | Read result                     | Action                                   |
//! |---------------------------------|------------------------------------------|
//! | `Interrupted`, still running    | retry                                    |
//! | `Interrupted`, shutdown flagged | stop with [`LoopExit::Shutdown`]         |
//! | other error                     | stop with [`ReadError`]                  |
//! | 0 bytes                         | stop with [`LoopExit::EndOfStream`]      |
//! | fewer than two records          | discard, read again                      |
//! | two or more records             | dispatch the first pair, unless shutdown |
//! |                                 | was flagged during the read              |
//!
//! The daemon's exit status follows from how the loop stopped; see
//! [`exit_status`].

use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use g600_core::{decode_records, RawEvent, RECORD_SIZE};
use thiserror::Error;
use tracing::{debug, trace};

use super::dispatch::Dispatcher;

/// Maximum number of records requested per read.
pub const READ_CAPACITY: usize = 64;

/// Bytes a read must return before it is interpreted.
const MIN_PAIR_BYTES: usize = 2 * RECORD_SIZE;

/// A read failure the loop cannot recover from.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("reading from the device failed")]
    Io(#[from] io::Error),
}

/// What one read produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// At least two whole records, in device order.
    Records(Vec<RawEvent>),
    /// Fewer bytes than one record pair; ignored.
    Short { bytes: usize },
    /// The device returned zero bytes.
    EndOfStream,
    /// A read was interrupted after the shutdown flag was cleared.
    Shutdown,
}

/// Exit status after a signal-initiated shutdown.
pub const EXIT_SHUTDOWN: u8 = 0;
/// Exit status after a discovery, open, or read failure.
pub const EXIT_FAILURE: u8 = 1;
/// Exit status after the device reported end of stream.
pub const EXIT_END_OF_STREAM: u8 = 2;

/// Why the loop stopped without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    EndOfStream,
    Shutdown,
}

impl LoopExit {
    /// Process exit status for this way of stopping.
    pub fn exit_status(self) -> u8 {
        match self {
            LoopExit::EndOfStream => EXIT_END_OF_STREAM,
            LoopExit::Shutdown => EXIT_SHUTDOWN,
        }
    }
}

/// Process exit status for the outcome of a daemon run.
///
/// Any error (device not found, not openable, read failure) maps to
/// [`EXIT_FAILURE`].
pub fn exit_status<E>(outcome: &Result<LoopExit, E>) -> u8 {
    match outcome {
        Ok(exit) => exit.exit_status(),
        Err(_) => EXIT_FAILURE,
    }
}

/// Reads record batches from any byte source.
///
/// `running` is shared with the signal handler: it starts `true` and is
/// cleared when a termination signal arrives.
pub struct EventReader<R> {
    source: R,
    buf: Vec<u8>,
    running: Arc<AtomicBool>,
}

impl<R: Read> EventReader<R> {
    pub fn new(source: R, running: Arc<AtomicBool>) -> Self {
        Self {
            source,
            buf: vec![0u8; READ_CAPACITY * RECORD_SIZE],
            running,
        }
    }

    /// `false` once shutdown has been requested.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Performs one logical read, retrying interrupted reads while running.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::Io`] for any read error other than
    /// [`io::ErrorKind::Interrupted`].
    pub fn read_batch(&mut self) -> Result<ReadOutcome, ReadError> {
        loop {
            match self.source.read(&mut self.buf) {
                Ok(0) => {
                    debug!("device returned end of stream");
                    return Ok(ReadOutcome::EndOfStream);
                }
                Ok(n) if n < MIN_PAIR_BYTES => {
                    trace!(bytes = n, "discarding short read");
                    return Ok(ReadOutcome::Short { bytes: n });
                }
                Ok(n) => {
                    return Ok(ReadOutcome::Records(decode_records(&self.buf[..n]).collect()));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                    if !self.is_running() {
                        debug!("read interrupted by shutdown request");
                        return Ok(ReadOutcome::Shutdown);
                    }
                    trace!("read interrupted, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Consumes the reader and returns the byte source.
    pub fn into_inner(self) -> R {
        self.source
    }
}

/// Runs until end of stream, shutdown, or a fatal read error.
///
/// Commands run synchronously inside [`Dispatcher::dispatch_pair`], so no
/// read happens while a command is executing.
///
/// # Errors
///
/// Returns [`ReadError`] when the device read fails for a reason other than
/// an interruption.
pub fn run_event_loop<R: Read>(
    reader: &mut EventReader<R>,
    dispatcher: &Dispatcher,
) -> Result<LoopExit, ReadError> {
    loop {
        if !reader.is_running() {
            return Ok(LoopExit::Shutdown);
        }

        match reader.read_batch()? {
            ReadOutcome::Records(records) => {
                if !reader.is_running() {
                    debug!("shutdown requested during read, dropping batch");
                    return Ok(LoopExit::Shutdown);
                }
                if let [first, second, rest @ ..] = records.as_slice() {
                    if !rest.is_empty() {
                        trace!(ignored = rest.len(), "records past the first pair");
                    }
                    dispatcher.dispatch_pair(first, second);
                }
            }
            ReadOutcome::Short { .. } => {}
            ReadOutcome::EndOfStream => return Ok(LoopExit::EndOfStream),
            ReadOutcome::Shutdown => return Ok(LoopExit::Shutdown),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dispatch::MockCommandExecutor;
    use crate::infrastructure::device::mock::{ReadStep, ScriptedDevice};
    use g600_core::{CommandTable, ScanCode};
    use mockall::Sequence;

    fn running() -> Arc<AtomicBool> {
        Arc::new(AtomicBool::new(true))
    }

    fn transition(raw_scancode: i32, value: i32) -> Vec<u8> {
        [
            RawEvent::scan(raw_scancode),
            RawEvent::key(4, value),
            RawEvent::sync(),
        ]
        .iter()
        .flat_map(|event| event.to_bytes())
        .collect()
    }

    fn dispatcher(executor: MockCommandExecutor) -> Dispatcher {
        let table = CommandTable::builder()
            .bind(ScanCode::new(30).unwrap(), "X", "Y")
            .build()
            .unwrap();
        Dispatcher::new(table, Arc::new(executor))
    }

    // ── read_batch ────────────────────────────────────────────────────────────

    #[test]
    fn test_full_read_yields_every_record() {
        // Arrange
        let device = ScriptedDevice::new(vec![ReadStep::Data(transition(30, 1))]);
        let mut reader = EventReader::new(device, running());

        // Act
        let outcome = reader.read_batch().unwrap();

        // Assert
        match outcome {
            ReadOutcome::Records(records) => {
                assert_eq!(records.len(), 3);
                assert_eq!(records[0], RawEvent::scan(30));
            }
            other => panic!("expected records, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_byte_read_is_end_of_stream() {
        let mut reader = EventReader::new(ScriptedDevice::new(vec![]), running());
        assert_eq!(reader.read_batch().unwrap(), ReadOutcome::EndOfStream);
    }

    #[test]
    fn test_one_record_is_a_short_read() {
        let one = RawEvent::scan(30).to_bytes().to_vec();
        let mut reader = EventReader::new(ScriptedDevice::new(vec![ReadStep::Data(one)]), running());

        assert_eq!(
            reader.read_batch().unwrap(),
            ReadOutcome::Short { bytes: RECORD_SIZE }
        );
    }

    #[test]
    fn test_interrupted_read_is_retried_while_running() {
        let device = ScriptedDevice::new(vec![
            ReadStep::Interrupted,
            ReadStep::Interrupted,
            ReadStep::Data(transition(30, 0)),
        ]);
        let mut reader = EventReader::new(device, running());

        assert!(matches!(reader.read_batch().unwrap(), ReadOutcome::Records(_)));
    }

    #[test]
    fn test_interrupted_read_after_shutdown_stops() {
        let flag = running();
        let device = ScriptedDevice::new(vec![ReadStep::Interrupted, ReadStep::Data(transition(30, 1))]);
        let mut reader = EventReader::new(device, Arc::clone(&flag));
        flag.store(false, Ordering::SeqCst);

        assert_eq!(reader.read_batch().unwrap(), ReadOutcome::Shutdown);
    }

    #[test]
    fn test_other_read_errors_are_fatal() {
        let device = ScriptedDevice::new(vec![ReadStep::Fail(io::ErrorKind::PermissionDenied)]);
        let mut reader = EventReader::new(device, running());

        let err = reader.read_batch().unwrap_err();

        assert!(matches!(err, ReadError::Io(ref e) if e.kind() == io::ErrorKind::PermissionDenied));
    }

    // ── run_event_loop ────────────────────────────────────────────────────────

    #[test]
    fn test_loop_dispatches_then_ends_on_end_of_stream() {
        // Arrange
        let mut seq = Sequence::new();
        let mut executor = MockCommandExecutor::new();
        executor
            .expect_run()
            .withf(|command: &str| command == "X")
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        executor
            .expect_run()
            .withf(|command: &str| command == "Y")
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        let device = ScriptedDevice::new(vec![
            ReadStep::Data(transition(0x7001E, 1)),
            ReadStep::Data(transition(0x7001E, 0)),
        ]);
        let mut reader = EventReader::new(device, running());

        // Act
        let exit = run_event_loop(&mut reader, &dispatcher(executor)).unwrap();

        // Assert
        assert_eq!(exit, LoopExit::EndOfStream);
    }

    #[test]
    fn test_loop_skips_short_reads() {
        let mut executor = MockCommandExecutor::new();
        executor.expect_run().times(1).return_const(());
        let device = ScriptedDevice::new(vec![
            ReadStep::Data(vec![0u8; RECORD_SIZE + 3]),
            ReadStep::Data(transition(30, 1)),
        ]);
        let mut reader = EventReader::new(device, running());

        let exit = run_event_loop(&mut reader, &dispatcher(executor)).unwrap();

        assert_eq!(exit, LoopExit::EndOfStream);
    }

    #[test]
    fn test_loop_only_reads_the_first_pair_of_a_batch() {
        // Press and release packed into a single read: only the press counts.
        let mut executor = MockCommandExecutor::new();
        executor
            .expect_run()
            .withf(|command: &str| command == "X")
            .times(1)
            .return_const(());
        let mut bytes = transition(30, 1);
        bytes.extend(transition(30, 0));
        let device = ScriptedDevice::new(vec![ReadStep::Data(bytes)]);
        let mut reader = EventReader::new(device, running());

        run_event_loop(&mut reader, &dispatcher(executor)).unwrap();
    }

    #[test]
    fn test_loop_stops_before_reading_once_shutdown_is_flagged() {
        let mut executor = MockCommandExecutor::new();
        executor.expect_run().never();
        let flag = Arc::new(AtomicBool::new(false));
        let device = ScriptedDevice::new(vec![ReadStep::Data(transition(30, 1))]);
        let mut reader = EventReader::new(device, flag);

        let exit = run_event_loop(&mut reader, &dispatcher(executor)).unwrap();

        assert_eq!(exit, LoopExit::Shutdown);
        assert_eq!(reader.into_inner().remaining(), 1);
    }

    /// Clears the running flag from inside `read`, as a signal landing
    /// during the read would, and still hands back a full batch.
    struct FlagClearingDevice {
        running: Arc<AtomicBool>,
        batch: Option<Vec<u8>>,
    }

    impl Read for FlagClearingDevice {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.running.store(false, Ordering::SeqCst);
            match self.batch.take() {
                Some(bytes) => {
                    buf[..bytes.len()].copy_from_slice(&bytes);
                    Ok(bytes.len())
                }
                None => Ok(0),
            }
        }
    }

    #[test]
    fn test_batch_read_after_shutdown_request_is_not_dispatched() {
        // Arrange
        let mut executor = MockCommandExecutor::new();
        executor.expect_run().never();
        let flag = running();
        let device = FlagClearingDevice {
            running: Arc::clone(&flag),
            batch: Some(transition(30, 1)),
        };
        let mut reader = EventReader::new(device, flag);

        // Act
        let exit = run_event_loop(&mut reader, &dispatcher(executor)).unwrap();

        // Assert
        assert_eq!(exit, LoopExit::Shutdown);
    }

    // ── exit_status ───────────────────────────────────────────────────────────

    #[test]
    fn test_shutdown_exits_zero() {
        assert_eq!(exit_status::<ReadError>(&Ok(LoopExit::Shutdown)), 0);
    }

    #[test]
    fn test_end_of_stream_exits_two() {
        assert_eq!(exit_status::<ReadError>(&Ok(LoopExit::EndOfStream)), 2);
    }

    #[test]
    fn test_error_exits_one() {
        let outcome: Result<LoopExit, ReadError> =
            Err(ReadError::Io(io::Error::from(io::ErrorKind::Other)));
        assert_eq!(exit_status(&outcome), 1);
    }

    #[test]
    fn test_loop_surfaces_fatal_read_error() {
        let mut executor = MockCommandExecutor::new();
        executor.expect_run().never();
        let device = ScriptedDevice::new(vec![ReadStep::Fail(io::ErrorKind::Other)]);
        let mut reader = EventReader::new(device, running());

        assert!(run_event_loop(&mut reader, &dispatcher(executor)).is_err());
    }
}
