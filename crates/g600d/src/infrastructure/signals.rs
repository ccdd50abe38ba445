//! Termination signal handling.
//!
//! SIGINT, SIGTERM and SIGHUP clear the shared `running` flag.  Once the
//! handler is installed those signals stay blocked on the calling thread and
//! are only let through inside [`wait_readable`], which unblocks them
//! atomically for the duration of a `ppoll`.  A signal that arrives while a
//! command runs, or just before the wait starts, is held pending and
//! interrupts the next wait with `EINTR`; none is lost between the flag check
//! and the blocking call.
//!
//! The handler only performs atomic stores.

use std::io;
use std::os::unix::io::RawFd;
use std::ptr;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, OnceLock};

/// Signals that request a clean shutdown.
pub const SHUTDOWN_SIGNALS: [libc::c_int; 3] = [libc::SIGINT, libc::SIGTERM, libc::SIGHUP];

static RUNNING: OnceLock<Arc<AtomicBool>> = OnceLock::new();
static LAST_SIGNAL: AtomicI32 = AtomicI32::new(0);
/// Signal mask in effect while waiting: the mask from before installation.
static WAIT_MASK: OnceLock<libc::sigset_t> = OnceLock::new();

extern "C" fn on_shutdown_signal(signal: libc::c_int) {
    LAST_SIGNAL.store(signal, Ordering::SeqCst);
    if let Some(running) = RUNNING.get() {
        running.store(false, Ordering::SeqCst);
    }
}

/// Installs the shutdown handler for every signal in [`SHUTDOWN_SIGNALS`]
/// and blocks those signals on the calling thread outside [`wait_readable`].
///
/// Can be called once per process, from the thread that reads the device.
///
/// # Errors
///
/// Returns [`io::ErrorKind::AlreadyExists`] on a second call, or the OS error
/// if `sigaction` or `pthread_sigmask` fails.
pub fn install_shutdown_handler(running: Arc<AtomicBool>) -> io::Result<()> {
    if RUNNING.set(running).is_err() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "shutdown handler already installed",
        ));
    }

    for signal in SHUTDOWN_SIGNALS {
        // SAFETY: `action` is fully initialised (zeroed, then mask emptied)
        // before it is passed to sigaction, and the handler is async-signal-safe.
        let rc = unsafe {
            let mut action: libc::sigaction = std::mem::zeroed();
            action.sa_sigaction = on_shutdown_signal as extern "C" fn(libc::c_int) as libc::sighandler_t;
            action.sa_flags = 0;
            libc::sigemptyset(&mut action.sa_mask);
            libc::sigaction(signal, &action, ptr::null_mut())
        };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }
    }

    block_shutdown_signals()
}

fn block_shutdown_signals() -> io::Result<()> {
    // SAFETY: both sets are initialised by sigemptyset / pthread_sigmask
    // before being read.
    let previous = unsafe {
        let mut block: libc::sigset_t = std::mem::zeroed();
        libc::sigemptyset(&mut block);
        for signal in SHUTDOWN_SIGNALS {
            libc::sigaddset(&mut block, signal);
        }

        let mut previous: libc::sigset_t = std::mem::zeroed();
        let rc = libc::pthread_sigmask(libc::SIG_BLOCK, &block, &mut previous);
        if rc != 0 {
            return Err(io::Error::from_raw_os_error(rc));
        }
        previous
    };

    let _ = WAIT_MASK.set(previous);
    Ok(())
}

/// Blocks until `fd` has data (or has hung up).
///
/// Shutdown signals are delivered here and only here once the handler is
/// installed.  Without an installed handler this is a plain `poll`.
///
/// # Errors
///
/// Returns [`io::ErrorKind::Interrupted`] when a signal arrived, or the OS
/// error if `ppoll` fails.
pub fn wait_readable(fd: RawFd) -> io::Result<()> {
    let mut pollfd = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };
    let mask = WAIT_MASK.get().map_or(ptr::null(), |mask| mask as *const libc::sigset_t);

    // SAFETY: `pollfd` outlives the call, a null timeout waits forever, and
    // `mask` is either null or points at a static sigset.
    let rc = unsafe { libc::ppoll(&mut pollfd, 1, ptr::null(), mask) };
    if rc < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

/// The most recent shutdown signal received, if any.
pub fn last_signal() -> Option<libc::c_int> {
    match LAST_SIGNAL.load(Ordering::SeqCst) {
        0 => None,
        signal => Some(signal),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
