// src/exec/cancel.rs

//! Out-of-band cancellation of a running fetch.

use std::sync::{Arc, Mutex};

use nix::errno::Errno;
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use tracing::debug;

/// Cloneable handle that asks a fetch's forwarder to terminate the worker.
///
/// Cancellation is a request: the caller blocked in
/// [`RunningFetch::collect`](crate::exec::RunningFetch::collect) observes it
/// as an ordinary `Failure` once the worker is gone.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    forwarder: Pid,
    signal: Signal,
    // Set once the forwarder has been reaped; its pid may be recycled after
    // that, so no signal must be sent.
    reaped: Arc<Mutex<bool>>,
}

impl CancelHandle {
    pub(crate) fn new(forwarder: Pid, signal: Signal) -> Self {
        Self {
            forwarder,
            signal,
            reaped: Arc::new(Mutex::new(false)),
        }
    }

    pub fn forwarder_pid(&self) -> Pid {
        self.forwarder
    }

    pub fn signal(&self) -> Signal {
        self.signal
    }

    /// Send the cancellation signal.
    ///
    /// Returns `Ok(false)` when the fetch already finished and nothing was
    /// sent.
    pub fn cancel(&self) -> nix::Result<bool> {
        let reaped = self.reaped.lock().unwrap_or_else(|p| p.into_inner());
        if *reaped {
            debug!(forwarder = %self.forwarder, "fetch already finished; not cancelling");
            return Ok(false);
        }
        match kill(self.forwarder, self.signal) {
            Ok(()) => {
                debug!(forwarder = %self.forwarder, signal = %self.signal, "cancellation sent");
                Ok(true)
            }
            Err(Errno::ESRCH) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Run `reap` with cancellation shut out, then mark the fetch finished.
    ///
    /// `cancel` takes the same lock, so it either signals the forwarder while
    /// it is still unreaped or sees the flag and sends nothing.
    pub(crate) fn finish_with<T>(&self, reap: impl FnOnce() -> T) -> T {
        let mut reaped = self.reaped.lock().unwrap_or_else(|p| p.into_inner());
        let result = reap();
        *reaped = true;
        result
    }

    pub fn is_finished(&self) -> bool {
        *self.reaped.lock().unwrap_or_else(|p| p.into_inner())
    }
}
