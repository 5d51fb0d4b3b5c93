// src/exec/forwarder.rs

//! The intermediate process between the caller and the worker.
//!
//! The forwarder forks the worker, then turns the watched signals into a
//! `signalfd` stream and reads it one event at a time:
//!
//! - INT / QUIT / the configured cancel signal: `SIGTERM` the worker, sleep
//!   the grace period, `SIGKILL` it, reap it, exit.
//! - CHLD: if the worker has terminated, reap it and exit with its status.
//! - anything else: log and keep waiting.
//!
//! The forwarder exits with the worker's shell-style status so the caller's
//! single `waitpid` on the forwarder observes the worker's outcome.
//!
//! It is forked from a possibly multithreaded caller, so it inherits locks
//! (the stderr lock, the allocator's, the log subscriber's) held by threads
//! that do not exist in the child. Nothing here may take one: no logging, no
//! allocation, only raw syscalls. Failures are reported through the exit
//! status alone.

use std::thread;
use std::time::Duration;

use nix::errno::Errno;
use nix::sys::signal::{SigSet, SigmaskHow, Signal, kill, sigprocmask};
use nix::sys::signalfd::{SfdFlags, SignalFd};
use nix::unistd::{ForkResult, Pid, fork};

use crate::exec::launcher::FetchOptions;
use crate::exec::pipe::PipePair;
use crate::exec::process::{exit_now, try_reap, wait_for_exit};
use crate::exec::worker::run_worker;
use crate::types::CommandSpec;

/// Exit status of a forwarder that could not do its job (second fork
/// failed, signal stream broken).
pub const FORWARDER_FAILURE_STATUS: i32 = 125;

/// Exit status reported for a cancelled worker that nevertheless exited 0
/// on `SIGTERM`; a cancelled run never looks like a success.
pub const CANCELLED_STATUS: i32 = 128 + Signal::SIGTERM as i32;

/// Entry point of the forwarder, called on the child side of the first fork.
pub(crate) fn run_forwarder(spec: &CommandSpec, pipes: PipePair, options: &FetchOptions) -> ! {
    let PipePair { stdout, stderr } = pipes;
    drop(stdout.read);
    drop(stderr.read);

    let watched = watched_signals(options.cancel_signal);

    // Block before forking so a worker that exits immediately still leaves
    // a pending CHLD behind for the signalfd.
    let mut original = SigSet::empty();
    if sigprocmask(SigmaskHow::SIG_BLOCK, Some(&watched), Some(&mut original)).is_err() {
        exit_now(FORWARDER_FAILURE_STATUS);
    }

    // SAFETY: the child only runs `run_worker`, which sticks to
    // async-signal-safe calls until exec.
    let worker = match unsafe { fork() } {
        Ok(ForkResult::Child) => run_worker(
            spec,
            stdout.write,
            stderr.write,
            &original,
            options.fd_sweep_ceiling,
        ),
        Ok(ForkResult::Parent { child }) => child,
        Err(_) => exit_now(FORWARDER_FAILURE_STATUS),
    };

    drop(stdout.write);
    drop(stderr.write);

    let code = watch(worker, &watched, options);
    exit_now(code)
}

/// INT, QUIT, CHLD and the configured cancellation signal.
pub fn watched_signals(cancel: Signal) -> SigSet {
    let mut set = SigSet::empty();
    set.add(Signal::SIGINT);
    set.add(Signal::SIGQUIT);
    set.add(Signal::SIGCHLD);
    set.add(cancel);
    set
}

/// What the forwarder does with one signal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalAction {
    /// Terminate the worker, gracefully first.
    Cancel,
    /// The worker may have changed state; check whether it is gone.
    ChildChanged,
    /// Not one of ours; keep waiting.
    Ignore,
}

pub fn classify(signal: Signal, cancel: Signal) -> SignalAction {
    match signal {
        Signal::SIGCHLD => SignalAction::ChildChanged,
        Signal::SIGINT | Signal::SIGQUIT => SignalAction::Cancel,
        s if s == cancel => SignalAction::Cancel,
        _ => SignalAction::Ignore,
    }
}

fn watch(worker: Pid, watched: &SigSet, options: &FetchOptions) -> i32 {
    let mut events = match SignalFd::with_flags(watched, SfdFlags::SFD_CLOEXEC) {
        Ok(fd) => fd,
        Err(_) => return abort_worker(worker),
    };

    loop {
        let info = match events.read_signal() {
            Ok(Some(info)) => info,
            Err(Errno::EINTR) => continue,
            // Short record or broken stream.
            Ok(None) | Err(_) => return abort_worker(worker),
        };

        let Ok(signal) = Signal::try_from(info.ssi_signo as i32) else {
            return abort_worker(worker);
        };

        match classify(signal, options.cancel_signal) {
            SignalAction::Cancel => return terminate(worker, options.grace_period),
            SignalAction::ChildChanged => match try_reap(worker) {
                Ok(Some(code)) => return code,
                Ok(None) => continue,
                Err(_) => return FORWARDER_FAILURE_STATUS,
            },
            SignalAction::Ignore => {}
        }
    }
}

/// Graceful-then-forceful termination. The `SIGKILL` is sent whether or not
/// the worker reacted to `SIGTERM`; until reaped the worker's pid cannot be
/// recycled, so the second signal can only hit the worker or its zombie.
fn terminate(worker: Pid, grace: Duration) -> i32 {
    send(worker, Signal::SIGTERM);
    thread::sleep(grace);
    send(worker, Signal::SIGKILL);

    match wait_for_exit(worker) {
        Ok(0) => CANCELLED_STATUS,
        Ok(code) => code,
        Err(_) => FORWARDER_FAILURE_STATUS,
    }
}

/// The signal stream is unusable; do not leave the worker running unwatched.
fn abort_worker(worker: Pid) -> i32 {
    send(worker, Signal::SIGKILL);
    let _ = wait_for_exit(worker);
    FORWARDER_FAILURE_STATUS
}

/// ESRCH only means the worker is already gone.
fn send(worker: Pid, signal: Signal) {
    let _ = kill(worker, signal);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watched_set_contains_cancel_signal() {
        let set = watched_signals(Signal::SIGUSR2);
        for s in [
            Signal::SIGINT,
            Signal::SIGQUIT,
            Signal::SIGCHLD,
            Signal::SIGUSR2,
        ] {
            assert!(set.contains(s), "{s} missing");
        }
        assert!(!set.contains(Signal::SIGUSR1));
        assert!(!set.contains(Signal::SIGTERM));
    }

    #[test]
    fn classification() {
        let cancel = Signal::SIGUSR1;
        assert_eq!(classify(Signal::SIGINT, cancel), SignalAction::Cancel);
        assert_eq!(classify(Signal::SIGQUIT, cancel), SignalAction::Cancel);
        assert_eq!(classify(Signal::SIGUSR1, cancel), SignalAction::Cancel);
        assert_eq!(classify(Signal::SIGCHLD, cancel), SignalAction::ChildChanged);
        assert_eq!(classify(Signal::SIGUSR2, cancel), SignalAction::Ignore);
    }

    #[test]
    fn cancelled_status_is_nonzero() {
        assert_eq!(CANCELLED_STATUS, 143);
    }
}
