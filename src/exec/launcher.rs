// src/exec/launcher.rs

//! Process launcher: pipes, the first fork, and the pid handshake.

use std::fs::File;
use std::time::Duration;

use nix::sys::signal::Signal;
use nix::unistd::{ForkResult, Pid, fork};
use tracing::{debug, error, info, warn};

use crate::errors::{FetchError, Result};
use crate::exec::cancel::CancelHandle;
use crate::exec::collector;
use crate::exec::forwarder::run_forwarder;
use crate::exec::handshake::read_pid;
use crate::exec::pipe::PipePair;
use crate::exec::process::{wait_for_exit, wait_until_exited};
use crate::types::{CommandSpec, Outcome};

/// Tunables for one invocation. Usually built from the config file with
/// [`ConfigFile::options`](crate::config::ConfigFile::options).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    pub grace_period: Duration,
    pub fd_sweep_ceiling: i32,
    pub stdout_capacity_hint: usize,
    pub stderr_capacity_hint: usize,
    pub max_output_bytes: usize,
    pub cancel_signal: Signal,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            grace_period: Duration::from_millis(200),
            fd_sweep_ceiling: 30,
            stdout_capacity_hint: 1024,
            stderr_capacity_hint: 64,
            max_output_bytes: 1024 * 1024,
            cancel_signal: Signal::SIGUSR1,
        }
    }
}

/// Run `spec` to completion and capture its output.
///
/// - `Some(Success)`: exit status 0 and non-empty stdout.
/// - `Some(Failure)`: the command ran and reported an error (or printed
///   nothing).
/// - `None`: the command could not be run, or its outcome could not be
///   observed.
pub fn fetch(spec: &CommandSpec, options: &FetchOptions) -> Option<Outcome> {
    match launch(spec, options) {
        Ok(running) => running.collect(),
        Err(err) => {
            error!(program = %spec.program(), error = %err, "could not run command");
            None
        }
    }
}

/// Start `spec` and wait until the worker has reported its pid.
///
/// The returned [`RunningFetch`] must be collected to obtain the outcome;
/// dropping it cancels the command.
pub fn launch(spec: &CommandSpec, options: &FetchOptions) -> Result<RunningFetch> {
    let pipes = PipePair::allocate()?;

    info!(program = %spec.program(), argc = spec.argv().len(), "launching command");

    // SAFETY: the caller may be multithreaded, so the child inherits locks
    // owned by threads it does not have. `run_forwarder` takes none of them
    // (no logging, no allocation), never returns into caller code, and
    // leaves through `_exit`.
    let forwarder = match unsafe { fork() } {
        Ok(ForkResult::Child) => run_forwarder(spec, pipes, options),
        Ok(ForkResult::Parent { child }) => child,
        Err(e) => return Err(FetchError::Fork(e)),
    };

    let PipePair { stdout, stderr } = pipes;
    drop(stdout.write);
    drop(stderr.write);

    let mut stdout = File::from(stdout.read);
    let stderr = File::from(stderr.read);
    let cancel = CancelHandle::new(forwarder, options.cancel_signal);

    let worker = match read_pid(&mut stdout) {
        Ok(pid) => pid,
        Err(err) => {
            warn!(%forwarder, error = %err, "worker never reported its pid");
            abandon(&cancel);
            return Err(err);
        }
    };

    debug!(%forwarder, %worker, "pid handshake complete");

    Ok(RunningFetch {
        program: spec.program().to_string(),
        worker,
        cancel,
        stdout: Some(stdout),
        stderr: Some(stderr),
        options: options.clone(),
        collected: false,
    })
}

/// A launched command whose outcome has not been collected yet.
#[derive(Debug)]
pub struct RunningFetch {
    pub(crate) program: String,
    pub(crate) worker: Pid,
    pub(crate) cancel: CancelHandle,
    pub(crate) stdout: Option<File>,
    pub(crate) stderr: Option<File>,
    pub(crate) options: FetchOptions,
    pub(crate) collected: bool,
}

impl RunningFetch {
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Pid of the process that exec'd the target program.
    pub fn worker_pid(&self) -> Pid {
        self.worker
    }

    /// Pid of the signal forwarder, the caller's direct child.
    pub fn forwarder_pid(&self) -> Pid {
        self.cancel.forwarder_pid()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Block until the command finishes and turn its exit status and output
    /// into an [`Outcome`].
    pub fn collect(mut self) -> Option<Outcome> {
        collector::collect(&mut self)
    }
}

impl Drop for RunningFetch {
    fn drop(&mut self) {
        if !self.collected {
            debug!(program = %self.program, "uncollected fetch dropped; cancelling");
            abandon(&self.cancel);
        }
    }
}

/// Cancel and reap a forwarder whose outcome nobody will collect.
fn abandon(cancel: &CancelHandle) {
    if let Err(e) = cancel.cancel() {
        warn!(forwarder = %cancel.forwarder_pid(), error = %e, "failed to cancel forwarder");
    }
    let forwarder = cancel.forwarder_pid();
    let reaped = match wait_until_exited(forwarder) {
        Ok(_) => cancel.finish_with(|| wait_for_exit(forwarder)),
        Err(e) => cancel.finish_with(|| Err(e)),
    };
    if let Err(e) = reaped {
        warn!(%forwarder, error = %FetchError::Wait(e), "failed to reap forwarder");
    }
}
