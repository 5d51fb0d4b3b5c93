// src/exec/collector.rs

//! Output collection in the caller: wait, pick a pipe, drain it.

use std::fs::File;
use std::io::{self, Read};

use tracing::{debug, error, info, warn};

use crate::errors::{FetchError, Result};
use crate::exec::handshake::{EXEC_FAILURE_STATUS, decode_errno};
use crate::exec::launcher::RunningFetch;
use crate::exec::process::{wait_for_exit, wait_until_exited};
use crate::types::{NO_OUTPUT_MESSAGE, Outcome};

pub(crate) fn collect(running: &mut RunningFetch) -> Option<Outcome> {
    running.collected = true;
    let status = match wait_status(running) {
        Ok(status) => status,
        Err(err) => {
            let forwarder = running.cancel.forwarder_pid();
            error!(%forwarder, error = %err, "could not observe command");
            return None;
        }
    };

    info!(program = %running.program, worker = %running.worker, status, "command finished");

    let options = &running.options;
    if status != 0 {
        drop(running.stdout.take());
        let mut stderr = running.stderr.take()?;
        match read_bounded(&mut stderr, options.stderr_capacity_hint, options.max_output_bytes) {
            Ok(bytes) => {
                let text = failure_text(&running.program, status, &bytes);
                debug!(program = %running.program, error = %text, "command reported an error");
                Some(Outcome::Failure(text))
            }
            Err(e) => {
                error!(program = %running.program, error = %e, "reading stderr of failed command");
                None
            }
        }
    } else {
        drop(running.stderr.take());
        let mut stdout = running.stdout.take()?;
        match read_bounded(&mut stdout, options.stdout_capacity_hint, options.max_output_bytes) {
            Ok(bytes) if !bytes.is_empty() => Some(Outcome::Success(bytes)),
            Ok(_) => Some(Outcome::Failure(NO_OUTPUT_MESSAGE.to_string())),
            Err(e) => {
                debug!(program = %running.program, error = %e, "reading stdout failed");
                Some(Outcome::Failure(NO_OUTPUT_MESSAGE.to_string()))
            }
        }
    }
}

/// Wait for the forwarder to exit, then reap it with cancellation shut out.
fn wait_status(running: &RunningFetch) -> Result<i32> {
    let forwarder = running.cancel.forwarder_pid();
    if let Err(e) = wait_until_exited(forwarder) {
        running.cancel.finish_with(|| ());
        return Err(FetchError::Wait(e));
    }
    running
        .cancel
        .finish_with(|| wait_for_exit(forwarder))
        .map_err(FetchError::Wait)
}

/// Diagnostic for a non-zero exit.
///
/// An exec failure arrives as a single binary errno record rather than text;
/// it is decoded here so callers always get something readable.
pub fn failure_text(program: &str, status: i32, stderr: &[u8]) -> String {
    if status == EXEC_FAILURE_STATUS {
        if let Some(errno) = decode_errno(stderr) {
            return format!("failed to execute '{program}': {}", errno.desc());
        }
    }
    if stderr.is_empty() {
        return format!("'{program}' exited with status {status} and no error output");
    }
    String::from_utf8_lossy(stderr).into_owned()
}

/// Read to end of stream, keeping at most `limit` bytes.
fn read_bounded(pipe: &mut File, capacity_hint: usize, limit: usize) -> io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(capacity_hint.min(limit));
    pipe.by_ref().take(limit as u64).read_to_end(&mut buf)?;

    if buf.len() == limit {
        let mut probe = [0u8; 1];
        if matches!(pipe.read(&mut probe), Ok(n) if n > 0) {
            warn!(limit, "command output truncated");
        }
    }
    Ok(buf)
}
