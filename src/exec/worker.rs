// src/exec/worker.rs

//! The innermost process: wires descriptors and execs the target.
//!
//! Everything here runs between `fork()` and `exec()`. No locks, no
//! logging; the argument vector was converted to C strings by the caller.

use std::os::fd::{AsRawFd, BorrowedFd, IntoRawFd, OwnedFd, RawFd};

use libc::{STDERR_FILENO, STDIN_FILENO, STDOUT_FILENO};
use nix::errno::Errno;
use nix::fcntl::{FcntlArg, FdFlag, fcntl};
use nix::sys::signal::{SigSet, SigmaskHow, sigprocmask};
use nix::unistd::{close, dup2, execvp, getpid};

use crate::exec::handshake::{EXEC_FAILURE_STATUS, encode_errno, encode_pid};
use crate::exec::process::exit_now;
use crate::types::CommandSpec;

/// Replace the current (worker) process image with `spec`.
///
/// `stdout` and `stderr` are the write ends of the capture pipes; the read
/// ends were dropped by the forwarder before the fork. `original_mask` is the
/// signal mask to restore, undoing the forwarder's blocking.
pub(crate) fn run_worker(
    spec: &CommandSpec,
    stdout: OwnedFd,
    stderr: OwnedFd,
    original_mask: &SigSet,
    fd_sweep_ceiling: i32,
) -> ! {
    if sigprocmask(SigmaskHow::SIG_SETMASK, Some(original_mask), None).is_err() {
        exit_now(EXEC_FAILURE_STATUS);
    }

    // The caller waits on nothing until it has read this record.
    if write_all(stdout.as_raw_fd(), &encode_pid(getpid())).is_err() {
        exit_now(EXEC_FAILURE_STATUS);
    }

    if redirect(stdout, STDOUT_FILENO).is_err() || redirect(stderr, STDERR_FILENO).is_err() {
        exit_now(EXEC_FAILURE_STATUS);
    }

    // Never interactive.
    let _ = close(STDIN_FILENO);

    close_descriptors_from(3, fd_sweep_ceiling);

    let errno = match execvp(spec.c_program(), spec.c_argv()) {
        Ok(never) => match never {},
        Err(errno) => errno,
    };

    let _ = write_all(STDERR_FILENO, &encode_errno(errno));
    exit_now(EXEC_FAILURE_STATUS)
}

/// Make `fd` available at `target` without close-on-exec.
///
/// When the pipe already landed on `target` (the host ran with that standard
/// stream closed) the flag is cleared in place instead of `dup2`ing onto
/// itself, which would leave it set.
fn redirect(fd: OwnedFd, target: RawFd) -> nix::Result<()> {
    if fd.as_raw_fd() == target {
        fcntl(target, FcntlArg::F_SETFD(FdFlag::empty()))?;
        let _ = fd.into_raw_fd();
        return Ok(());
    }
    dup2(fd.as_raw_fd(), target)?;
    Ok(())
}

/// Close every descriptor in `low..high`, ignoring ones that are not open.
fn close_descriptors_from(low: RawFd, high: RawFd) {
    for fd in low..high {
        let _ = close(fd);
    }
}

fn write_all(fd: RawFd, mut buf: &[u8]) -> nix::Result<()> {
    // SAFETY: `fd` is either a pipe end owned by this process or a standard
    // stream set up by `redirect`; it stays open for the duration of the call.
    let fd = unsafe { BorrowedFd::borrow_raw(fd) };
    while !buf.is_empty() {
        match nix::unistd::write(fd, buf) {
            Ok(0) => return Err(Errno::EPIPE),
            Ok(n) => buf = &buf[n..],
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
