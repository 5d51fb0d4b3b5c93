// src/exec/process.rs

//! Small process-level helpers shared by the caller and the forwarder.

use nix::errno::Errno;
use nix::sys::wait::{Id, WaitPidFlag, WaitStatus, waitid, waitpid};
use nix::unistd::Pid;

/// Leave the current process without running destructors or `atexit`
/// hooks. Used on the child side of every `fork()`, where those belong to
/// the caller.
pub(crate) fn exit_now(code: i32) -> ! {
    // SAFETY: `_exit` is async-signal-safe and never returns.
    unsafe { libc::_exit(code) }
}

/// Shell-style status: the exit code, or `128 + signal` for a signal death.
/// Stop/continue notifications yield `None`.
pub fn exit_code_of(status: WaitStatus) -> Option<i32> {
    match status {
        WaitStatus::Exited(_, code) => Some(code),
        WaitStatus::Signaled(_, signal, _) => Some(128 + signal as i32),
        _ => None,
    }
}

/// Block until `pid` terminates and reap it, retrying across `EINTR` and
/// ignoring stop/continue notifications.
pub fn wait_for_exit(pid: Pid) -> nix::Result<i32> {
    loop {
        match waitpid(pid, None) {
            Ok(status) => {
                if let Some(code) = exit_code_of(status) {
                    return Ok(code);
                }
            }
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Block until `pid` terminates but leave it a zombie, so its pid cannot be
/// recycled until [`wait_for_exit`] reaps it.
pub fn wait_until_exited(pid: Pid) -> nix::Result<i32> {
    let flags = WaitPidFlag::WEXITED | WaitPidFlag::WNOWAIT;
    loop {
        match waitid(Id::Pid(pid), flags) {
            Ok(status) => {
                if let Some(code) = exit_code_of(status) {
                    return Ok(code);
                }
            }
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Reap `pid` if it has already terminated.
pub fn try_reap(pid: Pid) -> nix::Result<Option<i32>> {
    loop {
        match waitpid(pid, Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) => return Ok(None),
            Ok(status) => return Ok(exit_code_of(status)),
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(e),
        }
    }
}
