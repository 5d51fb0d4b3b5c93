// src/exec/pipe.rs

//! Pipe allocation for the capture channels.
//!
//! Both ends are created close-on-exec. The worker later `dup2`s the write
//! ends onto fds 1 and 2, which clears the flag on the duplicates only, so the
//! originals never reach the exec'd program.
//!
//! After each `fork()` every process drops the ends it does not use:
//! - forwarder: both read ends, then both write ends once the worker exists
//! - worker: nothing left to drop but the write ends, after `dup2`
//! - caller: both write ends, then the unselected read end unread

use std::os::fd::{AsRawFd, OwnedFd, RawFd};

use nix::fcntl::OFlag;
use nix::unistd::pipe2;

use crate::errors::{FetchError, Result};

/// Unidirectional pipe.
#[derive(Debug)]
pub struct Pipe {
    pub read: OwnedFd,
    pub write: OwnedFd,
}

impl Pipe {
    pub fn new() -> Result<Self> {
        let (read, write) = pipe2(OFlag::O_CLOEXEC).map_err(FetchError::PipeCreation)?;
        Ok(Self { read, write })
    }

    #[inline]
    pub fn read_fd(&self) -> RawFd {
        self.read.as_raw_fd()
    }

    #[inline]
    pub fn write_fd(&self) -> RawFd {
        self.write.as_raw_fd()
    }
}

/// The stdout-capture and stderr-capture channels of one invocation.
#[derive(Debug)]
pub struct PipePair {
    pub stdout: Pipe,
    pub stderr: Pipe,
}

impl PipePair {
    /// Allocate both pipes. If the second allocation fails the first pipe is
    /// dropped (closed) before the error is returned.
    pub fn allocate() -> Result<Self> {
        let stdout = Pipe::new()?;
        let stderr = Pipe::new()?;
        Ok(Self { stdout, stderr })
    }
}
