// src/exec/handshake.rs

//! Fixed-width binary records exchanged between the worker and the caller.
//!
//! - pid record: the worker's `pid_t`, native endian, written to the stdout
//!   pipe before exec.
//! - errno record: a native-endian `i32`, written to the stderr pipe only
//!   when exec fails.

use std::io::{ErrorKind, Read};
use std::mem::size_of;

use nix::errno::Errno;
use nix::unistd::Pid;

use crate::errors::{FetchError, Result};

pub const PID_RECORD_LEN: usize = size_of::<libc::pid_t>();
pub const ERRNO_RECORD_LEN: usize = size_of::<i32>();

/// Exit status of a worker whose exec failed.
pub const EXEC_FAILURE_STATUS: i32 = 127;

pub fn encode_pid(pid: Pid) -> [u8; PID_RECORD_LEN] {
    pid.as_raw().to_ne_bytes()
}

/// Read exactly one pid record, retrying across `EINTR`/`EAGAIN`.
///
/// End of stream before a full record means the worker never reported in
/// (second fork failed, or the worker died first).
pub fn read_pid<R: Read>(reader: &mut R) -> Result<Pid> {
    let mut buf = [0u8; PID_RECORD_LEN];
    let mut filled = 0;

    while filled < PID_RECORD_LEN {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(FetchError::PidHandshake(format!(
                    "stream closed after {filled} of {PID_RECORD_LEN} bytes"
                )));
            }
            Ok(n) => filled += n,
            Err(e) if matches!(e.kind(), ErrorKind::Interrupted | ErrorKind::WouldBlock) => {
                continue;
            }
            Err(e) => return Err(FetchError::PidHandshake(e.to_string())),
        }
    }

    let raw = libc::pid_t::from_ne_bytes(buf);
    if raw <= 0 {
        return Err(FetchError::PidHandshake(format!("garbled pid {raw}")));
    }
    Ok(Pid::from_raw(raw))
}

pub fn encode_errno(errno: Errno) -> [u8; ERRNO_RECORD_LEN] {
    (errno as i32).to_ne_bytes()
}

/// Interpret `bytes` as an errno record. Anything that is not exactly one
/// record holding a known error code yields `None`.
pub fn decode_errno(bytes: &[u8]) -> Option<Errno> {
    let record: [u8; ERRNO_RECORD_LEN] = bytes.try_into().ok()?;
    let raw = i32::from_ne_bytes(record);
    if raw <= 0 {
        return None;
    }
    match Errno::from_raw(raw) {
        Errno::UnknownErrno => None,
        errno => Some(errno),
    }
}
