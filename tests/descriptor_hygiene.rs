// tests/descriptor_hygiene.rs
//
// These tests inspect the whole process' descriptor table, so they live in
// their own test binary and take a lock to keep from running concurrently.

use std::fs;
use std::os::fd::RawFd;
use std::sync::Mutex;

use nix::fcntl::{FcntlArg, fcntl};
use nix::unistd::close;
use fetchproc::exec::{FetchOptions, fetch};
use fetchproc::types::Outcome;
use fetchproc_test_utils::{init_tracing, sh, spec};

static FD_TABLE: Mutex<()> = Mutex::new(());

fn open_descriptors() -> usize {
    fs::read_dir("/proc/self/fd")
        .expect("procfs is mounted")
        .count()
}

#[test]
fn repeated_fetches_do_not_leak_descriptors() {
    let _guard = FD_TABLE.lock().unwrap_or_else(|p| p.into_inner());
    init_tracing();

    let options = FetchOptions::default();
    // Warm up lazily-opened descriptors (logging, etc.) before the baseline.
    fetch(&spec(&["echo", "warm"]), &options);
    let baseline = open_descriptors();

    for i in 0..20 {
        let argv = if i % 2 == 0 {
            sh("echo out")
        } else {
            sh("echo err >&2; exit 1")
        };
        assert!(fetch(&argv, &options).is_some());
    }
    fetch(&spec(&["/no/such/program"]), &options);

    assert_eq!(open_descriptors(), baseline);
}

#[test]
fn caller_descriptors_are_not_inherited() {
    let _guard = FD_TABLE.lock().unwrap_or_else(|p| p.into_inner());
    init_tracing();

    let file = tempfile::tempfile().expect("tempfile");
    // F_DUPFD (unlike F_DUPFD_CLOEXEC) yields an inheritable descriptor.
    let leaked: RawFd = fcntl(std::os::fd::AsRawFd::as_raw_fd(&file), FcntlArg::F_DUPFD(10))
        .expect("dup descriptor");
    assert!(leaked < 30, "test needs a descriptor below the sweep ceiling");

    let script = format!("[ -e /proc/self/fd/{leaked} ] && echo visible || echo hidden");
    let outcome = fetch(&sh(&script), &FetchOptions::default());

    // Still open on our side.
    assert!(fcntl(leaked, FcntlArg::F_GETFD).is_ok());
    close(leaked).expect("close duplicate");

    assert_eq!(outcome, Some(Outcome::Success(b"hidden\n".to_vec())));
}

#[test]
fn only_standard_streams_reach_the_target() {
    let _guard = FD_TABLE.lock().unwrap_or_else(|p| p.into_inner());
    init_tracing();

    let script = "for fd in 3 4 5 6 7 8 9; do [ -e /proc/self/fd/$fd ] && echo $fd; done; echo end";
    let outcome = fetch(&sh(script), &FetchOptions::default());
    assert_eq!(outcome, Some(Outcome::Success(b"end\n".to_vec())));
}
