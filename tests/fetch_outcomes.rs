// tests/fetch_outcomes.rs

use fetchproc::exec::{FetchOptions, fetch, launch};
use fetchproc::types::{NO_OUTPUT_MESSAGE, Outcome};
use fetchproc_test_utils::builders::ConfigFileBuilder;
use fetchproc_test_utils::{init_tracing, sh, spec};

fn run(spec: &fetchproc::types::CommandSpec) -> Option<Outcome> {
    fetch(spec, &FetchOptions::default())
}

#[test]
fn stdout_of_successful_command_is_returned_verbatim() {
    init_tracing();

    let outcome = run(&spec(&["printf", "%s|", "a", "b c"]));
    assert_eq!(outcome, Some(Outcome::Success(b"a|b c|".to_vec())));
}

#[test]
fn stderr_is_ignored_when_command_succeeds() {
    init_tracing();

    let outcome = run(&sh("echo noise >&2; echo lyrics"));
    assert_eq!(outcome, Some(Outcome::Success(b"lyrics\n".to_vec())));
}

#[test]
fn binary_stdout_is_not_mangled() {
    init_tracing();

    let outcome = run(&sh(r"printf '\000\377\001'"));
    assert_eq!(outcome, Some(Outcome::Success(vec![0x00, 0xff, 0x01])));
}

#[test]
fn empty_stdout_is_a_failure_not_an_empty_success() {
    init_tracing();

    let outcome = run(&spec(&["true"]));
    assert_eq!(outcome, Some(Outcome::Failure(NO_OUTPUT_MESSAGE.to_string())));
}

#[test]
fn stderr_of_failing_command_is_returned_verbatim() {
    init_tracing();

    let outcome = run(&sh("echo partial; echo 'no lyrics for this track' >&2; exit 3"));
    assert_eq!(
        outcome,
        Some(Outcome::Failure("no lyrics for this track\n".to_string()))
    );
}

#[test]
fn silent_failure_still_carries_a_diagnostic() {
    init_tracing();

    match run(&sh("exit 4")) {
        Some(Outcome::Failure(msg)) => assert!(msg.contains("status 4"), "{msg}"),
        other => panic!("expected Failure, got {other:?}"),
    }
}

#[test]
fn missing_program_is_a_readable_failure() {
    init_tracing();

    match run(&spec(&["/definitely/not/a/real/program", "--flag"])) {
        Some(Outcome::Failure(msg)) => {
            assert!(msg.starts_with("failed to execute '/definitely/not/a/real/program'"), "{msg}");
            assert!(msg.contains("No such file or directory"), "{msg}");
        }
        other => panic!("expected Failure, got {other:?}"),
    }
}

#[test]
fn program_is_resolved_through_path() {
    init_tracing();

    let outcome = run(&spec(&["echo", "-n", "found"]));
    assert_eq!(outcome, Some(Outcome::Success(b"found".to_vec())));
}

#[test]
fn stdin_is_closed_in_the_target() {
    init_tracing();

    let outcome = run(&sh("[ -e /proc/self/fd/0 ] && echo open || echo closed"));
    assert_eq!(outcome, Some(Outcome::Success(b"closed\n".to_vec())));
}

#[test]
fn output_beyond_the_limit_is_dropped() {
    init_tracing();

    let options = ConfigFileBuilder::new().max_output_bytes(10).options();
    let outcome = fetch(&spec(&["printf", "0123456789abcdef"]), &options);
    assert_eq!(outcome, Some(Outcome::Success(b"0123456789".to_vec())));
}

#[test]
fn worker_reports_the_pid_that_runs_the_target() {
    init_tracing();

    let running = launch(&sh("echo $$"), &FetchOptions::default()).expect("launch");
    let worker = running.worker_pid();
    assert_ne!(worker, running.forwarder_pid());

    let outcome = running.collect().expect("outcome");
    assert_eq!(outcome.text().trim(), worker.as_raw().to_string());
}

#[test]
fn sequential_invocations_are_independent() {
    init_tracing();

    for i in 0..5 {
        let outcome = run(&spec(&["echo", &i.to_string()]));
        assert_eq!(outcome, Some(Outcome::Success(format!("{i}\n").into_bytes())));
    }
}
