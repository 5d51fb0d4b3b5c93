// src/config/model.rs

use std::time::Duration;

use nix::sys::signal::Signal;
use serde::Deserialize;

use crate::exec::FetchOptions;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [fetch]
/// grace_period_ms = 200
/// fd_sweep_ceiling = 30
/// stdout_capacity_hint = 1024
/// stderr_capacity_hint = 64
/// max_output_bytes = 1048576
/// cancel_signal = "SIGUSR1"
/// ```
///
/// Every key is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub fetch: FetchSection,
}

/// `[fetch]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FetchSection {
    /// Time between the graceful `SIGTERM` and the forced `SIGKILL` when a
    /// running command is cancelled.
    #[serde(default = "default_grace_period_ms")]
    pub grace_period_ms: u64,

    /// Descriptors `3..fd_sweep_ceiling` are closed in the worker before exec.
    #[serde(default = "default_fd_sweep_ceiling")]
    pub fd_sweep_ceiling: i32,

    /// Initial buffer capacity when draining stdout.
    #[serde(default = "default_stdout_capacity_hint")]
    pub stdout_capacity_hint: usize,

    /// Initial buffer capacity when draining stderr.
    #[serde(default = "default_stderr_capacity_hint")]
    pub stderr_capacity_hint: usize,

    /// Upper bound on captured bytes per stream; the rest is discarded.
    #[serde(default = "default_max_output_bytes")]
    pub max_output_bytes: usize,

    /// Signal that asks the forwarder to cancel the running command.
    #[serde(default = "default_cancel_signal")]
    pub cancel_signal: String,
}

fn default_grace_period_ms() -> u64 {
    200
}

fn default_fd_sweep_ceiling() -> i32 {
    30
}

fn default_stdout_capacity_hint() -> usize {
    1024
}

fn default_stderr_capacity_hint() -> usize {
    64
}

fn default_max_output_bytes() -> usize {
    1024 * 1024
}

fn default_cancel_signal() -> String {
    "SIGUSR1".to_string()
}

impl Default for FetchSection {
    fn default() -> Self {
        Self {
            grace_period_ms: default_grace_period_ms(),
            fd_sweep_ceiling: default_fd_sweep_ceiling(),
            stdout_capacity_hint: default_stdout_capacity_hint(),
            stderr_capacity_hint: default_stderr_capacity_hint(),
            max_output_bytes: default_max_output_bytes(),
            cancel_signal: default_cancel_signal(),
        }
    }
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (see `validate.rs`) or
/// `Default`, so holders can rely on the checked invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub fetch: FetchSection,
    cancel_signal: Signal,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(fetch: FetchSection, cancel_signal: Signal) -> Self {
        Self {
            fetch,
            cancel_signal,
        }
    }

    pub fn cancel_signal(&self) -> Signal {
        self.cancel_signal
    }

    /// Launcher options derived from this config.
    pub fn options(&self) -> FetchOptions {
        FetchOptions {
            grace_period: Duration::from_millis(self.fetch.grace_period_ms),
            fd_sweep_ceiling: self.fetch.fd_sweep_ceiling,
            stdout_capacity_hint: self.fetch.stdout_capacity_hint,
            stderr_capacity_hint: self.fetch.stderr_capacity_hint,
            max_output_bytes: self.fetch.max_output_bytes,
            cancel_signal: self.cancel_signal,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(FetchSection::default(), Signal::SIGUSR1)
    }
}
