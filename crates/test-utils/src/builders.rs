#![allow(dead_code)]

use std::time::Duration;

use fetchproc::config::{ConfigFile, RawConfigFile};
use fetchproc::exec::FetchOptions;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn grace_period_ms(mut self, ms: u64) -> Self {
        self.config.fetch.grace_period_ms = ms;
        self
    }

    pub fn fd_sweep_ceiling(mut self, ceiling: i32) -> Self {
        self.config.fetch.fd_sweep_ceiling = ceiling;
        self
    }

    pub fn max_output_bytes(mut self, limit: usize) -> Self {
        self.config.fetch.max_output_bytes = limit;
        self.config.fetch.stdout_capacity_hint = self.config.fetch.stdout_capacity_hint.min(limit);
        self.config.fetch.stderr_capacity_hint = self.config.fetch.stderr_capacity_hint.min(limit);
        self
    }

    pub fn cancel_signal(mut self, name: &str) -> Self {
        self.config.fetch.cancel_signal = name.to_string();
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }

    pub fn options(self) -> FetchOptions {
        self.build().options()
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Default options with a short grace period, for cancellation tests.
pub fn quick_options() -> FetchOptions {
    FetchOptions {
        grace_period: Duration::from_millis(50),
        ..FetchOptions::default()
    }
}
