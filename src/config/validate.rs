// src/config/validate.rs

use std::str::FromStr;

use nix::sys::signal::Signal;

use crate::config::model::{ConfigFile, FetchSection, RawConfigFile};
use crate::errors::{FetchError, Result};

/// Longest grace period accepted between `SIGTERM` and `SIGKILL`.
pub const MAX_GRACE_PERIOD_MS: u64 = 10_000;

/// Highest descriptor ceiling accepted for the worker's close sweep.
pub const MAX_FD_SWEEP_CEILING: i32 = 65_536;

/// Signals that may be configured as the cancellation request.
///
/// INT and QUIT are always watched; TERM and KILL are what the forwarder
/// sends, and CHLD is how it learns about the worker.
const CANCEL_SIGNALS: &[Signal] = &[
    Signal::SIGUSR1,
    Signal::SIGUSR2,
    Signal::SIGHUP,
    Signal::SIGALRM,
];

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::FetchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_config(&raw)?;
        let signal = parse_cancel_signal(&raw.fetch.cancel_signal)?;
        Ok(ConfigFile::new_unchecked(raw.fetch, signal))
    }
}

/// Run every semantic check on a raw config.
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    validate_timing(&cfg.fetch)?;
    validate_descriptors(&cfg.fetch)?;
    validate_buffers(&cfg.fetch)?;
    parse_cancel_signal(&cfg.fetch.cancel_signal)?;
    Ok(())
}

fn validate_timing(fetch: &FetchSection) -> Result<()> {
    if fetch.grace_period_ms > MAX_GRACE_PERIOD_MS {
        return Err(FetchError::ConfigError(format!(
            "[fetch].grace_period_ms must be <= {} (got {})",
            MAX_GRACE_PERIOD_MS, fetch.grace_period_ms
        )));
    }
    Ok(())
}

fn validate_descriptors(fetch: &FetchSection) -> Result<()> {
    if !(3..=MAX_FD_SWEEP_CEILING).contains(&fetch.fd_sweep_ceiling) {
        return Err(FetchError::ConfigError(format!(
            "[fetch].fd_sweep_ceiling must be within 3..={} (got {})",
            MAX_FD_SWEEP_CEILING, fetch.fd_sweep_ceiling
        )));
    }
    Ok(())
}

fn validate_buffers(fetch: &FetchSection) -> Result<()> {
    if fetch.max_output_bytes == 0 {
        return Err(FetchError::ConfigError(
            "[fetch].max_output_bytes must be >= 1 (got 0)".to_string(),
        ));
    }
    for (key, value) in [
        ("stdout_capacity_hint", fetch.stdout_capacity_hint),
        ("stderr_capacity_hint", fetch.stderr_capacity_hint),
    ] {
        if value == 0 {
            return Err(FetchError::ConfigError(format!(
                "[fetch].{key} must be >= 1 (got 0)"
            )));
        }
        if value > fetch.max_output_bytes {
            return Err(FetchError::ConfigError(format!(
                "[fetch].{key} ({value}) must not exceed max_output_bytes ({})",
                fetch.max_output_bytes
            )));
        }
    }
    Ok(())
}

/// Accepts `SIGUSR1`, `usr1`, `Usr1` and so on.
pub fn parse_cancel_signal(name: &str) -> Result<Signal> {
    let upper = name.trim().to_uppercase();
    let full = if upper.starts_with("SIG") {
        upper
    } else {
        format!("SIG{upper}")
    };

    let signal = Signal::from_str(&full).map_err(|_| {
        FetchError::ConfigError(format!("[fetch].cancel_signal: unknown signal {name:?}"))
    })?;

    if !CANCEL_SIGNALS.contains(&signal) {
        return Err(FetchError::ConfigError(format!(
            "[fetch].cancel_signal: {signal} cannot be used for cancellation \
             (expected one of SIGUSR1, SIGUSR2, SIGHUP, SIGALRM)"
        )));
    }
    Ok(signal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_with(f: impl FnOnce(&mut FetchSection)) -> RawConfigFile {
        let mut raw = RawConfigFile::default();
        f(&mut raw.fetch);
        raw
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = ConfigFile::try_from(RawConfigFile::default()).unwrap();
        assert_eq!(cfg, ConfigFile::default());
        assert_eq!(cfg.cancel_signal(), Signal::SIGUSR1);
    }

    #[test]
    fn signal_names_are_normalised() {
        assert_eq!(parse_cancel_signal("usr2").unwrap(), Signal::SIGUSR2);
        assert_eq!(parse_cancel_signal(" SigHup ").unwrap(), Signal::SIGHUP);
    }

    #[test]
    fn reserved_signals_are_rejected() {
        for name in ["SIGTERM", "SIGKILL", "SIGCHLD", "SIGINT"] {
            assert!(parse_cancel_signal(name).is_err(), "{name} accepted");
        }
        assert!(parse_cancel_signal("SIGNOPE").is_err());
    }

    #[test]
    fn ceiling_below_three_is_rejected() {
        let raw = raw_with(|f| f.fd_sweep_ceiling = 2);
        let err = ConfigFile::try_from(raw).unwrap_err();
        match err {
            FetchError::ConfigError(msg) => assert!(msg.contains("fd_sweep_ceiling")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn hint_larger_than_limit_is_rejected() {
        let raw = raw_with(|f| {
            f.max_output_bytes = 16;
            f.stdout_capacity_hint = 1024;
        });
        assert!(ConfigFile::try_from(raw).is_err());
    }

    #[test]
    fn long_grace_period_is_rejected() {
        let raw = raw_with(|f| f.grace_period_ms = MAX_GRACE_PERIOD_MS + 1);
        assert!(ConfigFile::try_from(raw).is_err());
    }
}
