// src/exec/backend.rs

//! Pluggable fetch backend for async callers.
//!
//! Consumers such as [`LyricsFetcher`](crate::lyrics::LyricsFetcher) talk to a
//! `FetchBackend` instead of calling the blocking launcher directly:
//!
//! - `RealFetchBackend` runs [`fetch`] on tokio's blocking pool, so forking
//!   and waiting never stall a runtime worker thread.
//! - Tests can provide their own `FetchBackend` that returns canned outcomes
//!   without spawning processes.

use std::future::Future;
use std::pin::Pin;

use tracing::error;

use crate::exec::launcher::{FetchOptions, fetch};
use crate::types::{CommandSpec, Outcome};

/// Trait abstracting how a command is run and captured.
pub trait FetchBackend: Send {
    /// Run `spec` and resolve to its outcome, `None` meaning it could not be
    /// run at all.
    fn fetch(
        &mut self,
        spec: CommandSpec,
    ) -> Pin<Box<dyn Future<Output = Option<Outcome>> + Send + '_>>;
}

/// Backend that forks real processes.
#[derive(Debug, Clone, Default)]
pub struct RealFetchBackend {
    options: FetchOptions,
}

impl RealFetchBackend {
    pub fn new(options: FetchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }
}

impl FetchBackend for RealFetchBackend {
    fn fetch(
        &mut self,
        spec: CommandSpec,
    ) -> Pin<Box<dyn Future<Output = Option<Outcome>> + Send + '_>> {
        // Clone so the blocking closure owns everything it touches.
        let options = self.options.clone();

        Box::pin(async move {
            let program = spec.program().to_string();
            match tokio::task::spawn_blocking(move || fetch(&spec, &options)).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(%program, error = %e, "fetch task panicked or was cancelled");
                    None
                }
            }
        })
    }
}
