// src/exec/mod.rs

//! Process execution layer.
//!
//! Runs one external command per invocation and captures its output:
//!
//! ```text
//! caller ──fork──▶ forwarder ──fork──▶ worker ──exec──▶ target
//!   ▲                  │                  │
//!   │  waitpid         │ signalfd loop    │ pid record, stdout ─▶ stdout pipe
//!   └──────────────────┘                  │ stderr / errno     ─▶ stderr pipe
//! ```
//!
//! - [`pipe`] allocates the two capture pipes.
//! - [`launcher`] forks the forwarder and performs the pid handshake.
//! - [`forwarder`] forks the worker and relays cancellation to it.
//! - [`worker`] wires descriptors and execs the target.
//! - [`collector`] waits and drains exactly one pipe.
//! - [`handshake`] holds the fixed-width binary records.
//! - [`cancel`] provides the out-of-band [`CancelHandle`].
//! - [`backend`] provides the async `FetchBackend` seam.

pub mod backend;
pub mod cancel;
pub mod collector;
pub mod forwarder;
pub mod handshake;
pub mod launcher;
pub mod pipe;
pub mod process;
mod worker;

pub use backend::{FetchBackend, RealFetchBackend};
pub use cancel::CancelHandle;
pub use launcher::{FetchOptions, RunningFetch, fetch, launch};
