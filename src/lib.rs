// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod lyrics;
pub mod types;

use std::io::Write;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::cli::CliArgs;
use crate::config::load_or_default;
use crate::exec::{FetchOptions, launch};
use crate::fs::RealFileSystem;
use crate::lyrics::LyricsView;
use crate::types::{CommandSpec, Outcome};

pub use crate::exec::fetch;

/// Process exit code for a command that ran and failed.
pub const EXIT_COMMAND_FAILED: i32 = 1;
/// Process exit code for a command that could not be run at all.
pub const EXIT_NOT_RUN: i32 = 2;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - launching the command
/// - Ctrl-C → out-of-band cancellation
/// - printing (or saving) the outcome
///
/// Returns the process exit code.
pub async fn run(args: CliArgs) -> Result<i32> {
    let cfg = load_or_default(args.config.as_deref()).context("loading config")?;
    let spec = CommandSpec::new(args.command.clone())?;

    let outcome = fetch_until_done(spec.clone(), cfg.options()).await?;

    match outcome {
        Some(Outcome::Success(bytes)) => {
            if let Some(path) = &args.save {
                lyrics::store::save(&RealFileSystem, path, &String::from_utf8_lossy(&bytes))?;
                info!(path = %path.display(), "output saved");
            }
            if args.lyrics {
                print_lyrics(&bytes, args.search.as_deref())?;
            } else {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(&bytes)?;
                stdout.flush()?;
            }
            Ok(0)
        }
        Some(Outcome::Failure(msg)) => {
            eprintln!("{}", msg.trim_end());
            Ok(EXIT_COMMAND_FAILED)
        }
        None => {
            eprintln!("fetchproc: could not run '{}'", spec.program());
            Ok(EXIT_NOT_RUN)
        }
    }
}

/// Launch `spec` and collect it on the blocking pool. A Ctrl-C while it runs
/// is turned into a cancellation request; the outcome is still awaited.
async fn fetch_until_done(spec: CommandSpec, options: FetchOptions) -> Result<Option<Outcome>> {
    let launched = tokio::task::spawn_blocking(move || launch(&spec, &options))
        .await
        .context("launch task failed")?;

    let running = match launched {
        Ok(running) => running,
        Err(err) => {
            error!(error = %err, "could not run command");
            return Ok(None);
        }
    };

    let cancel = running.cancel_handle();
    let mut collect = tokio::task::spawn_blocking(move || running.collect());

    tokio::select! {
        res = &mut collect => Ok(res.context("collect task failed")?),
        sig = tokio::signal::ctrl_c() => {
            match sig {
                Ok(()) => {
                    info!("Ctrl-C received; cancelling command");
                    if let Err(e) = cancel.cancel() {
                        warn!(error = %e, "failed to cancel command");
                    }
                }
                Err(e) => warn!(error = %e, "failed to listen for Ctrl-C"),
            }
            Ok(collect.await.context("collect task failed")?)
        }
    }
}

fn print_lyrics(bytes: &[u8], search: Option<&str>) -> Result<()> {
    let mut view = LyricsView::new();
    view.show(&String::from_utf8_lossy(bytes));

    let mut stdout = std::io::stdout().lock();
    match search {
        Some(query) => {
            for index in view.matching(query) {
                writeln!(stdout, "{}", view.lines()[index])?;
            }
        }
        None => {
            for line in view.lines() {
                writeln!(stdout, "{line}")?;
            }
        }
    }
    Ok(())
}
