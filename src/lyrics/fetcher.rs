// src/lyrics/fetcher.rs

use tracing::{info, warn};

use crate::exec::FetchBackend;
use crate::lyrics::view::LyricsView;
use crate::types::{CommandSpec, Outcome};

/// Line shown when the fetch command could not be run at all.
pub const COULD_NOT_RUN: &str = "Could not run the lyrics fetch command";

/// Runs a lyrics command through a [`FetchBackend`] and shows whatever it
/// produced.
#[derive(Debug)]
pub struct LyricsFetcher<B> {
    backend: B,
}

impl<B: FetchBackend> LyricsFetcher<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Fetch and replace `view`'s contents.
    ///
    /// - `Success`: the output, one line per view line.
    /// - `Failure`: the diagnostic text, so the user sees why.
    /// - `None`: a single [`COULD_NOT_RUN`] line.
    pub async fn fetch_into(&mut self, spec: CommandSpec, view: &mut LyricsView) -> Option<Outcome> {
        let program = spec.program().to_string();
        let outcome = self.backend.fetch(spec).await;

        match &outcome {
            Some(Outcome::Success(bytes)) => {
                info!(%program, bytes = bytes.len(), "lyrics fetched");
                view.show(&String::from_utf8_lossy(bytes));
            }
            Some(Outcome::Failure(msg)) => {
                warn!(%program, error = %msg, "lyrics command failed");
                view.show(msg);
            }
            None => {
                view.clear();
                view.add_line(COULD_NOT_RUN);
            }
        }

        outcome
    }
}
