// src/lyrics/mod.rs

//! Lyrics view: the consumer of fetched command output.
//!
//! - [`view`]: ordered lines, selection, and the [`LineCursor`] interface.
//! - [`matcher`]: pluggable search matching.
//! - [`store`]: save/load through the [`FileSystem`](crate::fs::FileSystem)
//!   abstraction.
//! - [`fetcher`]: runs a command through a `FetchBackend` into a view.

pub mod fetcher;
pub mod matcher;
pub mod store;
pub mod view;

pub use fetcher::{COULD_NOT_RUN, LyricsFetcher};
pub use matcher::{AllWordsMatcher, Matcher};
pub use view::{LineCursor, LyricsView, PLACEHOLDER};
