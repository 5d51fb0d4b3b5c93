// src/config/mod.rs

//! Configuration loading and validation for fetchproc.
//!
//! - `model.rs`: the TOML-backed data model.
//! - `loader.rs`: reading a config file from disk.
//! - `validate.rs`: range checks and signal-name parsing.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{ConfigFile, FetchSection, RawConfigFile};
pub use validate::{parse_cancel_signal, validate_config};
