// src/errors.rs

//! Crate-wide error aliases and helpers.

use nix::errno::Errno;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Pipe creation failed: {0}")]
    PipeCreation(Errno),

    #[error("Fork failed: {0}")]
    Fork(Errno),

    #[error("PID handshake failed: {0}")]
    PidHandshake(String),

    #[error("Waiting for command failed: {0}")]
    Wait(Errno),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, FetchError>;
