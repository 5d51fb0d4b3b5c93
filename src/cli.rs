// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `fetchproc`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fetchproc",
    version,
    about = "Run a command, capture its output, and cancel it out-of-band.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Fetchproc.toml` in the current working directory if it
    /// exists, built-in defaults otherwise.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FETCHPROC_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Treat the output as lyrics: print it line by line through the lyrics
    /// view, dropping blank lines.
    #[arg(long)]
    pub lyrics: bool,

    /// With `--lyrics`, only print lines containing every word of QUERY.
    #[arg(long, value_name = "QUERY", requires = "lyrics")]
    pub search: Option<String>,

    /// Also save successful output to this file.
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,

    /// Program to run, followed by its arguments.
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND"
    )]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_keeps_its_own_flags() {
        let args = CliArgs::try_parse_from(["fetchproc", "--lyrics", "--", "ls", "-la", "/tmp"]).unwrap();
        assert!(args.lyrics);
        assert_eq!(args.command, vec!["ls", "-la", "/tmp"]);
    }

    #[test]
    fn search_requires_lyrics() {
        assert!(CliArgs::try_parse_from(["fetchproc", "--search", "x", "echo"]).is_err());
    }

    #[test]
    fn command_is_required() {
        assert!(CliArgs::try_parse_from(["fetchproc"]).is_err());
    }
}
