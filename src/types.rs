use std::ffi::{CStr, CString};
use std::fmt;

use crate::errors::{FetchError, Result};

/// Diagnostic returned when a command exits cleanly but prints nothing.
pub const NO_OUTPUT_MESSAGE: &str = "Command produced no output";

/// Immutable argument vector for one invocation: program first, then its
/// arguments.
///
/// The C-string form is built up front so that nothing has to allocate on
/// the far side of a `fork()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    argv: Vec<String>,
    c_argv: Vec<CString>,
}

impl CommandSpec {
    pub fn new<I, S>(argv: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        if argv.is_empty() {
            return Err(FetchError::InvalidCommand(
                "argument vector must contain at least the program".to_string(),
            ));
        }
        if argv[0].is_empty() {
            return Err(FetchError::InvalidCommand(
                "program name must not be empty".to_string(),
            ));
        }

        let c_argv = argv
            .iter()
            .map(|arg| {
                CString::new(arg.as_bytes()).map_err(|_| {
                    FetchError::InvalidCommand(format!(
                        "argument {arg:?} contains an interior NUL byte"
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { argv, c_argv })
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub(crate) fn c_program(&self) -> &CStr {
        &self.c_argv[0]
    }

    pub(crate) fn c_argv(&self) -> &[CString] {
        &self.c_argv
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv.join(" "))
    }
}

/// Result of a command that was actually run.
///
/// An invocation that could not be run (or observed) at all is represented
/// one level up, as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Raw standard output of a command that exited with status 0.
    Success(Vec<u8>),
    /// Human-readable diagnostic: the command's stderr, or a synthesized
    /// message when there is nothing better to report.
    Failure(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Text view of either variant; stdout bytes are decoded lossily.
    pub fn text(&self) -> String {
        match self {
            Outcome::Success(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Outcome::Failure(msg) => msg.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_argv_is_rejected() {
        let err = CommandSpec::new(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, FetchError::InvalidCommand(_)));
    }

    #[test]
    fn interior_nul_is_rejected() {
        let err = CommandSpec::new(["echo", "a\0b"]).unwrap_err();
        match err {
            FetchError::InvalidCommand(msg) => assert!(msg.contains("NUL")),
            other => panic!("expected InvalidCommand, got {other:?}"),
        }
    }

    #[test]
    fn c_argv_mirrors_argv() {
        let spec = CommandSpec::new(["printf", "%s", "x"]).unwrap();
        assert_eq!(spec.program(), "printf");
        assert_eq!(spec.c_program().to_str().unwrap(), "printf");
        assert_eq!(spec.c_argv().len(), 3);
        assert_eq!(spec.to_string(), "printf %s x");
    }

    #[test]
    fn outcome_text_decodes_lossily() {
        let out = Outcome::Success(vec![b'h', b'i', 0xff]);
        assert!(out.is_success());
        assert_eq!(out.text(), "hi\u{fffd}");
        assert_eq!(Outcome::Failure("boom".into()).text(), "boom");
    }
}
