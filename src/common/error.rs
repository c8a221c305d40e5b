//! Error types for the smoke harness
//!
//! Every failure ends the current smoke test. Messages name the command line,
//! label or archive entry involved so the failing test output is self-explanatory.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the smoke harness
#[derive(Error, Debug)]
pub enum Error {
    // === Command Errors ===
    #[error("command {command} failed")]
    CommandFailed { command: String },

    #[error("command {command} should have failed")]
    CommandSucceeded { command: String },

    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("error ({code}) evaluating query: {command}")]
    QueryFailed { code: i32, command: String },

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Could not determine workspace root: {0}")]
    WorkspaceInfo(String),

    // === Target Errors ===
    #[error("Invalid target label '{label}': {reason}")]
    InvalidLabel { label: String, reason: String },

    #[error("No target has been built yet in this smoke case")]
    NothingBuilt,

    // === Archive Errors ===
    #[error("jar does not contain file [{entry}]")]
    MissingEntry { entry: String },

    #[error("jar should not contain file {entry}")]
    UnexpectedEntry { entry: String },

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Test Errors ===
    #[error("Test assertion failed: {0}")]
    TestAssertion(String),
}

impl Error {
    /// Create a command failed error from an argv
    pub fn command_failed<S: AsRef<str>>(argv: &[S]) -> Self {
        Self::CommandFailed {
            command: join_argv(argv),
        }
    }

    /// Create an error for a command that was expected to fail but succeeded
    pub fn command_succeeded<S: AsRef<str>>(argv: &[S]) -> Self {
        Self::CommandSucceeded {
            command: join_argv(argv),
        }
    }

    /// Create an invalid label error
    pub fn invalid_label(label: &str, reason: &str) -> Self {
        Self::InvalidLabel {
            label: label.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a file read error for a path
    pub fn file_read(path: &std::path::Path, error: io::Error) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }
}

/// Join an argv with single spaces, the way failing commands are reported
pub fn join_argv<S: AsRef<str>>(argv: &[S]) -> String {
    argv.iter().map(|s| s.as_ref()).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_message_names_full_command() {
        let err = Error::command_failed(&["bazel", "build", "//a/b:foo"]);
        assert_eq!(err.to_string(), "command bazel build //a/b:foo failed");
    }

    #[test]
    fn test_command_succeeded_message() {
        let err = Error::command_succeeded(&["bazel", "build", "//a:bad"]);
        assert_eq!(err.to_string(), "command bazel build //a:bad should have failed");
    }

    #[test]
    fn test_query_failed_message_has_exit_code() {
        let err = Error::QueryFailed {
            code: 7,
            command: "bazel query deps(//a:b)".to_string(),
        };
        assert_eq!(err.to_string(), "error (7) evaluating query: bazel query deps(//a:b)");
    }
}
