//! Error types for ruyi-bridge
//!
//! This module provides the error taxonomy of the bridge:
//! - Launch failures (the `ruyi` binary cannot be located or spawned)
//! - Tool-reported failures (only surfaced under [`ErrorStreamPolicy::ExitStatus`])
//! - Mapping anomalies (a record lacks the fields an entity requires)
//! - Cancellation and timeouts of an in-flight invocation
//!
//! [`ErrorStreamPolicy::ExitStatus`]: crate::config::ErrorStreamPolicy::ExitStatus

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for ruyi-bridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ruyi-bridge
///
/// Each variant carries enough context (command line, path, offending record) to
/// diagnose the failure without re-running the tool.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "binary_name")
        key: Option<String>,
    },

    /// The `ruyi` executable could not be found in PATH
    #[error("binary not found: {0}")]
    BinaryNotFound(String),

    /// The executable exists (or was configured) but could not be spawned
    #[error("failed to launch {}: {source}", .program.display())]
    Launch {
        /// Program that failed to start
        program: PathBuf,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// The tool ran but reported a failure
    #[error("`{command}` failed (exit code {code:?}): {stderr}")]
    ToolReported {
        /// Command line that failed, without the porcelain flag
        command: String,
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
        /// Trimmed standard error text
        stderr: String,
    },

    /// A record could not be converted into a domain entity
    #[error("mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// The invocation was cancelled and the child process killed
    #[error("`{command}` was cancelled")]
    Cancelled {
        /// Command line that was cancelled
        command: String,
    },

    /// The invocation exceeded the configured timeout and the child process was killed
    #[error("`{command}` timed out after {timeout:?}")]
    Timeout {
        /// Command line that timed out
        command: String,
        /// Configured timeout
        timeout: Duration,
    },

    /// Virtual environment destination already exists
    #[error("destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    /// Virtual environment name is not a single plain path component
    #[error("invalid virtual environment name: {0:?}")]
    InvalidVenvName(String),

    /// Path does not contain a ruyi virtual environment
    #[error("not a virtual environment: {}", .0.display())]
    NotAVirtualEnvironment(PathBuf),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error represents a cancelled or timed-out invocation
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Error::Cancelled { .. } | Error::Timeout { .. })
    }

    /// Whether the failure happened before the tool produced any output
    pub fn is_launch_failure(&self) -> bool {
        matches!(self, Error::Launch { .. } | Error::BinaryNotFound(_))
    }
}

/// Record-to-entity mapping errors
#[derive(Debug, Error)]
pub enum MappingError {
    /// A plain-text line reached a mapper that requires a structured document
    #[error("expected a structured {entity} record, got raw line {line:?}")]
    NotStructured {
        /// Entity being mapped (e.g., "package")
        entity: &'static str,
        /// The offending line
        line: String,
    },

    /// A structured document lacks a required field or has a mistyped one
    #[error("malformed {entity} record ({reason}): {line}")]
    Shape {
        /// Entity being mapped (e.g., "news item")
        entity: &'static str,
        /// What was wrong with the document
        reason: String,
        /// The offending line
        line: String,
    },

    /// A line carries no token that could identify the entity
    #[error("empty {entity} record")]
    Empty {
        /// Entity being mapped (e.g., "profile")
        entity: &'static str,
    },
}
