//! Traits and types for invoking the external tool

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

/// One invocation of the external tool
///
/// Holds the subcommand arguments and optional working directory. The executable
/// and the porcelain flag belong to the [`ToolRunner`], so a request reads like the
/// command a user would type after `ruyi --porcelain`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    args: Vec<String>,
    workdir: Option<PathBuf>,
}

impl InvocationRequest {
    /// Create a request from ordered arguments
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            workdir: None,
        }
    }

    /// Run the command with `dir` as its working directory
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    /// Ordered arguments, without the porcelain flag
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Working directory, if bound
    pub fn workdir(&self) -> Option<&Path> {
        self.workdir.as_deref()
    }

    /// Arguments joined by spaces, for logs and error messages
    pub fn command_line(&self) -> String {
        self.args.join(" ")
    }
}

/// Exit status of the external command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// The command exited successfully (exit code 0)
    Success,
    /// The command exited with a non-zero exit code, or was killed by a signal
    /// (`code` is `None`)
    Failure {
        /// Exit code, if any
        code: Option<i32>,
    },
}

impl ExitStatus {
    /// Returns `true` if the exit status represents success
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Numeric exit code, `None` when terminated by a signal
    pub fn code(self) -> Option<i32> {
        match self {
            Self::Success => Some(0),
            Self::Failure { code } => code,
        }
    }
}

impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        if status.success() {
            Self::Success
        } else {
            Self::Failure {
                code: status.code(),
            }
        }
    }
}

impl From<i32> for ExitStatus {
    fn from(code: i32) -> Self {
        if code == 0 {
            Self::Success
        } else {
            Self::Failure { code: Some(code) }
        }
    }
}

/// Captured output of a finished invocation
///
/// Both buffers are complete: the runner resolves only after both streams
/// closed and the process exited.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationResult {
    /// Everything written to standard output
    pub stdout: String,
    /// Everything written to standard error
    pub stderr: String,
    /// Whether any bytes arrived on standard error
    pub error_observed: bool,
    /// Exit status of the process
    pub status: ExitStatus,
}

impl InvocationResult {
    /// Result text under the never-reject policy
    ///
    /// Trimmed stderr when anything was written to it, trimmed stdout otherwise.
    pub fn text(&self) -> &str {
        if self.error_observed {
            self.stderr.trim()
        } else {
            self.stdout.trim()
        }
    }

    /// Tagged view that separates a tool-reported failure from success
    ///
    /// Success is decided by the exit status alone; stderr written by a
    /// successful run is diagnostic output and does not replace stdout.
    pub fn outcome(&self) -> InvocationOutcome {
        if self.status.is_success() {
            return InvocationOutcome::Succeeded(self.stdout.trim().to_string());
        }

        let text = match self.stderr.trim() {
            "" => self.stdout.trim(),
            stderr => stderr,
        };
        InvocationOutcome::ToolError {
            text: text.to_string(),
            code: self.status.code(),
        }
    }
}

/// Outcome of an invocation that launched
///
/// Launch failures never reach this type; they are `Error::Launch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    /// The tool exited successfully with this trimmed stdout
    Succeeded(String),
    /// The tool exited unsuccessfully
    ToolError {
        /// Trimmed stderr, or stdout when stderr was empty
        text: String,
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
    },
}

/// Trait for running the external tool
///
/// Implementations own how the process is started; callers only supply the
/// subcommand and a cancellation token.
///
/// # Examples
///
/// ```no_run
/// use ruyi_bridge::process::{CliRunner, InvocationRequest, ToolRunner};
/// use tokio_util::sync::CancellationToken;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let runner = CliRunner::from_path().expect("ruyi not found in PATH");
/// let request = InvocationRequest::new(["list", "profiles"]);
///
/// let result = runner.invoke(&request, &CancellationToken::new()).await?;
/// println!("{}", result.text());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Run one invocation to completion
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The executable cannot be spawned (`Error::Launch`)
    /// - `cancel` fires before the process exits (`Error::Cancelled`)
    /// - A configured timeout elapses (`Error::Timeout`)
    /// - Reading the output streams fails (`Error::Io`)
    ///
    /// A process that exits non-zero is *not* an error at this level.
    async fn invoke(
        &self,
        request: &InvocationRequest,
        cancel: &CancellationToken,
    ) -> crate::Result<InvocationResult>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
