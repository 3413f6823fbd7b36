//! Scripted runner that replays canned output

use super::traits::{ExitStatus, InvocationRequest, InvocationResult, ToolRunner};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Canned response for one command line
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    /// The process ran and produced this output
    Output {
        /// Standard output
        stdout: String,
        /// Standard error
        stderr: String,
        /// Exit code
        code: i32,
    },
    /// The process could not be spawned
    LaunchFailure(std::io::ErrorKind),
}

/// Runner that never spawns a process
///
/// Responses are keyed by the exact argument list. Every request is recorded, so
/// tests can assert which commands ran and in what order. Unscripted commands fail
/// as launch errors.
///
/// # Examples
///
/// ```
/// use ruyi_bridge::process::{InvocationRequest, ScriptedRunner, ToolRunner};
/// use tokio_util::sync::CancellationToken;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let runner = ScriptedRunner::new().respond(&["list", "profiles"], "generic\nsipeed-lpi4a\n");
///
/// let result = runner
///     .invoke(&InvocationRequest::new(["list", "profiles"]), &CancellationToken::new())
///     .await?;
/// assert_eq!(result.text(), "generic\nsipeed-lpi4a");
/// assert_eq!(runner.calls().len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    responses: HashMap<Vec<String>, ScriptedResponse>,
    calls: Mutex<Vec<InvocationRequest>>,
}

impl ScriptedRunner {
    /// Create a runner with no scripted commands
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `args` with `stdout` and exit code 0
    pub fn respond(self, args: &[&str], stdout: &str) -> Self {
        self.respond_with(
            args,
            ScriptedResponse::Output {
                stdout: stdout.into(),
                stderr: String::new(),
                code: 0,
            },
        )
    }

    /// Answer `args` with `stderr` and a failing exit code
    pub fn fail(self, args: &[&str], stderr: &str, code: i32) -> Self {
        self.respond_with(
            args,
            ScriptedResponse::Output {
                stdout: String::new(),
                stderr: stderr.into(),
                code,
            },
        )
    }

    /// Answer `args` with an arbitrary response
    pub fn respond_with(mut self, args: &[&str], response: ScriptedResponse) -> Self {
        let key = args.iter().map(|a| a.to_string()).collect();
        self.responses.insert(key, response);
        self
    }

    /// Requests received so far, in order
    pub fn calls(&self) -> Vec<InvocationRequest> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Command lines received so far, in order
    pub fn command_lines(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(InvocationRequest::command_line)
            .collect()
    }
}

#[async_trait]
impl ToolRunner for ScriptedRunner {
    async fn invoke(
        &self,
        request: &InvocationRequest,
        cancel: &CancellationToken,
    ) -> Result<InvocationResult> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        if cancel.is_cancelled() {
            return Err(Error::Cancelled {
                command: request.command_line(),
            });
        }

        match self.responses.get(request.args()) {
            Some(ScriptedResponse::Output {
                stdout,
                stderr,
                code,
            }) => Ok(InvocationResult {
                stdout: stdout.clone(),
                stderr: stderr.clone(),
                error_observed: !stderr.is_empty(),
                status: ExitStatus::from(*code),
            }),
            Some(ScriptedResponse::LaunchFailure(kind)) => Err(Error::Launch {
                program: PathBuf::from("ruyi"),
                source: std::io::Error::new(*kind, "scripted launch failure"),
            }),
            None => Err(Error::Launch {
                program: PathBuf::from("ruyi"),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no scripted response for `{}`", request.command_line()),
                ),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
