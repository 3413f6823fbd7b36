//! CLI-based runner that spawns the external ruyi binary

use super::traits::{ExitStatus, InvocationRequest, InvocationResult, ToolRunner};
use crate::config::Config;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

/// CLI-based runner using the external `ruyi` binary
///
/// Every invocation runs `<binary> <porcelain flag> <args...>`, pipes stdout and
/// stderr, and drains both concurrently until they close and the process exits.
///
/// # Examples
///
/// ```no_run
/// use ruyi_bridge::process::CliRunner;
/// use std::path::PathBuf;
///
/// // Explicit path
/// let runner = CliRunner::new(PathBuf::from("/usr/local/bin/ruyi"));
///
/// // Or auto-discover from PATH
/// let runner = CliRunner::from_path().expect("ruyi not found in PATH");
/// ```
#[derive(Debug, Clone)]
pub struct CliRunner {
    binary_path: PathBuf,
    porcelain_flag: String,
    env: HashMap<String, String>,
    timeout: Option<Duration>,
}

impl CliRunner {
    /// Create a runner with an explicit binary path and default settings
    pub fn new(binary_path: PathBuf) -> Self {
        let defaults = Config::default();
        Self {
            binary_path,
            porcelain_flag: defaults.tool.porcelain_flag,
            env: defaults.tool.env,
            timeout: defaults.invocation.timeout,
        }
    }

    /// Attempt to find `ruyi` in PATH
    ///
    /// Returns `None` if the binary is not found.
    pub fn from_path() -> Option<Self> {
        which::which("ruyi").ok().map(Self::new)
    }

    /// Build a runner from configuration
    ///
    /// Uses `binary_path` when set, otherwise searches PATH for `binary_name`
    /// (unless `search_path` is disabled).
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let tool = &config.tool;
        let binary_path = match &tool.binary_path {
            Some(path) => path.clone(),
            None if tool.search_path => which::which(&tool.binary_name).map_err(|e| {
                Error::BinaryNotFound(format!("{} not found in PATH: {}", tool.binary_name, e))
            })?,
            None => {
                return Err(Error::BinaryNotFound(format!(
                    "{}: no binary_path configured and PATH search is disabled",
                    tool.binary_name
                )));
            }
        };

        Ok(Self {
            binary_path,
            porcelain_flag: tool.porcelain_flag.clone(),
            env: tool.env.clone(),
            timeout: config.invocation.timeout,
        })
    }

    /// Kill the child and fail with `Error::Timeout` after `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Path of the executable this runner spawns
    pub fn binary_path(&self) -> &PathBuf {
        &self.binary_path
    }

    fn command(&self, request: &InvocationRequest) -> Command {
        let mut command = Command::new(&self.binary_path);
        command
            .arg(&self.porcelain_flag)
            .args(request.args())
            .envs(&self.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = request.workdir() {
            command.current_dir(dir);
        }
        command
    }
}

/// How waiting on the child ended
enum Completion {
    Finished(std::io::Result<(Vec<u8>, Vec<u8>, std::process::ExitStatus)>),
    Cancelled,
    TimedOut(Duration),
}

#[async_trait]
impl ToolRunner for CliRunner {
    async fn invoke(
        &self,
        request: &InvocationRequest,
        cancel: &CancellationToken,
    ) -> Result<InvocationResult> {
        let command_line = request.command_line();
        if cancel.is_cancelled() {
            return Err(Error::Cancelled {
                command: command_line,
            });
        }

        debug!(
            program = ?self.binary_path,
            args = ?request.args(),
            workdir = ?request.workdir(),
            "invoking ruyi"
        );

        let mut child = self.command(request).spawn().map_err(|source| Error::Launch {
            program: self.binary_path.clone(),
            source,
        })?;

        let completion = tokio::select! {
            captured = capture(&mut child) => Completion::Finished(captured),
            _ = cancel.cancelled() => Completion::Cancelled,
            elapsed = deadline(self.timeout) => Completion::TimedOut(elapsed),
        };

        let (stdout, stderr, status) = match completion {
            Completion::Finished(captured) => captured?,
            Completion::Cancelled => {
                terminate(&mut child, &command_line).await;
                return Err(Error::Cancelled {
                    command: command_line,
                });
            }
            Completion::TimedOut(timeout) => {
                terminate(&mut child, &command_line).await;
                return Err(Error::Timeout {
                    command: command_line,
                    timeout,
                });
            }
        };

        let result = InvocationResult {
            error_observed: !stderr.is_empty(),
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
            status: ExitStatus::from(status),
        };

        debug!(
            command = %command_line,
            code = ?result.status.code(),
            error_observed = result.error_observed,
            "ruyi exited"
        );
        trace!(command = %command_line, text = %result.text(), "ruyi output");

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "cli-ruyi"
    }
}

/// Drain stdout and stderr concurrently, then reap the child
async fn capture(
    child: &mut Child,
) -> std::io::Result<(Vec<u8>, Vec<u8>, std::process::ExitStatus)> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let (stdout, stderr) = tokio::join!(read_stream(stdout), read_stream(stderr));
    let status = child.wait().await?;

    Ok((stdout?, stderr?, status))
}

async fn read_stream<R>(stream: Option<R>) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Some(mut stream) = stream {
        stream.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

/// Resolve with `timeout` once it has elapsed; never resolve without one
async fn deadline(timeout: Option<Duration>) -> Duration {
    match timeout {
        Some(timeout) => {
            tokio::time::sleep(timeout).await;
            timeout
        }
        None => std::future::pending().await,
    }
}

async fn terminate(child: &mut Child, command_line: &str) {
    if let Err(e) = child.kill().await {
        warn!(command = %command_line, error = %e, "failed to kill ruyi process");
    } else {
        debug!(command = %command_line, "killed ruyi process");
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::InvocationOutcome;

    #[test]
    fn from_path_consistency_with_which_crate() {
        let which_result = which::which("ruyi");
        let from_path_result = CliRunner::from_path();

        assert_eq!(
            which_result.is_ok(),
            from_path_result.is_some(),
            "from_path() should return Some if and only if which::which() succeeds"
        );
    }

    #[test]
    fn from_config_prefers_explicit_binary_path() {
        let mut config = Config::default();
        config.tool.binary_path = Some(PathBuf::from("/opt/ruyi/bin/ruyi"));
        config.tool.porcelain_flag = "--porcelain".into();
        config.invocation.timeout = Some(Duration::from_secs(30));

        let runner = CliRunner::from_config(&config).unwrap();
        assert_eq!(runner.binary_path(), &PathBuf::from("/opt/ruyi/bin/ruyi"));
        assert_eq!(runner.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn from_config_without_path_search_is_binary_not_found() {
        let mut config = Config::default();
        config.tool.search_path = false;

        match CliRunner::from_config(&config) {
            Err(Error::BinaryNotFound(msg)) => assert!(msg.contains("ruyi")),
            other => panic!("expected BinaryNotFound, got: {other:?}"),
        }
    }

    #[test]
    fn from_config_reports_missing_binary_in_path() {
        let mut config = Config::default();
        config.tool.binary_name = "nonexistent-ruyi-binary-xyz".into();

        match CliRunner::from_config(&config) {
            Err(Error::BinaryNotFound(msg)) => {
                assert!(msg.contains("nonexistent-ruyi-binary-xyz"))
            }
            other => panic!("expected BinaryNotFound, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn invoke_with_invalid_binary_path_is_launch_error() {
        let runner = CliRunner::new(PathBuf::from("/nonexistent/path/to/ruyi"));
        let request = InvocationRequest::new(["list"]);

        let result = runner.invoke(&request, &CancellationToken::new()).await;

        match result {
            Err(Error::Launch { program, .. }) => {
                assert_eq!(program, PathBuf::from("/nonexistent/path/to/ruyi"));
            }
            other => panic!("expected Launch error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn deadline_resolves_with_the_configured_timeout() {
        let elapsed = deadline(Some(Duration::from_millis(20))).await;
        assert_eq!(elapsed, Duration::from_millis(20));
    }

    #[tokio::test]
    async fn deadline_without_timeout_never_resolves() {
        let waited = tokio::time::timeout(Duration::from_millis(50), deadline(None)).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn cancelled_token_spawns_nothing() {
        // Would be a launch error if a spawn were attempted.
        let runner = CliRunner::new(PathBuf::from("/nonexistent/path/to/ruyi"));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = runner.invoke(&InvocationRequest::new(["list"]), &cancel).await;

        assert!(matches!(result, Err(Error::Cancelled { .. })));
    }

    #[cfg(unix)]
    mod scripted_process {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use std::path::Path;
        use std::time::Instant;
        use tempfile::TempDir;

        /// Write an executable shell script standing in for ruyi
        fn fake_ruyi(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("ruyi");
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            let mut perms = std::fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).unwrap();
            path
        }

        #[tokio::test]
        async fn porcelain_flag_is_prepended_to_arguments() {
            let dir = TempDir::new().unwrap();
            let ruyi = fake_ruyi(dir.path(), r#"printf '%s\n' "$@""#);
            let runner = CliRunner::new(ruyi);

            let result = runner
                .invoke(
                    &InvocationRequest::new(["install", "gcc(1.0.0)"]),
                    &CancellationToken::new(),
                )
                .await
                .unwrap();

            assert_eq!(result.text(), "--porcelain\ninstall\ngcc(1.0.0)");
            assert!(!result.error_observed);
            assert!(result.status.is_success());
        }

        #[tokio::test]
        async fn chunked_delayed_stdout_is_captured_completely() {
            let dir = TempDir::new().unwrap();
            let ruyi = fake_ruyi(
                dir.path(),
                "printf 'first '\nsleep 0.2\nprintf 'second '\nsleep 0.2\nprintf 'third\\n'",
            );
            let runner = CliRunner::new(ruyi);

            let result = runner
                .invoke(&InvocationRequest::new(["list"]), &CancellationToken::new())
                .await
                .unwrap();

            assert_eq!(result.stdout, "first second third\n");
            assert_eq!(result.text(), "first second third");
        }

        #[tokio::test]
        async fn large_output_on_both_streams_does_not_deadlock() {
            let dir = TempDir::new().unwrap();
            // 20k lines on each stream overflow the pipe buffers if they are
            // not drained concurrently.
            let ruyi = fake_ruyi(
                dir.path(),
                "i=0\nwhile [ $i -lt 20000 ]; do echo \"out $i\"; echo \"err $i\" >&2; i=$((i+1)); done",
            );
            let runner = CliRunner::new(ruyi);

            let result = runner
                .invoke(&InvocationRequest::new(["list"]), &CancellationToken::new())
                .await
                .unwrap();

            assert_eq!(result.stdout.lines().count(), 20000);
            assert_eq!(result.stderr.lines().count(), 20000);
            assert!(result.stdout.lines().all(|l| l.starts_with("out ")));
            assert!(result.stderr.lines().all(|l| l.starts_with("err ")));
        }

        #[tokio::test]
        async fn stderr_only_failure_resolves_with_error_text() {
            let dir = TempDir::new().unwrap();
            let ruyi = fake_ruyi(dir.path(), "echo '  fatal: unknown command  ' >&2\nexit 1");
            let runner = CliRunner::new(ruyi);

            let result = runner
                .invoke(&InvocationRequest::new(["bogus"]), &CancellationToken::new())
                .await
                .unwrap();

            assert!(result.error_observed);
            assert_eq!(result.status.code(), Some(1));
            assert_eq!(result.text(), "fatal: unknown command");
            assert_eq!(
                result.outcome(),
                InvocationOutcome::ToolError {
                    text: "fatal: unknown command".into(),
                    code: Some(1),
                }
            );
        }

        #[tokio::test]
        async fn working_directory_is_bound() {
            let dir = TempDir::new().unwrap();
            let work = dir.path().join("work");
            std::fs::create_dir(&work).unwrap();
            let ruyi = fake_ruyi(dir.path(), "pwd");
            let runner = CliRunner::new(ruyi);

            let result = runner
                .invoke(
                    &InvocationRequest::new(["extract", "demo"]).in_dir(&work),
                    &CancellationToken::new(),
                )
                .await
                .unwrap();

            let reported = std::fs::canonicalize(result.text()).unwrap();
            assert_eq!(reported, std::fs::canonicalize(&work).unwrap());
        }

        #[tokio::test]
        async fn configured_env_reaches_the_process() {
            let dir = TempDir::new().unwrap();
            let ruyi = fake_ruyi(dir.path(), "echo \"$RUYI_TELEMETRY_OPTOUT\"");
            let mut config = Config::default();
            config.tool.binary_path = Some(ruyi);
            config
                .tool
                .env
                .insert("RUYI_TELEMETRY_OPTOUT".into(), "1".into());
            let runner = CliRunner::from_config(&config).unwrap();

            let result = runner
                .invoke(&InvocationRequest::new(["list"]), &CancellationToken::new())
                .await
                .unwrap();

            assert_eq!(result.text(), "1");
        }

        #[tokio::test]
        async fn cancellation_kills_the_child() {
            let dir = TempDir::new().unwrap();
            let ruyi = fake_ruyi(dir.path(), "echo started\nsleep 30\necho finished");
            let runner = CliRunner::new(ruyi);
            let cancel = CancellationToken::new();

            let trigger = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(200)).await;
                trigger.cancel();
            });

            let started = Instant::now();
            let result = runner
                .invoke(&InvocationRequest::new(["install", "gcc"]), &cancel)
                .await;

            assert!(started.elapsed() < Duration::from_secs(10));
            match result {
                Err(Error::Cancelled { command }) => assert_eq!(command, "install gcc"),
                other => panic!("expected Cancelled, got: {other:?}"),
            }
        }

        #[tokio::test]
        async fn timeout_kills_the_child() {
            let dir = TempDir::new().unwrap();
            let ruyi = fake_ruyi(dir.path(), "sleep 30");
            let runner = CliRunner::new(ruyi).with_timeout(Duration::from_millis(200));

            let started = Instant::now();
            let result = runner
                .invoke(&InvocationRequest::new(["list"]), &CancellationToken::new())
                .await;

            assert!(started.elapsed() < Duration::from_secs(10));
            match result {
                Err(Error::Timeout { timeout, .. }) => {
                    assert_eq!(timeout, Duration::from_millis(200))
                }
                other => panic!("expected Timeout, got: {other:?}"),
            }
        }

        #[tokio::test]
        async fn non_executable_file_is_launch_error() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("ruyi");
            std::fs::write(&path, "not a program").unwrap();
            let runner = CliRunner::new(path);

            let result = runner
                .invoke(&InvocationRequest::new(["list"]), &CancellationToken::new())
                .await;

            assert!(matches!(result, Err(Error::Launch { .. })));
        }
    }
}
