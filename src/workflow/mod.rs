//! Compound operations built from several invocations
//!
//! Workflows sequence invocations with `.await`, so a step never starts before
//! the previous one finished, and the first failing step stops the sequence.
//! Progress milestones are broadcast as [`Event`]s:
//!
//! - install: `0 "Installing..."`, `100`
//! - extract: `0 "Sit and relax..."`, `100`
//! - create venv: `0 "Sit and relax..."`, `100`
//! - composed venv: `0 "Installing toolchain..."`, `25 "Installing sysroot..."`,
//!   `25 "Sit and relax..."`, `50` (the sysroot milestone folds into the next one
//!   when no sysroot is installed)

use crate::error::Result;
use crate::model::Profile;
use crate::process::InvocationRequest;
use crate::query::RuyiClient;
use crate::types::{Event, WorkflowKind};
use std::path::{Path, PathBuf};
use tokio::sync::broadcast;
use tracing::{info, warn};

mod compose;
mod selector;

pub use compose::VenvOutcome;
pub use selector::{SysrootChoice, VenvSelector};

/// Workflow orchestrator
pub struct Workflows {
    client: RuyiClient,
    event_tx: broadcast::Sender<Event>,
}

impl Workflows {
    /// Create an orchestrator over a client
    pub fn new(client: RuyiClient) -> Self {
        let (event_tx, _rx) = broadcast::channel(100);
        Self { client, event_tx }
    }

    /// Subscribe to progress events
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// The underlying query client
    pub fn client(&self) -> &RuyiClient {
        &self.client
    }

    /// Install a package, optionally pinned to `version`
    ///
    /// Without a version the bare name is passed and ruyi picks the version.
    pub async fn install(&self, package: &str, version: Option<&str>) -> Result<String> {
        let workflow = WorkflowKind::Install;
        let spec = package_spec(package, version);
        self.start(workflow, &spec);

        self.progress(workflow, 0, Some("Installing..."));
        let result = self.run_install(package, version).await;
        self.finish(workflow, result)
    }

    /// Run `ruyi venv` for an already chosen profile and toolchain
    pub async fn create_virtual_environment(
        &self,
        destination: &Path,
        profile: &Profile,
        toolchain: &str,
        sysroot_from: Option<&str>,
    ) -> Result<String> {
        let workflow = WorkflowKind::CreateVenv;
        self.start(workflow, &destination.display().to_string());

        self.progress(workflow, 0, Some("Sit and relax..."));
        let result = self
            .run_venv(destination, profile, toolchain, sysroot_from)
            .await;
        if result.is_ok() {
            self.emit(Event::VenvCreated {
                path: destination.to_path_buf(),
            });
        }
        self.finish(workflow, result)
    }

    /// Extract a source package into `destination`
    ///
    /// `destination` becomes the working directory of `ruyi extract` and is
    /// created if missing.
    pub async fn extract_source(&self, package: &str, destination: &Path) -> Result<String> {
        let workflow = WorkflowKind::Extract;
        self.start(workflow, package);

        self.progress(workflow, 0, Some("Sit and relax..."));
        let result = self.run_extract(package, destination).await;
        self.finish(workflow, result)
    }

    async fn run_install(&self, package: &str, version: Option<&str>) -> Result<String> {
        self.client
            .run(InvocationRequest::new(install_args(package, version)))
            .await
    }

    async fn run_venv(
        &self,
        destination: &Path,
        profile: &Profile,
        toolchain: &str,
        sysroot_from: Option<&str>,
    ) -> Result<String> {
        self.client
            .run(InvocationRequest::new(venv_args(
                destination,
                profile,
                toolchain,
                sysroot_from,
            )))
            .await
    }

    async fn run_extract(&self, package: &str, destination: &Path) -> Result<String> {
        tokio::fs::create_dir_all(destination).await?;
        self.client
            .run(InvocationRequest::new(["extract", package]).in_dir(destination))
            .await
    }

    fn emit(&self, event: Event) {
        // No subscribers is fine.
        self.event_tx.send(event).ok();
    }

    fn start(&self, workflow: WorkflowKind, subject: &str) {
        info!(%workflow, subject, "starting workflow");
        self.emit(Event::WorkflowStarted {
            workflow,
            subject: subject.to_string(),
        });
    }

    fn progress(&self, workflow: WorkflowKind, increment: u8, message: Option<&str>) {
        self.emit(Event::Progress {
            workflow,
            increment,
            message: message.map(str::to_string),
        });
    }

    /// Emit the closing milestone and completion event, or the failure event
    fn finish<T>(&self, workflow: WorkflowKind, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => {
                self.progress(workflow, 100, None);
                info!(%workflow, "workflow completed");
                self.emit(Event::WorkflowCompleted { workflow });
            }
            Err(e) => self.fail(workflow, e),
        }
        result
    }

    fn fail(&self, workflow: WorkflowKind, error: &crate::Error) {
        warn!(%workflow, error = %error, "workflow failed");
        self.emit(Event::WorkflowFailed {
            workflow,
            error: error.to_string(),
        });
    }
}

/// Package argument for `ruyi install`: `name` or `name(version)`
///
/// An empty version counts as no version.
pub fn package_spec(package: &str, version: Option<&str>) -> String {
    match version.filter(|v| !v.is_empty()) {
        Some(version) => format!("{package}({version})"),
        None => package.to_string(),
    }
}

/// Arguments of `ruyi install`
pub fn install_args(package: &str, version: Option<&str>) -> Vec<String> {
    vec!["install".to_string(), package_spec(package, version)]
}

/// Arguments of `ruyi venv <profile> <destination> -t <toolchain> [--sysroot-from <source>]`
///
/// An empty sysroot source counts as none.
pub fn venv_args(
    destination: &Path,
    profile: &Profile,
    toolchain: &str,
    sysroot_from: Option<&str>,
) -> Vec<String> {
    let mut args = vec![
        "venv".to_string(),
        profile.to_string(),
        destination.display().to_string(),
        "-t".to_string(),
        toolchain.to_string(),
    ];
    if let Some(source) = sysroot_from.filter(|s| !s.is_empty()) {
        args.push("--sysroot-from".to_string());
        args.push(source.to_string());
    }
    args
}

/// `README.md` left in `dir` by an extraction, if any
pub fn readme_in(dir: &Path) -> Option<PathBuf> {
    let readme = dir.join("README.md");
    readme.is_file().then_some(readme)
}
