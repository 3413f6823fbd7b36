//! Interactive virtual environment composition

use super::selector::{SysrootChoice, VenvSelector};
use super::Workflows;
use crate::error::{Error, Result};
use crate::model::{Package, Profile};
use crate::types::{Event, VenvStage, WorkflowKind};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Result of a composed virtual environment creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VenvOutcome {
    /// The environment was created
    Created {
        /// Path of the new environment (`destination_dir/name`)
        path: PathBuf,
        /// Result text of `ruyi venv`
        output: String,
    },
    /// A selection was cancelled at `stage`; anything installed before stays
    Aborted {
        /// Stage the caller cancelled in
        stage: VenvStage,
    },
}

/// Everything the caller decided before any side effect
struct VenvPlan {
    profile: Profile,
    toolchain: String,
    sysroot: SysrootChoice,
    path: PathBuf,
}

impl Workflows {
    /// Compose a virtual environment from caller decisions
    ///
    /// Runs `SelectingProfile → SelectingToolchain → SelectingSysroot → Naming →
    /// ChoosingDestination → InstallingToolchain → InstallingSysroot →
    /// RunningVenvCommand → Done`. A cancelled selection yields
    /// [`VenvOutcome::Aborted`] without touching anything else. A failing step
    /// stops the sequence and returns its error; earlier installs are not rolled
    /// back.
    ///
    /// What counts as failing depends on the client's
    /// [`ErrorStreamPolicy`](crate::config::ErrorStreamPolicy):
    /// under the default `PreferStderr` an install that exits non-zero still
    /// resolves with its stderr text, so the composition carries on to `ruyi venv`.
    /// Only `ExitStatus` turns a tool-reported install failure into an error that
    /// aborts the remaining steps. Launch failures, cancellation and timeouts stop
    /// the sequence under either policy.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidVenvName` if the name is not a single plain path component
    /// - `Error::DestinationExists` if `destination_dir/name` already exists
    /// - any query or invocation error of the individual steps
    pub async fn compose_virtual_environment(
        &self,
        selector: &dyn VenvSelector,
    ) -> Result<VenvOutcome> {
        let workflow = WorkflowKind::CreateVenv;
        self.start(workflow, "new virtual environment");

        let result = self.compose(selector).await;
        match &result {
            Ok(VenvOutcome::Created { .. }) => {
                info!(%workflow, "workflow completed");
                self.emit(Event::WorkflowCompleted { workflow });
            }
            Ok(VenvOutcome::Aborted { stage }) => {
                info!(%workflow, ?stage, "workflow aborted by caller");
                self.emit(Event::WorkflowAborted {
                    workflow,
                    stage: *stage,
                });
            }
            Err(e) => self.fail(workflow, e),
        }
        result
    }

    async fn compose(&self, selector: &dyn VenvSelector) -> Result<VenvOutcome> {
        let plan = match self.plan(selector).await? {
            Ok(plan) => plan,
            Err(stage) => {
                self.enter(VenvStage::Aborted);
                return Ok(VenvOutcome::Aborted { stage });
            }
        };

        self.execute(plan).await
    }

    /// Collect decisions; `Ok(Err(stage))` means the caller cancelled at `stage`
    async fn plan(
        &self,
        selector: &dyn VenvSelector,
    ) -> Result<std::result::Result<VenvPlan, VenvStage>> {
        self.enter(VenvStage::SelectingProfile);
        let profiles = self.client.list_profiles().await?;
        let Some(profile) = selector.select_profile(&profiles).await else {
            return Ok(Err(VenvStage::SelectingProfile));
        };

        self.enter(VenvStage::SelectingToolchain);
        let toolchains = self.client.toolchains().await?;
        let Some(toolchain) = selector.select_toolchain(&toolchains).await else {
            return Ok(Err(VenvStage::SelectingToolchain));
        };

        self.enter(VenvStage::SelectingSysroot);
        let providers: Vec<Package> = toolchains
            .into_iter()
            .filter(Package::provides_sysroot)
            .collect();
        let Some(sysroot) = selector.select_sysroot(&providers).await else {
            return Ok(Err(VenvStage::SelectingSysroot));
        };

        self.enter(VenvStage::Naming);
        let Some(name) = selector.name().await.filter(|n| !n.trim().is_empty()) else {
            return Ok(Err(VenvStage::Naming));
        };

        self.enter(VenvStage::ChoosingDestination);
        let Some(parent) = selector.destination_dir().await else {
            return Ok(Err(VenvStage::ChoosingDestination));
        };

        let name = name.trim();
        if !is_plain_name(name) {
            return Err(Error::InvalidVenvName(name.to_string()));
        }
        let path = parent.join(name);
        if tokio::fs::try_exists(&path).await? {
            return Err(Error::DestinationExists(path));
        }

        debug!(
            profile = %profile,
            toolchain = %toolchain,
            ?sysroot,
            ?path,
            "virtual environment plan complete"
        );
        Ok(Ok(VenvPlan {
            profile,
            toolchain,
            sysroot,
            path,
        }))
    }

    async fn execute(&self, plan: VenvPlan) -> Result<VenvOutcome> {
        let workflow = WorkflowKind::CreateVenv;

        self.enter(VenvStage::InstallingToolchain);
        self.progress(workflow, 0, Some("Installing toolchain..."));
        self.run_install(&plan.toolchain, None).await?;

        let sysroot_from = match &plan.sysroot {
            SysrootChoice::From(source) => {
                self.enter(VenvStage::InstallingSysroot);
                self.progress(workflow, 25, Some("Installing sysroot..."));
                self.run_install(source, None).await?;
                self.progress(workflow, 25, Some("Sit and relax..."));
                Some(source.as_str())
            }
            SysrootChoice::None => {
                self.progress(workflow, 50, Some("Sit and relax..."));
                None
            }
        };

        self.enter(VenvStage::RunningVenvCommand);
        let output = self
            .run_venv(&plan.path, &plan.profile, &plan.toolchain, sysroot_from)
            .await?;
        self.progress(workflow, 50, None);

        self.enter(VenvStage::Done);
        self.emit(Event::VenvCreated {
            path: plan.path.clone(),
        });
        Ok(VenvOutcome::Created {
            path: plan.path,
            output,
        })
    }

    fn enter(&self, stage: VenvStage) {
        debug!(?stage, "virtual environment stage");
        self.emit(Event::VenvStageChanged { stage });
    }
}

/// Whether `name` stays inside the directory it is joined to
///
/// Absolute paths, separators, `.` and `..` would move the environment away from
/// the chosen destination.
fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
