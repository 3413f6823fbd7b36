//! Core types for ruyi-bridge workflows

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Compound operation a progress event belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowKind {
    /// Package installation
    Install,
    /// Virtual environment creation (including its install steps)
    CreateVenv,
    /// Source package extraction
    Extract,
}

impl std::fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WorkflowKind::Install => "install",
            WorkflowKind::CreateVenv => "create_venv",
            WorkflowKind::Extract => "extract",
        };
        f.write_str(name)
    }
}

/// State of the interactive virtual environment composition
///
/// Transitions run strictly in declaration order. `SelectingSysroot` is always
/// entered (the caller may decline a sysroot there); `InstallingSysroot` is
/// skipped when no sysroot source is chosen. Any cancelled selection moves
/// straight to `Aborted`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VenvStage {
    /// Waiting for the caller to pick a profile
    SelectingProfile,
    /// Waiting for the caller to pick a toolchain
    SelectingToolchain,
    /// Waiting for the caller to pick (or decline) a sysroot source
    SelectingSysroot,
    /// Waiting for a virtual environment name
    Naming,
    /// Waiting for the parent directory
    ChoosingDestination,
    /// Installing the chosen toolchain
    InstallingToolchain,
    /// Installing the package that provides the sysroot
    InstallingSysroot,
    /// Running `ruyi venv`
    RunningVenvCommand,
    /// Finished successfully
    Done,
    /// A selection was cancelled
    Aborted,
}

impl VenvStage {
    /// Whether the stage only waits on a caller decision and has no side effects
    pub fn is_selection(self) -> bool {
        matches!(
            self,
            VenvStage::SelectingProfile
                | VenvStage::SelectingToolchain
                | VenvStage::SelectingSysroot
                | VenvStage::Naming
                | VenvStage::ChoosingDestination
        )
    }

    /// Whether no further transition is possible
    pub fn is_terminal(self) -> bool {
        matches!(self, VenvStage::Done | VenvStage::Aborted)
    }
}

/// Event emitted while a workflow runs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Workflow started
    WorkflowStarted {
        /// Workflow kind
        workflow: WorkflowKind,
        /// Human-readable subject (package name, destination, ...)
        subject: String,
    },

    /// Progress milestone, suitable for driving a progress indicator
    Progress {
        /// Workflow kind
        workflow: WorkflowKind,
        /// Percentage points to add to the indicator (milestones of one run sum to 100)
        increment: u8,
        /// Message to display until the next milestone
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// Virtual environment composition entered a new stage
    VenvStageChanged {
        /// New stage
        stage: VenvStage,
    },

    /// Workflow finished successfully
    WorkflowCompleted {
        /// Workflow kind
        workflow: WorkflowKind,
    },

    /// Workflow stopped because a selection was cancelled
    WorkflowAborted {
        /// Workflow kind
        workflow: WorkflowKind,
        /// Stage at which the caller cancelled
        stage: VenvStage,
    },

    /// Workflow failed; remaining steps were not run
    WorkflowFailed {
        /// Workflow kind
        workflow: WorkflowKind,
        /// Error message
        error: String,
    },

    /// Virtual environment created
    VenvCreated {
        /// Path of the new environment
        path: PathBuf,
    },
}
