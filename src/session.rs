//! Collaborator-owned session context
//!
//! Holds the virtual environment the presentation layer currently works in. The
//! bridge never infers it; callers open and close it explicitly.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Activation script every ruyi virtual environment carries
const ACTIVATE_SCRIPT: &str = "bin/ruyi-activate";

/// A validated virtual environment directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenvHandle {
    root: PathBuf,
}

impl VenvHandle {
    /// Validate `root` as a virtual environment
    ///
    /// # Errors
    ///
    /// `Error::NotAVirtualEnvironment` if `root/bin/ruyi-activate` is not a file.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let script = root.join(ACTIVATE_SCRIPT);
        match tokio::fs::metadata(&script).await {
            Ok(meta) if meta.is_file() => Ok(Self { root }),
            Ok(_) => Err(Error::NotAVirtualEnvironment(root)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotAVirtualEnvironment(root))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Environment directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory name of the environment
    pub fn name(&self) -> Option<&str> {
        self.root.file_name().and_then(|n| n.to_str())
    }

    /// Script to source for activating the environment in a shell
    pub fn activate_script(&self) -> PathBuf {
        self.root.join(ACTIVATE_SCRIPT)
    }
}

/// The caller's working context
#[derive(Debug, Default)]
pub struct Session {
    active: Option<VenvHandle>,
}

impl Session {
    /// Session with no active environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the environment at `path` the active one
    ///
    /// On error the previously active environment stays active.
    pub async fn open_venv(&mut self, path: impl Into<PathBuf>) -> Result<&VenvHandle> {
        let handle = VenvHandle::open(path).await?;
        info!(venv = %handle.root.display(), "opened virtual environment");
        Ok(self.active.insert(handle))
    }

    /// Forget the active environment, returning it
    pub fn close_venv(&mut self) -> Option<VenvHandle> {
        let closed = self.active.take();
        if let Some(handle) = &closed {
            debug!(venv = %handle.root.display(), "closed virtual environment");
        }
        closed
    }

    /// Currently active environment
    pub fn active_venv(&self) -> Option<&VenvHandle> {
        self.active.as_ref()
    }
}
