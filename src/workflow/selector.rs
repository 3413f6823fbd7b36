//! Caller-side decisions for the virtual environment composition

use crate::model::{Package, Profile};
use async_trait::async_trait;
use std::path::PathBuf;

/// Whether the new environment borrows a sysroot from another toolchain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SysrootChoice {
    /// Use the toolchain's own sysroot (or none)
    None,
    /// Install this package and pass it to `--sysroot-from`
    From(String),
}

/// Decisions the presentation layer makes while composing a virtual environment
///
/// Each method returns `None` when the user cancels; the composition then stops
/// with [`VenvOutcome::Aborted`](super::VenvOutcome::Aborted) and runs nothing else.
#[async_trait]
pub trait VenvSelector: Send + Sync {
    /// Pick the target profile
    async fn select_profile(&self, profiles: &[Profile]) -> Option<Profile>;

    /// Pick a toolchain package by name
    async fn select_toolchain(&self, toolchains: &[Package]) -> Option<String>;

    /// Pick where the sysroot comes from; `providers` bundle one
    async fn select_sysroot(&self, providers: &[Package]) -> Option<SysrootChoice>;

    /// Name of the environment directory; an empty name counts as cancelled
    async fn name(&self) -> Option<String>;

    /// Parent directory the environment is created in
    async fn destination_dir(&self) -> Option<PathBuf>;
}
