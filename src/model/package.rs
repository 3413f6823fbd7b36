//! Packages and package versions

use super::from_structured;
use crate::error::MappingError;
use crate::protocol::Record;
use serde::{Deserialize, Serialize};

/// A unit of installable software tracked by ruyi
///
/// `name` is only unique together with `category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Record type tag
    pub ty: String,
    /// Category, e.g. "toolchain" or "source"; unknown values are kept verbatim
    pub category: String,
    /// Package name
    pub name: String,
    /// Available versions, in the order the tool lists them
    pub vers: Vec<PackageVersion>,
}

/// One version of a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageVersion {
    /// Semantic version string
    pub semver: String,
    /// Package-manager metadata
    pub pm: PackageManagerMeta,
    /// Free-text remarks (e.g. "latest", "prerelease")
    #[serde(default)]
    pub remarks: Vec<String>,
}

/// Package-manager metadata block of a version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManagerMeta {
    /// Manifest format identifier
    pub format: String,
    /// Present for toolchain packages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toolchain: Option<ToolchainMeta>,
}

/// Toolchain details of a version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolchainMeta {
    /// Target triple, e.g. "riscv64-plct-linux-gnu"
    pub target: String,
    /// Sysroot bundled with the toolchain, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included_sysroot: Option<String>,
}

impl Package {
    /// Map a structured record into a package
    pub fn from_record(record: &Record) -> Result<Self, MappingError> {
        from_structured(record, "package")
    }

    /// The first listed version, which the tool treats as the default
    pub fn default_version(&self) -> Option<&PackageVersion> {
        self.vers.first()
    }

    /// Find a version by its exact semver string
    pub fn version(&self, semver: &str) -> Option<&PackageVersion> {
        self.vers.iter().find(|v| v.semver == semver)
    }

    /// Whether a listing may return this package
    pub fn is_listable(&self) -> bool {
        !self.vers.is_empty()
    }

    /// Target triple of the default version, for toolchains
    pub fn target(&self) -> Option<&str> {
        self.default_version()
            .and_then(|v| v.pm.toolchain.as_ref())
            .map(|t| t.target.as_str())
    }

    /// Whether the default version bundles a sysroot other venvs can borrow
    pub fn provides_sysroot(&self) -> bool {
        self.default_version()
            .and_then(|v| v.pm.toolchain.as_ref())
            .is_some_and(|t| t.included_sysroot.is_some())
    }
}

impl PackageVersion {
    /// Whether the tool marked this version with `remark`
    pub fn has_remark(&self, remark: &str) -> bool {
        self.remarks.iter().any(|r| r == remark)
    }
}
