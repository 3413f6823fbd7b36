//! Configuration types for ruyi-bridge

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, path::PathBuf, time::Duration};

/// How output written to standard error is interpreted
///
/// `ruyi` writes diagnostics to stderr, including on some successful runs, so
/// neither choice is right for every caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStreamPolicy {
    /// Any stderr output becomes the result text; the call never fails for
    /// tool-reported errors.
    #[default]
    PreferStderr,
    /// A non-zero exit status fails the call with `Error::ToolReported`;
    /// stderr from a successful run is only logged.
    ExitStatus,
}

/// Location and invocation details of the external `ruyi` binary
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Path to the ruyi executable (auto-detected if None)
    #[serde(default)]
    pub binary_path: Option<PathBuf>,

    /// Executable name looked up in PATH (default: "ruyi")
    #[serde(default = "default_binary_name")]
    pub binary_name: String,

    /// Whether to search PATH if `binary_path` is not set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,

    /// Flag prepended to every invocation to force machine-readable output
    /// (default: "--porcelain")
    #[serde(default = "default_porcelain_flag")]
    pub porcelain_flag: String,

    /// Extra environment variables for every invocation
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            binary_path: None,
            binary_name: default_binary_name(),
            search_path: true,
            porcelain_flag: default_porcelain_flag(),
            env: HashMap::new(),
        }
    }
}

/// Per-invocation behavior
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InvocationConfig {
    /// Kill the child and fail with `Error::Timeout` after this long, in seconds
    /// (None = run to completion)
    #[serde(default, with = "optional_duration_serde")]
    pub timeout: Option<Duration>,

    /// How stderr output is interpreted
    #[serde(default)]
    pub error_stream: ErrorStreamPolicy,
}

/// Main configuration for the bridge
///
/// Sub-configs are flattened, so the serialized form is a single flat object:
///
/// ```json
/// { "binary_name": "ruyi", "porcelain_flag": "--porcelain", "timeout": 600 }
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// External binary settings
    #[serde(flatten)]
    pub tool: ToolConfig,

    /// Invocation settings
    #[serde(flatten)]
    pub invocation: InvocationConfig,
}

impl Config {
    /// Check settings that would make every invocation fail
    pub fn validate(&self) -> Result<()> {
        if self.tool.binary_path.is_none() && self.tool.binary_name.trim().is_empty() {
            return Err(Error::Config {
                message: "binary_name must not be empty when binary_path is unset".into(),
                key: Some("binary_name".into()),
            });
        }

        if self.tool.porcelain_flag.trim().is_empty() {
            return Err(Error::Config {
                message: "porcelain_flag must not be empty".into(),
                key: Some("porcelain_flag".into()),
            });
        }

        if self.invocation.timeout == Some(Duration::ZERO) {
            return Err(Error::Config {
                message: "timeout must be greater than zero".into(),
                key: Some("timeout".into()),
            });
        }

        Ok(())
    }
}

fn default_binary_name() -> String {
    "ruyi".into()
}

fn default_porcelain_flag() -> String {
    "--porcelain".into()
}

fn default_true() -> bool {
    true
}

// Optional Duration serialization helper
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
