//! Common test utilities for ruyi-bridge integration tests

#[allow(dead_code)]
pub mod fixtures;

#[allow(unused_imports)]
pub use fixtures::*;

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use ruyi_bridge::{CliRunner, Config, ErrorStreamPolicy, RuyiClient};

/// A fake `ruyi` executable in a scratch directory
///
/// The script answers the porcelain subcommands the bridge issues and appends
/// every command line it receives to `calls.log`. Packages whose name starts
/// with `broken` fail to install with a message on stderr.
pub struct FakeRuyi {
    /// Scratch directory holding the script, its data files and the log
    pub dir: TempDir,
    /// Path of the executable
    pub binary: PathBuf,
}

#[allow(dead_code)]
impl FakeRuyi {
    /// Fake answering `list` with `catalog`
    pub fn new(catalog: &str) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        std::fs::write(dir.path().join("catalog.jsonl"), catalog).expect("write catalog");
        std::fs::write(dir.path().join("profiles.txt"), PROFILES).expect("write profiles");
        std::fs::write(dir.path().join("news.jsonl"), NEWS).expect("write news");

        let binary = dir.path().join("ruyi");
        std::fs::write(&binary, script(dir.path())).expect("write fake ruyi");
        let mut perms = std::fs::metadata(&binary).expect("stat").permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&binary, perms).expect("chmod fake ruyi");

        Self { dir, binary }
    }

    /// Command lines received so far, porcelain flag included
    pub fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.dir.path().join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Client spawning this fake under `policy`
    pub fn client(&self, policy: ErrorStreamPolicy) -> RuyiClient {
        let mut config = Config::default();
        config.tool.binary_path = Some(self.binary.clone());
        config.invocation.error_stream = policy;
        RuyiClient::new(
            Arc::new(CliRunner::from_config(&config).expect("runner from config")),
            Arc::new(config),
        )
    }
}

fn script(data: &Path) -> String {
    let data = data.display();
    format!(
        r##"#!/bin/sh
echo "$*" >> "{data}/calls.log"
shift
case "$1" in
  list)
    if [ "$2" = profiles ]; then cat "{data}/profiles.txt"; else cat "{data}/catalog.jsonl"; fi
    ;;
  news)
    cat "{data}/news.jsonl"
    ;;
  install)
    case "$2" in
      broken*) echo "fatal: package $2 not found" >&2; exit 1 ;;
    esac
    echo "installed $2"
    ;;
  venv)
    mkdir -p "$3/bin" && : > "$3/bin/ruyi-activate"
    echo "The virtual environment is now created."
    ;;
  extract)
    echo "# $2" > README.md
    echo "extracted $2"
    ;;
  *)
    echo "unknown command: $1" >&2
    exit 2
    ;;
esac
"##
    )
}
