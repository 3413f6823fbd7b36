//! # ruyi-bridge
//!
//! Async bridge to the [ruyi](https://github.com/ruyisdk/ruyi) package manager,
//! driven through its `--porcelain` command-line mode.
//!
//! ## Design Philosophy
//!
//! ruyi-bridge is designed to be:
//! - **Black-box** - ruyi is only ever spoken to through its command line
//! - **Stateless** - every query spawns a fresh invocation, nothing is cached
//! - **Library-first** - No CLI or UI, presentation layers call the public API
//! - **Event-driven** - Workflows broadcast progress, no polling required
//!
//! ## Quick Start
//!
//! ```no_run
//! use ruyi_bridge::{Config, RuyiClient, Workflows};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RuyiClient::from_config(Config::default())?;
//!
//!     for toolchain in client.toolchains().await? {
//!         println!("{} {:?}", toolchain.name, toolchain.default_version().map(|v| &v.semver));
//!     }
//!
//!     let workflows = Workflows::new(client);
//!
//!     // Subscribe to progress events
//!     let mut events = workflows.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     workflows.install("gnu-plct", None).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Typed ruyi entities mapped from records
pub mod model;
/// Spawning the ruyi binary
pub mod process;
/// Line-oriented record protocol
pub mod protocol;
/// Read-only queries
pub mod query;
/// Active virtual environment context
pub mod session;
/// Core types and events
pub mod types;
/// Compound install, venv and extract operations
pub mod workflow;

// Re-export commonly used types
pub use config::{Config, ErrorStreamPolicy, InvocationConfig, ToolConfig};
pub use error::{Error, MappingError, Result};
pub use model::{CategorySet, NewsItem, Package, PackageVersion, Profile};
pub use process::{CliRunner, InvocationRequest, InvocationResult, ToolRunner};
pub use protocol::Record;
pub use query::RuyiClient;
pub use session::{Session, VenvHandle};
pub use types::{Event, VenvStage, WorkflowKind};
pub use workflow::{SysrootChoice, VenvOutcome, VenvSelector, Workflows};

/// Cancel every ruyi invocation of `client` once the host process is asked to stop.
///
/// Waits for a termination signal and then calls [`RuyiClient::cancel_all`], which
/// kills in-flight children and rejects new invocations.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use ruyi_bridge::{Config, RuyiClient, cancel_on_shutdown};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = RuyiClient::from_config(Config::default())?;
///     tokio::spawn(cancel_on_shutdown(client.clone()));
///
///     let news = client.unread_news().await?;
///     println!("{} unread", news.len());
///     Ok(())
/// }
/// ```
pub async fn cancel_on_shutdown(client: RuyiClient) {
    wait_for_signal().await;
    client.cancel_all();
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Registration may fail in restricted environments (containers, tests)
    match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => tracing::info!("Received SIGTERM, cancelling ruyi invocations"),
                _ = sigint.recv() => tracing::info!("Received SIGINT, cancelling ruyi invocations"),
            }
        }
        (Ok(mut registered), Err(e)) | (Err(e), Ok(mut registered)) => {
            tracing::warn!(error = %e, "Could not register every signal handler");
            registered.recv().await;
            tracing::info!("Received termination signal, cancelling ruyi invocations");
        }
        (Err(e), Err(_)) => {
            tracing::error!(error = %e, "Could not register any signal handlers, using ctrl_c fallback");
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C, cancelling ruyi invocations"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl+C signal"),
    }
}
