//! Process invocation of the external `ruyi` tool
//!
//! The core abstraction is the [`ToolRunner`] trait. Implementations:
//!
//! - [`CliRunner`]: spawns the `ruyi` binary in porcelain mode
//! - [`ScriptedRunner`]: replays canned output without spawning anything
//!
//! A runner resolves only once both output streams are fully drained and the
//! process has exited. Non-zero exits are data, not errors; see
//! [`InvocationResult::text`] and [`InvocationResult::outcome`] for the two ways
//! of reading them.
//!
//! ## Usage
//!
//! ```no_run
//! use ruyi_bridge::process::{CliRunner, InvocationRequest, ToolRunner};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runner = CliRunner::from_path().expect("ruyi binary not found");
//!
//!     let result = runner
//!         .invoke(&InvocationRequest::new(["news", "list"]), &CancellationToken::new())
//!         .await?;
//!     for line in result.text().lines() {
//!         println!("{line}");
//!     }
//!
//!     Ok(())
//! }
//! ```

mod cli;
mod scripted;
mod traits;

pub use cli::CliRunner;
pub use scripted::{ScriptedResponse, ScriptedRunner};
pub use traits::{ExitStatus, InvocationOutcome, InvocationRequest, InvocationResult, ToolRunner};
