//! Read-only queries against ruyi
//!
//! Every call spawns its own invocation and rebuilds its entities from the fresh
//! output; nothing is cached. Concurrent calls share no buffers.

use crate::config::{Config, ErrorStreamPolicy};
use crate::error::{Error, MappingError, Result};
use crate::model::{CategorySet, NewsItem, Package, Profile};
use crate::process::{CliRunner, InvocationOutcome, InvocationRequest, ToolRunner};
use crate::protocol::{Record, decode};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Client for ruyi's porcelain interface
///
/// Cheap to clone; clones share the runner, configuration and cancellation root.
#[derive(Clone)]
pub struct RuyiClient {
    runner: Arc<dyn ToolRunner>,
    config: Arc<Config>,
    cancel_token: CancellationToken,
}

impl RuyiClient {
    /// Create a client over an existing runner
    pub fn new(runner: Arc<dyn ToolRunner>, config: Arc<Config>) -> Self {
        Self {
            runner,
            config,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Create a client that spawns the binary described by `config`
    pub fn from_config(config: Config) -> Result<Self> {
        let runner = CliRunner::from_config(&config)?;
        Ok(Self::new(Arc::new(runner), Arc::new(config)))
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Name of the underlying runner, for logging
    pub fn runner_name(&self) -> &'static str {
        self.runner.name()
    }

    /// Kill every in-flight invocation and refuse new ones
    ///
    /// Pending calls resolve with `Error::Cancelled`. The client cannot be reused
    /// afterwards.
    pub fn cancel_all(&self) {
        debug!("cancelling all ruyi invocations");
        self.cancel_token.cancel();
    }

    /// Whether [`cancel_all`](Self::cancel_all) was called
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Run one invocation and resolve its text under the configured policy
    pub(crate) async fn run(&self, request: InvocationRequest) -> Result<String> {
        let command = request.command_line();
        let token = self.cancel_token.child_token();
        let result = self.runner.invoke(&request, &token).await?;

        match self.config.invocation.error_stream {
            ErrorStreamPolicy::PreferStderr => {
                if result.error_observed {
                    warn!(
                        command = %command,
                        code = ?result.status.code(),
                        "ruyi wrote to stderr, returning it as the result"
                    );
                }
                Ok(result.text().to_string())
            }
            ErrorStreamPolicy::ExitStatus => match result.outcome() {
                InvocationOutcome::Succeeded(text) => {
                    if result.error_observed {
                        debug!(command = %command, stderr = %result.stderr.trim(), "ruyi diagnostics");
                    }
                    Ok(text)
                }
                InvocationOutcome::ToolError { text, code } => {
                    warn!(command = %command, ?code, "ruyi reported a failure");
                    Err(Error::ToolReported {
                        command,
                        code,
                        stderr: text,
                    })
                }
            },
        }
    }

    /// Run a command and decode its non-blank lines
    async fn records(&self, args: &[&str]) -> Result<Vec<Record>> {
        let text = self.run(InvocationRequest::new(args.iter().copied())).await?;
        Ok(decode(&text)
            .into_iter()
            .filter(|record| !record.is_blank())
            .collect())
    }

    /// `ruyi list profiles`
    pub async fn list_profiles(&self) -> Result<Vec<Profile>> {
        let records = self.records(&["list", "profiles"]).await?;
        let profiles = map_all(&records, Profile::from_record)?;
        debug!(count = profiles.len(), "listed profiles");
        Ok(profiles)
    }

    /// `ruyi news list`
    pub async fn list_news(&self) -> Result<Vec<NewsItem>> {
        let records = self.records(&["news", "list"]).await?;
        let news = map_all(&records, NewsItem::from_record)?;
        debug!(count = news.len(), "listed news");
        Ok(news)
    }

    /// News items not yet marked as read
    pub async fn unread_news(&self) -> Result<Vec<NewsItem>> {
        let mut news = self.list_news().await?;
        news.retain(|item| !item.is_read);
        Ok(news)
    }

    /// `ruyi list`
    ///
    /// Packages without any version are dropped, so every returned package has a
    /// default version.
    pub async fn list_packages(&self) -> Result<Vec<Package>> {
        let records = self.records(&["list"]).await?;
        let mut packages = map_all(&records, Package::from_record)?;

        packages.retain(|package| {
            let listable = package.is_listable();
            if !listable {
                warn!(
                    name = %package.name,
                    category = %package.category,
                    "dropping package without versions"
                );
            }
            listable
        });

        debug!(count = packages.len(), "listed packages");
        Ok(packages)
    }

    /// Packages whose category is in `allowed`, in listing order
    pub async fn list_by_category(&self, allowed: &CategorySet) -> Result<Vec<Package>> {
        Ok(allowed.retain(self.list_packages().await?))
    }

    /// Toolchain packages
    pub async fn toolchains(&self) -> Result<Vec<Package>> {
        self.list_by_category(&CategorySet::toolchains()).await
    }

    /// Source packages
    pub async fn sources(&self) -> Result<Vec<Package>> {
        self.list_by_category(&CategorySet::sources()).await
    }

    /// Toolchains, analyzers, board images and emulators
    pub async fn installable_packages(&self) -> Result<Vec<Package>> {
        self.list_by_category(&CategorySet::installable()).await
    }

    /// Toolchains whose default version bundles a sysroot
    pub async fn sysroot_providers(&self) -> Result<Vec<Package>> {
        let mut toolchains = self.toolchains().await?;
        toolchains.retain(Package::provides_sysroot);
        Ok(toolchains)
    }
}

impl std::fmt::Debug for RuyiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuyiClient")
            .field("runner", &self.runner.name())
            .field("config", &self.config)
            .field("cancelled", &self.cancel_token.is_cancelled())
            .finish()
    }
}

/// Map every record, failing on the first anomaly
fn map_all<T>(
    records: &[Record],
    map: impl Fn(&Record) -> std::result::Result<T, MappingError>,
) -> Result<Vec<T>> {
    records
        .iter()
        .map(|record| map(record).map_err(Error::from))
        .collect()
}
