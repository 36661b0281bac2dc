//! Per-invocation run context
//!
//! Resolves the configuration layers once, checks the package exists and
//! builds the hub client every command shares.

use hubsync_core::{ConfigOverrides, FileConfig, HubConfig, Manifest, ManifestResolver};
use hubsync_remote::{HubClient, ResourceKind};

use crate::cli::GlobalArgs;
use crate::error::Result;

/// Resolved configuration plus the client for its hub
pub struct RunContext {
    pub config: HubConfig,
    pub client: HubClient,
}

impl RunContext {
    /// Merge flags/environment over the config file and validate.
    ///
    /// Fails before any network traffic when the host or package is
    /// missing or the package directory does not exist.
    pub fn load(args: &GlobalArgs) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let file = FileConfig::discover(args.config.as_deref(), &cwd)?;

        let config = HubConfig::resolve(
            ConfigOverrides {
                host: args.host.clone(),
                package: args.package.clone(),
                workspace: args.workspace.clone(),
            },
            file,
            &cwd,
        )?;
        config.validate()?;

        let client = HubClient::new(&config.host)?;
        tracing::debug!(
            hub = client.base_url(),
            package = %config.package_root(),
            "configuration resolved"
        );

        Ok(Self { config, client })
    }

    /// Build this run's manifest, keeping only `only` when given.
    pub async fn build_manifest(&self, only: Option<ResourceKind>) -> Result<Manifest> {
        let mut resolver = ManifestResolver::from_config(&self.client, &self.config);
        let mut manifest = resolver.build_manifest(&self.config.package_root()).await?;
        if let Some(kind) = only {
            manifest.retain_kinds(&[kind]);
        }
        Ok(manifest)
    }
}
