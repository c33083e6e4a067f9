//! CLI bootstrap - the composition root.
//!
//! This is the only place where concrete adapters are wired together:
//! - Catalog source (via ddp-github)
//! - Streaming downloader (via ddp-download)
//! - OS installed-software index and desktop shortcuts (via ddp-runtime)
//! - The catalog controller (via ddp-core)
//!
//! Command handlers receive the composed [`CliContext`] and delegate to the
//! controller.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use ddp_core::paths::{AppDataRootResolution, resolve_app_data_root, settings_path};
use ddp_core::ports::{CatalogSourcePort, DownloaderPort, ShortcutPort};
use ddp_core::{
    AppEvent, CatalogController, CatalogControllerDeps, ChannelEmitter, FetcherConfig,
    InstallLayout, StoreSettings,
};
use ddp_download::{DownloaderConfig, ReqwestSource, StreamingDownloader};
use ddp_github::{CatalogClientConfig, DefaultCatalogClient};
use ddp_runtime::{DesktopShortcuts, platform_installed_index};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

use crate::error::CliError;
use crate::parser::Cli;

/// Host that receives the token on direct API downloads.
const API_HOST: &str = "api.github.com";

fn user_agent() -> String {
    format!("ddp/{}", env!("CARGO_PKG_VERSION"))
}

/// Pick the first non-blank value.
fn first_present(flag_or_env: Option<&str>, settings: Option<&str>) -> Option<String> {
    [flag_or_env, settings]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(ToString::to_string)
}

/// Resolved configuration for one invocation.
///
/// Precedence: flag > environment > settings file > defaults. Clap folds
/// the environment into the flag values before this is built.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub git_ref: Option<String>,
    pub token: Option<String>,
    pub data_root: AppDataRootResolution,
    pub settings: StoreSettings,
    /// Settings file location, when the config directory is known.
    pub settings_path: Option<PathBuf>,
}

impl CliConfig {
    /// Load the settings file and merge it with the parsed arguments.
    pub fn load(cli: &Cli) -> Result<Self, CliError> {
        let path = settings_path().ok();
        let settings = match &path {
            Some(path) => StoreSettings::load(path)?,
            None => StoreSettings::default(),
        };
        Self::from_sources(cli, settings, path)
    }

    pub fn from_sources(
        cli: &Cli,
        settings: StoreSettings,
        settings_path: Option<PathBuf>,
    ) -> Result<Self, CliError> {
        let data_root =
            resolve_app_data_root(cli.data_dir.as_deref(), settings.app_data_root.as_deref())?;
        Ok(Self {
            owner: first_present(cli.owner.as_deref(), settings.owner.as_deref()),
            repo: first_present(cli.repo.as_deref(), settings.repo.as_deref()),
            git_ref: first_present(cli.git_ref.as_deref(), settings.git_ref.as_deref()),
            token: first_present(cli.token.as_deref(), None),
            data_root,
            settings,
            settings_path,
        })
    }

    pub fn layout(&self) -> InstallLayout {
        InstallLayout::new(self.data_root.path.clone(), self.settings.namespace.clone())
    }

    /// `owner/repo`, or an error naming what is missing.
    pub fn repository(&self) -> Result<(&str, &str), CliError> {
        let owner = self.owner.as_deref().ok_or_else(|| {
            CliError::Config(
                "catalog owner not set; pass --owner or set DDP_CATALOG_OWNER".to_string(),
            )
        })?;
        let repo = self.repo.as_deref().ok_or_else(|| {
            CliError::Config(
                "catalog repository not set; pass --repo or set DDP_CATALOG_REPO".to_string(),
            )
        })?;
        Ok((owner, repo))
    }

    pub fn desktop_dir(&self) -> Option<PathBuf> {
        self.settings
            .desktop_dir
            .clone()
            .or_else(ddp_core::paths::default_desktop_dir)
    }

    fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            catalog_root: self.settings.catalog_root.clone(),
            max_concurrent_apps: self.settings.max_concurrent_app_fetches,
        }
    }
}

/// Fully composed application context for CLI commands.
pub struct CliContext {
    pub controller: CatalogController,
    /// Every event the controller emits, in order.
    pub events: UnboundedReceiver<AppEvent>,
    pub config: CliConfig,
}

impl CliContext {
    pub const fn controller(&self) -> &CatalogController {
        &self.controller
    }

    /// Take every event that is already queued.
    pub fn drain_events(&mut self) -> Vec<AppEvent> {
        let mut drained = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            drained.push(event);
        }
        drained
    }
}

/// Bootstrap the CLI application.
///
/// Builds the GitHub catalog client, the streaming downloader, the platform
/// installed-software index and the desktop shortcut adapter, then hands
/// them to a [`CatalogController`] whose events flow into the returned
/// context.
pub fn bootstrap(config: CliConfig) -> Result<CliContext> {
    let (owner, repo) = config.repository()?;
    let agent = user_agent();

    let client_config = CatalogClientConfig::new(owner, repo)
        .with_optional_git_ref(config.git_ref.clone())
        .with_optional_token(config.token.clone())
        .with_user_agent(agent.clone());
    let source: Arc<dyn CatalogSourcePort> =
        Arc::new(DefaultCatalogClient::new(&client_config).map_err(CliError::from)?);

    let mut byte_source = ReqwestSource::new(&agent)?;
    if let Some(token) = &config.token {
        byte_source = byte_source.with_token_for_host(API_HOST, token.clone());
    }
    let downloader: Arc<dyn DownloaderPort> = Arc::new(StreamingDownloader::new(
        Arc::new(byte_source),
        DownloaderConfig::new().with_max_concurrent(config.settings.max_concurrent_downloads),
    ));

    let shortcuts: Arc<dyn ShortcutPort> =
        Arc::new(DesktopShortcuts::new(config.desktop_dir()));

    let (emitter, events) = ChannelEmitter::channel();
    let layout = config.layout();
    debug!(
        repository = %client_config.repository(),
        install_root = %layout.install_root().display(),
        "bootstrapping catalog controller"
    );

    let controller = CatalogController::new(CatalogControllerDeps {
        source,
        downloader,
        os_index: platform_installed_index(),
        shortcuts,
        emitter: Arc::new(emitter),
        layout,
        fetcher: config.fetcher_config(),
    });

    Ok(CliContext {
        controller,
        events,
        config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::Path;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["ddp"];
        full.extend_from_slice(args);
        Cli::parse_from(full)
    }

    fn settings_with_repo() -> StoreSettings {
        StoreSettings {
            owner: Some("settings-owner".to_string()),
            repo: Some("settings-repo".to_string()),
            git_ref: Some("stable".to_string()),
            app_data_root: Some(PathBuf::from("/srv/ddp-data")),
            ..StoreSettings::default()
        }
    }

    #[test]
    fn flags_beat_settings() {
        let config = CliConfig::from_sources(
            &cli(&["--owner", "flag-owner", "--repo", "flag-repo", "--data-dir", "/opt/apps", "paths"]),
            settings_with_repo(),
            None,
        )
        .unwrap();
        assert_eq!(config.repository().unwrap(), ("flag-owner", "flag-repo"));
        assert_eq!(config.git_ref.as_deref(), Some("stable"));
        assert_eq!(config.data_root.path, PathBuf::from("/opt/apps"));
    }

    #[test]
    fn blank_flags_fall_back_to_settings() {
        let config = CliConfig::from_sources(
            &cli(&["--owner", "  ", "--git-ref", "", "--data-dir", "/opt/apps", "paths"]),
            settings_with_repo(),
            None,
        )
        .unwrap();
        assert_eq!(config.owner.as_deref(), Some("settings-owner"));
        assert_eq!(config.git_ref.as_deref(), Some("stable"));
    }

    #[test]
    fn missing_repository_is_a_config_error() {
        let config = CliConfig::from_sources(
            &cli(&["--owner", "acme", "--data-dir", "/opt/apps", "paths"]),
            StoreSettings::default(),
            None,
        )
        .unwrap();
        if config.repo.is_none() {
            let err = config.repository().unwrap_err();
            assert_eq!(err.exit_code(), 78);
            assert!(err.to_string().contains("--repo"));
        }
    }

    #[test]
    fn layout_uses_settings_namespace() {
        let settings = StoreSettings {
            namespace: "Lab".to_string(),
            ..StoreSettings::default()
        };
        let config =
            CliConfig::from_sources(&cli(&["--data-dir", "/opt/apps", "paths"]), settings, None)
                .unwrap();
        assert_eq!(config.layout().install_root(), Path::new("/opt/apps").join("Lab"));
    }

    #[test]
    fn desktop_override_comes_from_settings() {
        let temp = tempfile::TempDir::new().unwrap();
        let settings = StoreSettings {
            desktop_dir: Some(temp.path().to_path_buf()),
            ..StoreSettings::default()
        };
        let config =
            CliConfig::from_sources(&cli(&["--data-dir", "/opt/apps", "paths"]), settings, None)
                .unwrap();
        assert_eq!(config.desktop_dir().as_deref(), Some(temp.path()));
    }

    #[tokio::test]
    async fn bootstrap_wires_a_controller() {
        let temp = tempfile::TempDir::new().unwrap();
        let data_dir = temp.path().to_string_lossy().to_string();
        let config = CliConfig::from_sources(
            &cli(&["--owner", "acme", "--repo", "store", "--data-dir", &data_dir, "list"]),
            StoreSettings::default(),
            None,
        )
        .unwrap();
        let mut ctx = bootstrap(config).unwrap();
        assert!(ctx.controller().entries().is_empty());
        assert!(ctx.drain_events().is_empty());
        assert!(ctx.controller().layout().install_root().starts_with(temp.path()));
    }
}
