//! Paths command handler.
//!
//! Displays resolved paths and catalog settings. Works without a configured
//! catalog and never touches the network.

use std::fmt;
use std::path::PathBuf;

use anyhow::Result;

use crate::bootstrap::CliConfig;

/// Everything `ddp paths` prints, in `key = value` form.
#[derive(Debug, Clone)]
pub struct PathsReport {
    pub settings_file: Option<PathBuf>,
    pub app_data_root: PathBuf,
    pub app_data_source: &'static str,
    pub install_root: PathBuf,
    pub desktop_dir: Option<PathBuf>,
    pub catalog: Option<String>,
    pub catalog_root: String,
}

impl PathsReport {
    pub fn from_config(config: &CliConfig) -> Self {
        let catalog = config.repository().ok().map(|(owner, repo)| {
            config
                .git_ref
                .as_ref()
                .map_or_else(|| format!("{owner}/{repo}"), |r| format!("{owner}/{repo}@{r}"))
        });
        Self {
            settings_file: config.settings_path.clone(),
            app_data_root: config.data_root.path.clone(),
            app_data_source: config.data_root.source.as_str(),
            install_root: config.layout().install_root(),
            desktop_dir: config.desktop_dir(),
            catalog,
            catalog_root: config.settings.catalog_root.clone(),
        }
    }
}

fn display_or(path: Option<&PathBuf>, fallback: &str) -> String {
    path.map_or_else(|| fallback.to_string(), |p| p.display().to_string())
}

impl fmt::Display for PathsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "settings_file = {}",
            display_or(self.settings_file.as_ref(), "<unavailable>")
        )?;
        writeln!(
            f,
            "app_data_root = {} ({})",
            self.app_data_root.display(),
            self.app_data_source
        )?;
        writeln!(f, "install_root = {}", self.install_root.display())?;
        writeln!(
            f,
            "desktop_dir = {}",
            display_or(self.desktop_dir.as_ref(), "<none>")
        )?;
        writeln!(
            f,
            "catalog = {}",
            self.catalog.as_deref().unwrap_or("<not configured>")
        )?;
        write!(f, "catalog_root = {}", self.catalog_root)
    }
}

/// Execute the paths command.
pub fn execute(config: &CliConfig) -> Result<()> {
    println!("{}", PathsReport::from_config(config));
    Ok(())
}
