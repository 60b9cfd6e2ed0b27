use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Looked up in the working directory at start-up.
pub const CONFIG_FILE: &str = "sentiment-insights.toml";

/// Dashboard settings.  Every key is optional in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Dataset opened at start-up.
    pub dataset_path: PathBuf,
    /// Length of the top-N rankings (countries, hashtags).
    pub top_n: usize,
    /// Initial inner size of the window.
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("sentimentdataset.csv"),
            top_n: 10,
            window_size: [1280.0, 860.0],
        }
    }
}

impl DashboardConfig {
    /// Parse a config file.  A zero `top_n` is raised to 1.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let mut config: DashboardConfig =
            toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        config.top_n = config.top_n.max(1);
        Ok(config)
    }

    /// Read `path` if it exists.  Missing file → defaults; broken file →
    /// defaults plus a warning.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => {
                log::info!("Read configuration from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring configuration: {e:#}");
                Self::default()
            }
        }
    }
}
