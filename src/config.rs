use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File looked up in the working directory at start-up.
pub const CONFIG_FILE: &str = "dataset-explorer.json";

// ---------------------------------------------------------------------------
// Config – optional user settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Window and page title.
    pub title: String,
    /// Initial window size in points.
    pub window_size: [f32; 2],
    /// Rows shown in the data preview.
    pub preview_rows: usize,
    /// Whether descriptive statistics start expanded.
    pub show_stats: bool,
    /// Evaluation points of the density curve.
    pub kde_points: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Dataset Explorer".to_string(),
            window_size: [1200.0, 800.0],
            preview_rows: 5,
            show_stats: false,
            kde_points: 200,
        }
    }
}

impl Config {
    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Config from `path` if present; defaults when absent or unusable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => {
                log::info!("Loaded settings from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring settings file: {e:#}");
                Self::default()
            }
        }
    }
}
