use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::layout::JustifiedLayout;

/// Client settings, read from `config.toml` with every field optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the gallery server
    pub server_url: String,
    /// Target row height in pixels (default: 200)
    pub target_row_height: f64,
    /// Padding between window edge and grid (default: 16)
    pub viewport_padding: f64,
    /// Horizontal margin per grid item (default: 8)
    pub item_margin: f64,
    /// Narrowest rendered grid item (default: 50)
    pub min_item_width: f64,
    /// Quiet period before a resize triggers relayout (default: 350)
    pub resize_debounce_ms: u64,
    /// Hold time before a touch becomes a long press (default: 240)
    pub long_press_ms: u64,
    /// Width of the lightbox info panel (default: 360)
    pub info_panel_width: f64,
}

impl Default for Config {
    fn default() -> Self {
        let layout = JustifiedLayout::default();
        Self {
            server_url: "http://127.0.0.1:5000".to_string(),
            target_row_height: layout.target_height,
            viewport_padding: layout.viewport_padding,
            item_margin: layout.item_margin,
            min_item_width: layout.min_item_width,
            resize_debounce_ms: 350,
            long_press_ms: 240,
            info_panel_width: 360.0,
        }
    }
}

impl Config {
    /// `XDG_CONFIG_HOME/mediagrid/config.toml`, when a home directory exists.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "mediagrid").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads the default config file, falling back to defaults when it is
    /// absent, then applies environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match Self::default_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Reads one TOML file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(?path, "No config file, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("MEDIAGRID_SERVER") {
            if !url.trim().is_empty() {
                self.server_url = url.trim().to_string();
            }
        }
        if let Some(height) = std::env::var("MEDIAGRID_ROW_HEIGHT")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| *v > 0.0)
        {
            self.target_row_height = height;
        }
    }

    pub fn layout(&self) -> JustifiedLayout {
        JustifiedLayout {
            target_height: self.target_row_height,
            item_margin: self.item_margin,
            min_item_width: self.min_item_width,
            viewport_padding: self.viewport_padding,
            ..JustifiedLayout::default()
        }
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }
}
