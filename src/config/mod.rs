use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::editor::ViewState;
use crate::geometry::{Color, DEFAULT_GRID_STEP};

const APP_DIR: &str = "studio-canvas";
const APP_CONFIG_FILE: &str = "config.json";

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing HOME environment variable")]
    MissingHomeDirectory,
    #[error("failed to read studio config: {path}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse studio config: {path}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Container aspect ratio, width to height.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AspectRatio {
    pub width: f64,
    pub height: f64,
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self {
            width: 4.0,
            height: 5.0,
        }
    }
}

/// Studio-level settings from `config.json`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub grid_step: f64,
    pub snap_enabled: bool,
    pub show_grid: bool,
    pub show_safe_area: bool,
    pub backdrop_color: Color,
    pub initial_zoom: f64,
    pub container_aspect: AspectRatio,
    /// Safe-area margin on every side, percent of the container.
    pub safe_area_inset: f64,
    pub nudge_step: f64,
    pub nudge_step_large: f64,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            grid_step: DEFAULT_GRID_STEP,
            snap_enabled: true,
            show_grid: false,
            show_safe_area: true,
            backdrop_color: Color::new(244, 244, 245),
            initial_zoom: 1.0,
            container_aspect: AspectRatio::default(),
            safe_area_inset: 10.0,
            nudge_step: 1.0,
            nudge_step_large: 5.0,
        }
    }
}

impl StudioConfig {
    pub fn initial_view(&self) -> ViewState {
        let mut view = ViewState::default();
        view.set_grid_step(self.grid_step);
        view.set_snap_enabled(self.snap_enabled);
        view.set_show_grid(self.show_grid);
        view.set_show_safe_area(self.show_safe_area);
        view.set_backdrop_color(self.backdrop_color);
        view.set_zoom(self.initial_zoom);
        view
    }

    pub fn safe_area_inset(&self) -> f64 {
        if self.safe_area_inset.is_finite() {
            self.safe_area_inset.clamp(0.0, 45.0)
        } else {
            0.0
        }
    }
}

pub fn load_studio_config() -> StudioConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_studio_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_studio_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> StudioConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return StudioConfig::default(),
    };
    if !path.exists() {
        return StudioConfig::default();
    }
    try_load_studio_config_from(&path).unwrap_or_else(|err| {
        tracing::warn!(%err, ?path, "failed to load studio config; using defaults");
        StudioConfig::default()
    })
}

pub fn try_load_studio_config_from(path: &Path) -> ConfigResult<StudioConfig> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> ConfigResult<PathBuf> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(xdg_config_home: Option<&Path>, home: Option<&Path>) -> ConfigResult<PathBuf> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
