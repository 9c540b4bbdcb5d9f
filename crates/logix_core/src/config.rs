use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::EngineError;
use crate::title::DEFAULT_TITLE_FORMAT;

/// Highest target rate either loop accepts.
pub const MAX_TARGET_RATE: u32 = 999;

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WindowMode {
    #[default]
    Windowed,
    /// Decorated but not resizable.
    FixedWindow,
    /// Borderless fullscreen on the current monitor.
    Fullscreen,
}

/// Everything a game declares about its window and loops.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct HostConfig {
    pub name: String,
    pub version: String,
    pub startup_width: u32,
    pub startup_height: u32,
    pub min_width: u32,
    pub min_height: u32,
    pub target_cps: u32,
    pub target_fps: u32,
    /// Refresh the title after each render instead of after each update.
    pub title_in_render: bool,
    /// Let the game veto a close request.
    pub allow_close_cancel: bool,
    pub window_mode: WindowMode,
    pub title_format: String,
    pub asset_root: PathBuf,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            name: "LogixEngine Game".to_string(),
            version: "1.0.0".to_string(),
            startup_width: 1280,
            startup_height: 720,
            min_width: 640,
            min_height: 480,
            target_cps: 30,
            target_fps: 60,
            title_in_render: true,
            allow_close_cancel: false,
            window_mode: WindowMode::Windowed,
            title_format: DEFAULT_TITLE_FORMAT.to_string(),
            asset_root: PathBuf::from("assets"),
        }
    }
}

impl HostConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        check_rate("cycles per second", self.target_cps)?;
        check_rate("frames per second", self.target_fps)?;

        if self.name.trim().is_empty() {
            return Err(EngineError::InvalidConfig("game name is empty".to_string()));
        }
        if self.startup_width == 0 || self.startup_height == 0 {
            return Err(EngineError::InvalidConfig(format!(
                "startup size {}x{} has a zero dimension",
                self.startup_width, self.startup_height
            )));
        }
        if self.min_width > self.startup_width || self.min_height > self.startup_height {
            return Err(EngineError::InvalidConfig(format!(
                "minimum size {}x{} is larger than the startup size {}x{}",
                self.min_width, self.min_height, self.startup_width, self.startup_height
            )));
        }
        if self.title_format.is_empty() {
            log::warn!("Title format is empty; the window title will be blank");
        }
        Ok(())
    }
}

/// Target rates must lie in `(0, MAX_TARGET_RATE]`.
pub fn check_rate(what: &'static str, value: u32) -> Result<(), EngineError> {
    if value == 0 || value > MAX_TARGET_RATE {
        return Err(EngineError::InvalidTargetRate { what, value });
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<HostConfig, EngineError> {
    let raw = fs::read_to_string(path).map_err(|e| {
        EngineError::InvalidConfig(format!("failed to read {}: {e}", path.display()))
    })?;
    let config: HostConfig = serde_json::from_str(&raw).map_err(|e| {
        EngineError::InvalidConfig(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;
    Ok(config)
}
