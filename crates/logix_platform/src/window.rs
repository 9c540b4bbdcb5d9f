use std::sync::Arc;
use winit::dpi::LogicalSize;
use winit::error::OsError;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Fullscreen, Window, WindowAttributes};

use logix_core::{HostConfig, WindowMode};

pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub min_width: u32,
    pub min_height: u32,
    pub mode: WindowMode,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::from(&HostConfig::default())
    }
}

impl From<&HostConfig> for WindowConfig {
    fn from(config: &HostConfig) -> Self {
        Self {
            title: config.name.clone(),
            width: config.startup_width,
            height: config.startup_height,
            min_width: config.min_width,
            min_height: config.min_height,
            mode: config.window_mode,
        }
    }
}

impl WindowConfig {
    pub fn attributes(&self) -> WindowAttributes {
        let attrs = WindowAttributes::default()
            .with_title(&self.title)
            .with_inner_size(LogicalSize::new(self.width, self.height))
            .with_min_inner_size(LogicalSize::new(self.min_width, self.min_height));

        match self.mode {
            WindowMode::Windowed => attrs.with_resizable(true),
            WindowMode::FixedWindow => attrs.with_resizable(false),
            WindowMode::Fullscreen => attrs.with_fullscreen(Some(Fullscreen::Borderless(None))),
        }
    }
}

pub fn create_window(event_loop: &ActiveEventLoop, config: &WindowConfig) -> Result<Arc<Window>, OsError> {
    let window = event_loop.create_window(config.attributes())?;
    log::info!(
        "Created {:?} window '{}' at {}x{}",
        config.mode,
        config.title,
        config.width,
        config.height
    );
    Ok(Arc::new(window))
}
