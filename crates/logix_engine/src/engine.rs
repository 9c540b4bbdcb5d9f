//! The process-wide engine context handed to every game hook.

use logix_core::config::{check_rate, HostConfig};
use logix_core::graphics::{Detached, GraphicsApi};
use logix_core::{EngineError, Identifier, LaunchOptions, Logger, Registry, ResourceTracker};
use logix_render::{AssetLoader, AssetSource, Shader, Texture, TextureOptions};

/// Logger, registries, tracked GPU resources and loop settings of a running
/// game. Owned by the host; games reach it through their hooks.
pub struct Engine {
    pub log: Logger,
    pub textures: Registry<Texture>,
    pub shaders: Registry<Shader>,
    resources: ResourceTracker,
    assets: Box<dyn AssetSource>,
    gpu: Box<dyn GraphicsApi>,
    launch: LaunchOptions,
    name: String,
    version: String,
    target_cps: u32,
    target_fps: u32,
    measured_cps: f64,
    measured_fps: f64,
    width: u32,
    height: u32,
}

impl Engine {
    pub fn new(log: Logger, config: &HostConfig, launch: LaunchOptions, assets: Box<dyn AssetSource>) -> Self {
        let textures = Registry::new(&log);
        let shaders = Registry::new(&log);
        Self {
            log,
            textures,
            shaders,
            resources: ResourceTracker::new(),
            assets,
            gpu: Box::new(Detached),
            launch,
            name: config.name.clone(),
            version: config.version.clone(),
            target_cps: config.target_cps,
            target_fps: config.target_fps,
            measured_cps: f64::from(config.target_cps),
            measured_fps: f64::from(config.target_fps),
            width: config.startup_width,
            height: config.startup_height,
        }
    }

    /// Load `filename` as a texture and register it under `id`.
    pub fn load_texture(&mut self, id: &str, filename: &str, options: &TextureOptions) -> Result<&Texture, EngineError> {
        let id = self.unused_identifier(id, |engine, id| engine.textures.contains(id), "Texture")?;
        let mut loader = AssetLoader {
            log: &self.log,
            assets: self.assets.as_ref(),
            gpu: self.gpu.as_mut(),
            resources: &mut self.resources,
        };
        let texture = Texture::load(&mut loader, id, filename, options)?;
        self.textures.register(&self.log, texture)
    }

    /// Compile and link a shader program and register it under `id`.
    pub fn load_shader(
        &mut self,
        id: &str,
        vertex_filename: &str,
        fragment_filename: &str,
        suppress_extension_warnings: bool,
    ) -> Result<&Shader, EngineError> {
        let id = self.unused_identifier(id, |engine, id| engine.shaders.contains(id), "Shader")?;
        let mut loader = AssetLoader {
            log: &self.log,
            assets: self.assets.as_ref(),
            gpu: self.gpu.as_mut(),
            resources: &mut self.resources,
        };
        let shader = Shader::load(
            &mut loader,
            id,
            vertex_filename,
            fragment_filename,
            suppress_extension_warnings,
        )?;
        self.shaders.register(&self.log, shader)
    }

    /// Duplicates are rejected before any GPU object is created for them.
    fn unused_identifier(
        &self,
        raw: &str,
        taken: impl Fn(&Self, &Identifier) -> bool,
        registry: &'static str,
    ) -> Result<Identifier, EngineError> {
        let id = Identifier::new(raw)?;
        if taken(self, &id) {
            return Err(EngineError::DuplicateIdentifier {
                id: id.into_string(),
                registry,
            });
        }
        Ok(id)
    }

    pub fn resources(&self) -> &ResourceTracker {
        &self.resources
    }

    /// Release every tracked GPU resource, oldest first.
    pub(crate) fn cleanup_resources(&mut self) -> Result<usize, EngineError> {
        self.resources.cleanup_all(&self.log, self.gpu.as_mut())
    }

    pub fn gpu(&mut self) -> &mut dyn GraphicsApi {
        self.gpu.as_mut()
    }

    pub(crate) fn attach_gpu(&mut self, gpu: Box<dyn GraphicsApi>) {
        self.gpu = gpu;
    }

    pub fn launch_options(&self) -> &LaunchOptions {
        &self.launch
    }

    pub fn debug_mode(&self) -> bool {
        self.launch.debug
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn target_cps(&self) -> u32 {
        self.target_cps
    }

    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Change the render rate. Accepts `1..=999`.
    pub fn set_target_fps(&mut self, fps: u32) -> Result<(), EngineError> {
        check_rate("frames per second", fps)?;
        self.log.debug(format!("Target frame rate set to {fps}"));
        self.target_fps = fps;
        Ok(())
    }

    pub fn cps(&self) -> f64 {
        self.measured_cps
    }

    pub fn fps(&self) -> f64 {
        self.measured_fps
    }

    pub(crate) fn set_measured_rates(&mut self, cps: Option<f64>, fps: Option<f64>) {
        if let Some(cps) = cps {
            self.measured_cps = cps;
        }
        if let Some(fps) = fps {
            self.measured_fps = fps;
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn half_width(&self) -> f64 {
        f64::from(self.width) / 2.0
    }

    pub fn half_height(&self) -> f64 {
        f64::from(self.height) / 2.0
    }

    pub(crate) fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}
