use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;
use winit::window::Window;

use logix_core::graphics::{FilterMode, GraphicsApi, GraphicsError, NativeHandle, ShaderStage, TextureUpload, WrapMode};

const CLEAR_COLOR: wgpu::Color = wgpu::Color::BLACK;

struct TextureEntry {
    texture: wgpu::Texture,
    _view: wgpu::TextureView,
    _sampler: wgpu::Sampler,
}

struct ShaderEntry {
    stage: ShaderStage,
    module: Option<wgpu::ShaderModule>,
}

#[derive(Default)]
struct ProgramEntry {
    vertex: Option<NativeHandle>,
    fragment: Option<NativeHandle>,
    pipeline: Option<wgpu::RenderPipeline>,
}

/// wgpu device, queue and window surface, exposed to the engine as a
/// handle-based `GraphicsApi`.
pub struct GpuContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub surface_format: wgpu::TextureFormat,
    pub size: (u32, u32),
    textures: HashMap<NativeHandle, TextureEntry>,
    shaders: HashMap<NativeHandle, ShaderEntry>,
    programs: HashMap<NativeHandle, ProgramEntry>,
    next_handle: NativeHandle,
}

impl GpuContext {
    pub fn new(window: Arc<Window>) -> Result<Self, GraphicsError> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::DX12 | wgpu::Backends::VULKAN | wgpu::Backends::METAL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| GraphicsError::Backend(format!("failed to create surface: {e}")))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| GraphicsError::Backend("no suitable GPU adapter".to_string()))?;

        log::info!("GPU adapter: {:?}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("LogixEngine Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            },
            None,
        ))
        .map_err(|e| GraphicsError::Backend(format!("failed to create device: {e}")))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| GraphicsError::Backend("surface reports no formats".to_string()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            surface_format,
            size: (size.width, size.height),
            textures: HashMap::new(),
            shaders: HashMap::new(),
            programs: HashMap::new(),
            next_handle: 1,
        })
    }

    fn allocate_handle(&mut self) -> NativeHandle {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    /// Run `create` inside a validation error scope and return the error text
    /// the device reported, if any.
    fn validated<T>(&self, create: impl FnOnce(&wgpu::Device) -> T) -> (T, String) {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let value = create(&self.device);
        let diagnostics = pollster::block_on(self.device.pop_error_scope())
            .map(|e| e.to_string())
            .unwrap_or_default();
        (value, diagnostics)
    }

    fn compiled_module(&self, shader: NativeHandle) -> Result<&wgpu::ShaderModule, GraphicsError> {
        self.shaders
            .get(&shader)
            .ok_or(GraphicsError::UnknownHandle(shader))?
            .module
            .as_ref()
            .ok_or(GraphicsError::NotCompiled(shader))
    }

    fn begin_frame(&self) -> Option<(wgpu::SurfaceTexture, wgpu::TextureView)> {
        let output = match self.surface.get_current_texture() {
            Ok(tex) => tex,
            Err(wgpu::SurfaceError::Lost) => {
                self.surface.configure(&self.device, &self.config);
                return None;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                return None;
            }
            Err(e) => {
                log::warn!("Surface error: {:?}", e);
                return None;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Some((output, view))
    }
}

impl GraphicsApi for GpuContext {
    fn create_texture(&mut self, upload: &TextureUpload<'_>) -> Result<NativeHandle, GraphicsError> {
        let expected = upload.width as usize * upload.height as usize * 4;
        if upload.width == 0 || upload.height == 0 || upload.rgba.len() != expected {
            return Err(GraphicsError::BadUpload {
                width: upload.width,
                height: upload.height,
                expected,
                actual: upload.rgba.len(),
            });
        }

        let size = wgpu::Extent3d {
            width: upload.width,
            height: upload.height,
            depth_or_array_layers: 1,
        };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(upload.label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            upload.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * upload.width),
                rows_per_image: Some(upload.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(upload.label),
            address_mode_u: address_mode(upload.wrap_u),
            address_mode_v: address_mode(upload.wrap_v),
            mag_filter: filter_mode(upload.mag_filter),
            min_filter: filter_mode(upload.min_filter),
            ..Default::default()
        });

        let handle = self.allocate_handle();
        self.textures.insert(
            handle,
            TextureEntry {
                texture,
                _view: view,
                _sampler: sampler,
            },
        );
        log::debug!(
            "Created texture '{}' ({}x{}) as handle {handle}",
            upload.label,
            upload.width,
            upload.height
        );
        Ok(handle)
    }

    fn delete_texture(&mut self, texture: NativeHandle) -> Result<(), GraphicsError> {
        let entry = self
            .textures
            .remove(&texture)
            .ok_or(GraphicsError::UnknownHandle(texture))?;
        entry.texture.destroy();
        Ok(())
    }

    fn create_shader(&mut self, stage: ShaderStage) -> Result<NativeHandle, GraphicsError> {
        let handle = self.allocate_handle();
        self.shaders.insert(handle, ShaderEntry { stage, module: None });
        Ok(handle)
    }

    fn compile_shader(&mut self, shader: NativeHandle, source: &str) -> Result<String, GraphicsError> {
        let stage = self
            .shaders
            .get(&shader)
            .ok_or(GraphicsError::UnknownHandle(shader))?
            .stage;
        let (module, diagnostics) = self.validated(|device| {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(stage.label()),
                source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(source)),
            })
        });
        if diagnostics.is_empty() {
            if let Some(entry) = self.shaders.get_mut(&shader) {
                entry.module = Some(module);
            }
        }
        Ok(diagnostics)
    }

    fn delete_shader(&mut self, shader: NativeHandle) -> Result<(), GraphicsError> {
        self.shaders
            .remove(&shader)
            .map(|_| ())
            .ok_or(GraphicsError::UnknownHandle(shader))
    }

    fn create_program(&mut self) -> Result<NativeHandle, GraphicsError> {
        let handle = self.allocate_handle();
        self.programs.insert(handle, ProgramEntry::default());
        Ok(handle)
    }

    fn attach_shader(&mut self, program: NativeHandle, shader: NativeHandle) -> Result<(), GraphicsError> {
        let stage = self
            .shaders
            .get(&shader)
            .ok_or(GraphicsError::UnknownHandle(shader))?
            .stage;
        let entry = self
            .programs
            .get_mut(&program)
            .ok_or(GraphicsError::UnknownHandle(program))?;
        match stage {
            ShaderStage::Vertex => entry.vertex = Some(shader),
            ShaderStage::Fragment => entry.fragment = Some(shader),
        }
        Ok(())
    }

    fn detach_shader(&mut self, program: NativeHandle, shader: NativeHandle) -> Result<(), GraphicsError> {
        let entry = self
            .programs
            .get_mut(&program)
            .ok_or(GraphicsError::UnknownHandle(program))?;
        if entry.vertex == Some(shader) {
            entry.vertex = None;
        }
        if entry.fragment == Some(shader) {
            entry.fragment = None;
        }
        Ok(())
    }

    fn link_program(&mut self, program: NativeHandle) -> Result<String, GraphicsError> {
        let entry = self
            .programs
            .get(&program)
            .ok_or(GraphicsError::UnknownHandle(program))?;
        let (Some(vertex), Some(fragment)) = (entry.vertex, entry.fragment) else {
            return Ok("program needs both a vertex and a fragment shader attached".to_string());
        };
        let vertex = self.compiled_module(vertex)?;
        let fragment = self.compiled_module(fragment)?;
        let format = self.surface_format;

        let (pipeline, diagnostics) = self.validated(|device| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Shader Program"),
                layout: None,
                vertex: wgpu::VertexState {
                    module: vertex,
                    entry_point: None,
                    compilation_options: Default::default(),
                    buffers: &[],
                },
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: fragment,
                    entry_point: None,
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                multiview: None,
                cache: None,
            })
        });
        if diagnostics.is_empty() {
            if let Some(entry) = self.programs.get_mut(&program) {
                entry.pipeline = Some(pipeline);
            }
        }
        Ok(diagnostics)
    }

    fn delete_program(&mut self, program: NativeHandle) -> Result<(), GraphicsError> {
        self.programs
            .remove(&program)
            .map(|_| ())
            .ok_or(GraphicsError::UnknownHandle(program))
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.size = (width, height);
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    fn present(&mut self) -> Result<(), GraphicsError> {
        let Some((output, view)) = self.begin_frame() else {
            return Ok(());
        };
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

fn address_mode(mode: WrapMode) -> wgpu::AddressMode {
    match mode {
        WrapMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        WrapMode::Repeat => wgpu::AddressMode::Repeat,
        WrapMode::MirroredRepeat => wgpu::AddressMode::MirrorRepeat,
    }
}

fn filter_mode(mode: FilterMode) -> wgpu::FilterMode {
    match mode {
        FilterMode::Nearest => wgpu::FilterMode::Nearest,
        FilterMode::Linear => wgpu::FilterMode::Linear,
    }
}
