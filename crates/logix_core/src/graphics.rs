//! The graphics context the engine core talks to.
//!
//! The core never touches a GPU API directly. Loaders and the resource tracker
//! go through `GraphicsApi`, which hands out plain integer handles the way a
//! GL-style driver does. `logix_render::GpuContext` implements it on top of
//! wgpu; tests implement it with an in-memory recorder.

use std::fmt;

/// Native object name handed out by a `GraphicsApi`. Zero is never issued.
pub type NativeHandle = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn label(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapMode {
    #[default]
    ClampToEdge,
    Repeat,
    MirroredRepeat,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMode {
    Nearest,
    #[default]
    Linear,
}

/// Everything needed to create and fill one RGBA8 texture.
#[derive(Debug, Clone, Copy)]
pub struct TextureUpload<'a> {
    pub label: &'a str,
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 rows, `width * height * 4` bytes.
    pub rgba: &'a [u8],
    pub wrap_u: WrapMode,
    pub wrap_v: WrapMode,
    pub min_filter: FilterMode,
    pub mag_filter: FilterMode,
}

#[derive(Debug, thiserror::Error)]
pub enum GraphicsError {
    #[error("the graphics context is not available yet")]
    NotReady,
    #[error("unknown native handle {0}")]
    UnknownHandle(NativeHandle),
    #[error("shader {0} has no compiled module")]
    NotCompiled(NativeHandle),
    #[error("texture upload of {width}x{height} expects {expected} bytes but got {actual}")]
    BadUpload {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("graphics backend error: {0}")]
    Backend(String),
}

/// GL-style object API over the active graphics backend.
///
/// Compile and link report diagnostics as text: an empty string means success,
/// anything else is the driver's info log. Hard failures (unknown handles, a
/// lost device) come back as `GraphicsError`.
pub trait GraphicsApi {
    fn create_texture(&mut self, upload: &TextureUpload<'_>) -> Result<NativeHandle, GraphicsError>;
    fn delete_texture(&mut self, texture: NativeHandle) -> Result<(), GraphicsError>;

    fn create_shader(&mut self, stage: ShaderStage) -> Result<NativeHandle, GraphicsError>;
    fn compile_shader(&mut self, shader: NativeHandle, source: &str) -> Result<String, GraphicsError>;
    fn delete_shader(&mut self, shader: NativeHandle) -> Result<(), GraphicsError>;

    fn create_program(&mut self) -> Result<NativeHandle, GraphicsError>;
    fn attach_shader(&mut self, program: NativeHandle, shader: NativeHandle) -> Result<(), GraphicsError>;
    fn detach_shader(&mut self, program: NativeHandle, shader: NativeHandle) -> Result<(), GraphicsError>;
    fn link_program(&mut self, program: NativeHandle) -> Result<String, GraphicsError>;
    fn delete_program(&mut self, program: NativeHandle) -> Result<(), GraphicsError>;

    /// Reconfigure the presentation surface after the window changed size.
    fn resize(&mut self, width: u32, height: u32);
    /// Finish the current frame and show it ("swap buffers").
    fn present(&mut self) -> Result<(), GraphicsError>;
}

/// Stand-in used before the platform has produced a window and a device.
/// Every object call fails with `NotReady`; resize and present are no-ops.
#[derive(Debug, Default)]
pub struct Detached;

impl GraphicsApi for Detached {
    fn create_texture(&mut self, _upload: &TextureUpload<'_>) -> Result<NativeHandle, GraphicsError> {
        Err(GraphicsError::NotReady)
    }

    fn delete_texture(&mut self, _texture: NativeHandle) -> Result<(), GraphicsError> {
        Err(GraphicsError::NotReady)
    }

    fn create_shader(&mut self, _stage: ShaderStage) -> Result<NativeHandle, GraphicsError> {
        Err(GraphicsError::NotReady)
    }

    fn compile_shader(&mut self, _shader: NativeHandle, _source: &str) -> Result<String, GraphicsError> {
        Err(GraphicsError::NotReady)
    }

    fn delete_shader(&mut self, _shader: NativeHandle) -> Result<(), GraphicsError> {
        Err(GraphicsError::NotReady)
    }

    fn create_program(&mut self) -> Result<NativeHandle, GraphicsError> {
        Err(GraphicsError::NotReady)
    }

    fn attach_shader(&mut self, _program: NativeHandle, _shader: NativeHandle) -> Result<(), GraphicsError> {
        Err(GraphicsError::NotReady)
    }

    fn detach_shader(&mut self, _program: NativeHandle, _shader: NativeHandle) -> Result<(), GraphicsError> {
        Err(GraphicsError::NotReady)
    }

    fn link_program(&mut self, _program: NativeHandle) -> Result<String, GraphicsError> {
        Err(GraphicsError::NotReady)
    }

    fn delete_program(&mut self, _program: NativeHandle) -> Result<(), GraphicsError> {
        Err(GraphicsError::NotReady)
    }

    fn resize(&mut self, _width: u32, _height: u32) {}

    fn present(&mut self) -> Result<(), GraphicsError> {
        Ok(())
    }
}
