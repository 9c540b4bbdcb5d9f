//! In-memory graphics backend for loader tests.

use std::collections::BTreeSet;
use std::io::Cursor;

use logix_core::graphics::{GraphicsApi, GraphicsError, NativeHandle, ShaderStage, TextureUpload};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateTexture { handle: NativeHandle, width: u32, height: u32 },
    DeleteTexture(NativeHandle),
    CreateShader(NativeHandle, ShaderStage),
    CompileShader(NativeHandle),
    DeleteShader(NativeHandle),
    CreateProgram(NativeHandle),
    AttachShader(NativeHandle, NativeHandle),
    DetachShader(NativeHandle, NativeHandle),
    LinkProgram(NativeHandle),
    DeleteProgram(NativeHandle),
}

/// Records every call and keeps the set of live handles. Compile and link
/// diagnostics can be scripted per stage.
#[derive(Debug, Default)]
pub struct RecordingGpu {
    pub calls: Vec<Call>,
    pub live: BTreeSet<NativeHandle>,
    pub vertex_log: String,
    pub fragment_log: String,
    pub link_log: String,
    pub(crate) next: NativeHandle,
    pub(crate) stages: Vec<(NativeHandle, ShaderStage)>,
}

impl RecordingGpu {
    fn allocate(&mut self) -> NativeHandle {
        self.next += 1;
        self.live.insert(self.next);
        self.next
    }

    fn free(&mut self, handle: NativeHandle) -> Result<(), GraphicsError> {
        if self.live.remove(&handle) {
            Ok(())
        } else {
            Err(GraphicsError::UnknownHandle(handle))
        }
    }
}

impl GraphicsApi for RecordingGpu {
    fn create_texture(&mut self, upload: &TextureUpload<'_>) -> Result<NativeHandle, GraphicsError> {
        let handle = self.allocate();
        self.calls.push(Call::CreateTexture {
            handle,
            width: upload.width,
            height: upload.height,
        });
        Ok(handle)
    }

    fn delete_texture(&mut self, texture: NativeHandle) -> Result<(), GraphicsError> {
        self.calls.push(Call::DeleteTexture(texture));
        // Textures in release tests are built by hand and were never allocated.
        self.live.remove(&texture);
        Ok(())
    }

    fn create_shader(&mut self, stage: ShaderStage) -> Result<NativeHandle, GraphicsError> {
        let handle = self.allocate();
        self.stages.push((handle, stage));
        self.calls.push(Call::CreateShader(handle, stage));
        Ok(handle)
    }

    fn compile_shader(&mut self, shader: NativeHandle, _source: &str) -> Result<String, GraphicsError> {
        self.calls.push(Call::CompileShader(shader));
        let stage = self
            .stages
            .iter()
            .find(|(handle, _)| *handle == shader)
            .map(|(_, stage)| *stage)
            .ok_or(GraphicsError::UnknownHandle(shader))?;
        Ok(match stage {
            ShaderStage::Vertex => self.vertex_log.clone(),
            ShaderStage::Fragment => self.fragment_log.clone(),
        })
    }

    fn delete_shader(&mut self, shader: NativeHandle) -> Result<(), GraphicsError> {
        self.calls.push(Call::DeleteShader(shader));
        self.free(shader)
    }

    fn create_program(&mut self) -> Result<NativeHandle, GraphicsError> {
        let handle = self.allocate();
        self.calls.push(Call::CreateProgram(handle));
        Ok(handle)
    }

    fn attach_shader(&mut self, program: NativeHandle, shader: NativeHandle) -> Result<(), GraphicsError> {
        self.calls.push(Call::AttachShader(program, shader));
        Ok(())
    }

    fn detach_shader(&mut self, program: NativeHandle, shader: NativeHandle) -> Result<(), GraphicsError> {
        self.calls.push(Call::DetachShader(program, shader));
        Ok(())
    }

    fn link_program(&mut self, program: NativeHandle) -> Result<String, GraphicsError> {
        self.calls.push(Call::LinkProgram(program));
        Ok(self.link_log.clone())
    }

    fn delete_program(&mut self, program: NativeHandle) -> Result<(), GraphicsError> {
        self.calls.push(Call::DeleteProgram(program));
        self.free(program)
    }

    fn resize(&mut self, _width: u32, _height: u32) {}

    fn present(&mut self) -> Result<(), GraphicsError> {
        Ok(())
    }
}

/// Encode a solid `width`×`height` PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([40, 160, 60, 255]));
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, image::ImageFormat::Png)
        .expect("encode png");
    bytes.into_inner()
}
