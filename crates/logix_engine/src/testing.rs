//! Fakes for the platform and graphics collaborators.

use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;

use logix_core::graphics::{GraphicsApi, GraphicsError, NativeHandle, ShaderStage, TextureUpload};

use crate::host::GameWindow;

/// Shared record of what happened to the fake window and GPU.
#[derive(Debug, Default)]
pub struct Journal {
    pub titles: Vec<String>,
    pub requested_sizes: Vec<(u32, u32)>,
    pub resizes: Vec<(u32, u32)>,
    pub deleted_textures: Vec<NativeHandle>,
    pub deleted_programs: Vec<NativeHandle>,
    pub presents: usize,
    pub redraws: usize,
    pub closed: bool,
}

pub type SharedJournal = Rc<RefCell<Journal>>;

pub struct FakeWindow {
    pub journal: SharedJournal,
    pub size: (u32, u32),
}

impl GameWindow for FakeWindow {
    fn set_title(&self, title: &str) {
        self.journal.borrow_mut().titles.push(title.to_string());
    }

    fn inner_size(&self) -> (u32, u32) {
        self.size
    }

    fn request_inner_size(&self, width: u32, height: u32) {
        self.journal.borrow_mut().requested_sizes.push((width, height));
    }

    fn request_redraw(&self) {
        self.journal.borrow_mut().redraws += 1;
    }

    fn close(&self) {
        self.journal.borrow_mut().closed = true;
    }
}

#[derive(Default)]
pub struct FakeGpu {
    pub journal: SharedJournal,
    next: NativeHandle,
}

impl FakeGpu {
    pub fn new(journal: SharedJournal) -> Self {
        Self { journal, next: 0 }
    }

    fn allocate(&mut self) -> NativeHandle {
        self.next += 1;
        self.next
    }
}

impl GraphicsApi for FakeGpu {
    fn create_texture(&mut self, _upload: &TextureUpload<'_>) -> Result<NativeHandle, GraphicsError> {
        Ok(self.allocate())
    }

    fn delete_texture(&mut self, texture: NativeHandle) -> Result<(), GraphicsError> {
        self.journal.borrow_mut().deleted_textures.push(texture);
        Ok(())
    }

    fn create_shader(&mut self, _stage: ShaderStage) -> Result<NativeHandle, GraphicsError> {
        Ok(self.allocate())
    }

    fn compile_shader(&mut self, _shader: NativeHandle, _source: &str) -> Result<String, GraphicsError> {
        Ok(String::new())
    }

    fn delete_shader(&mut self, _shader: NativeHandle) -> Result<(), GraphicsError> {
        Ok(())
    }

    fn create_program(&mut self) -> Result<NativeHandle, GraphicsError> {
        Ok(self.allocate())
    }

    fn attach_shader(&mut self, _program: NativeHandle, _shader: NativeHandle) -> Result<(), GraphicsError> {
        Ok(())
    }

    fn detach_shader(&mut self, _program: NativeHandle, _shader: NativeHandle) -> Result<(), GraphicsError> {
        Ok(())
    }

    fn link_program(&mut self, _program: NativeHandle) -> Result<String, GraphicsError> {
        Ok(String::new())
    }

    fn delete_program(&mut self, program: NativeHandle) -> Result<(), GraphicsError> {
        self.journal.borrow_mut().deleted_programs.push(program);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.journal.borrow_mut().resizes.push((width, height));
    }

    fn present(&mut self) -> Result<(), GraphicsError> {
        self.journal.borrow_mut().presents += 1;
        Ok(())
    }
}

pub fn png_bytes() -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(2, 2, image::Rgba([200, 200, 200, 255]));
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, image::ImageFormat::Png)
        .expect("encode png");
    bytes.into_inner()
}
