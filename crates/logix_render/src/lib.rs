pub mod assets;
pub mod gpu_context;
pub mod shader;
pub mod texture;

#[cfg(test)]
mod testing;

pub use assets::{AssetLoader, AssetSource, DirectoryAssets, MemoryAssets};
pub use gpu_context::GpuContext;
pub use shader::Shader;
pub use texture::{Texture, TextureOptions};
