use std::sync::Arc;

use logix_core::graphics::{FilterMode, GraphicsApi, GraphicsError, NativeHandle, TextureUpload, WrapMode};
use logix_core::{EngineError, Identifiable, Identifier, UnmanagedResource};

use crate::assets::{asset_path, verify_extension, AssetLoader, TEXTURE_EXTENSIONS};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextureOptions {
    pub suppress_extension_warning: bool,
    /// Keep the decoded RGBA8 pixels on the CPU side after upload.
    pub store_raw_data: bool,
    pub wrap_u: WrapMode,
    pub wrap_v: WrapMode,
    pub min_filter: FilterMode,
    pub mag_filter: FilterMode,
}

/// A 2D RGBA texture living on the GPU.
#[derive(Debug, Clone)]
pub struct Texture {
    id: Identifier,
    handle: NativeHandle,
    width: u32,
    height: u32,
    raw_data: Option<Arc<[u8]>>,
}

impl Texture {
    /// Read, decode and upload `filename` (relative to the asset root), then
    /// hand the texture to the resource tracker.
    pub fn load(
        loader: &mut AssetLoader<'_>,
        id: Identifier,
        filename: &str,
        options: &TextureOptions,
    ) -> Result<Texture, EngineError> {
        let filename = verify_extension(
            loader.log,
            filename,
            TEXTURE_EXTENSIONS,
            options.suppress_extension_warning,
        )?;
        let path = asset_path(&filename);
        let bytes = loader.assets.read(&path)?;

        let image = image::load_from_memory(&bytes)
            .map_err(|e| EngineError::AssetLoadFailed {
                path: path.clone(),
                reason: e.to_string(),
            })?
            .to_rgba8();
        let (width, height) = image.dimensions();

        let handle = loader.gpu.create_texture(&TextureUpload {
            label: id.as_str(),
            width,
            height,
            rgba: image.as_raw(),
            wrap_u: options.wrap_u,
            wrap_v: options.wrap_v,
            min_filter: options.min_filter,
            mag_filter: options.mag_filter,
        })?;
        loader.log.debug(format!(
            "Loaded texture '{id}' from '{}' ({width}x{height})",
            path.display()
        ));

        let texture = Texture {
            id,
            handle,
            width,
            height,
            raw_data: options
                .store_raw_data
                .then(|| Arc::from(image.into_raw().into_boxed_slice())),
        };
        loader.resources.track(Box::new(texture.clone()));
        Ok(texture)
    }

    pub fn handle(&self) -> NativeHandle {
        self.handle
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Decoded pixels, when the texture was loaded with `store_raw_data`.
    pub fn raw_data(&self) -> Option<&[u8]> {
        self.raw_data.as_deref()
    }
}

impl Identifiable for Texture {
    const KIND: &'static str = "Texture";

    fn identifier(&self) -> &Identifier {
        &self.id
    }
}

impl UnmanagedResource for Texture {
    fn identifier(&self) -> &Identifier {
        &self.id
    }

    fn native_handle(&self) -> NativeHandle {
        self.handle
    }

    fn kind(&self) -> &'static str {
        <Self as Identifiable>::KIND
    }

    fn release(&self, gpu: &mut dyn GraphicsApi) -> Result<(), GraphicsError> {
        gpu.delete_texture(self.handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssets;
    use crate::testing::{png_bytes, Call, RecordingGpu};
    use logix_core::{Logger, ResourceTracker};

    fn id(raw: &str) -> Identifier {
        Identifier::new(raw).expect("valid id")
    }

    #[test]
    fn load_uploads_decoded_pixels_and_tracks_the_texture() {
        let log = Logger::new();
        let assets = MemoryAssets::new().with("textures/gui/loading.png", png_bytes(3, 2));
        let mut gpu = RecordingGpu::default();
        let mut resources = ResourceTracker::new();
        let mut loader = AssetLoader {
            log: &log,
            assets: &assets,
            gpu: &mut gpu,
            resources: &mut resources,
        };

        let texture = Texture::load(
            &mut loader,
            id("loading_texture"),
            "textures/gui/loading.png",
            &TextureOptions::default(),
        )
        .expect("texture loads");

        assert_eq!((texture.width(), texture.height()), (3, 2));
        assert!(texture.raw_data().is_none());
        assert_eq!(gpu.calls, vec![Call::CreateTexture { handle: 1, width: 3, height: 2 }]);
        assert_eq!(resources.len(), 1);
        assert_eq!(resources.iter().next().map(|r| r.native_handle()), Some(texture.handle()));
    }

    #[test]
    fn raw_data_is_kept_on_request() {
        let log = Logger::new();
        let assets = MemoryAssets::new().with("a.png", png_bytes(2, 2));
        let mut gpu = RecordingGpu::default();
        let mut resources = ResourceTracker::new();
        let mut loader = AssetLoader {
            log: &log,
            assets: &assets,
            gpu: &mut gpu,
            resources: &mut resources,
        };
        let options = TextureOptions {
            store_raw_data: true,
            ..TextureOptions::default()
        };

        let texture = Texture::load(&mut loader, id("tex_raw"), "a", &options).expect("loads with default extension");
        assert_eq!(texture.raw_data().map(<[u8]>::len), Some(2 * 2 * 4));
        assert!(log.records()[0].message.contains("has no extension"));
    }

    #[test]
    fn missing_file_is_not_tracked() {
        let log = Logger::new();
        let assets = MemoryAssets::new();
        let mut gpu = RecordingGpu::default();
        let mut resources = ResourceTracker::new();
        let mut loader = AssetLoader {
            log: &log,
            assets: &assets,
            gpu: &mut gpu,
            resources: &mut resources,
        };

        let err = Texture::load(&mut loader, id("tex_gone"), "gone.png", &TextureOptions::default())
            .expect_err("missing asset");
        assert_eq!(err.kind(), "AssetNotFound");
        assert!(gpu.calls.is_empty());
        assert!(resources.is_empty());
    }

    #[test]
    fn undecodable_bytes_fail_with_asset_load_failed() {
        let log = Logger::new();
        let assets = MemoryAssets::new().with("bad.png", b"not a png".to_vec());
        let mut gpu = RecordingGpu::default();
        let mut resources = ResourceTracker::new();
        let mut loader = AssetLoader {
            log: &log,
            assets: &assets,
            gpu: &mut gpu,
            resources: &mut resources,
        };

        let err = Texture::load(&mut loader, id("tex_bad"), "bad.png", &TextureOptions::default())
            .expect_err("decode failure");
        assert_eq!(err.kind(), "AssetLoadFailed");
        assert!(resources.is_empty());
    }

    #[test]
    fn release_deletes_the_native_texture() {
        let texture = Texture {
            id: id("tex_release"),
            handle: 9,
            width: 1,
            height: 1,
            raw_data: None,
        };
        let mut gpu = RecordingGpu::default();
        UnmanagedResource::release(&texture, &mut gpu).unwrap();
        assert_eq!(gpu.calls, vec![Call::DeleteTexture(9)]);
        assert_eq!(UnmanagedResource::kind(&texture), "Texture");
    }
}
