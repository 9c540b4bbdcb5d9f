//! Locating and reading asset files.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use logix_core::graphics::GraphicsApi;
use logix_core::{EngineError, Logger, ResourceTracker};

pub const TEXTURE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];
pub const VERTEX_SHADER_EXTENSIONS: &[&str] = &["wgsl", "glsl", "vs", "vert", "shader"];
pub const FRAGMENT_SHADER_EXTENSIONS: &[&str] = &["wgsl", "glsl", "fs", "frag", "shader"];

/// Where asset bytes come from. Paths are relative to the asset root and use
/// the platform separator.
pub trait AssetSource {
    fn read(&self, path: &Path) -> Result<Vec<u8>, EngineError>;
}

/// Assets stored under a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirectoryAssets {
    fn read(&self, path: &Path) -> Result<Vec<u8>, EngineError> {
        let full = self.root.join(path);
        fs::read(&full).map_err(|source| match source.kind() {
            ErrorKind::NotFound => EngineError::AssetNotFound { path: full },
            _ => EngineError::AssetReadFailed { path: full, source },
        })
    }
}

/// Assets held in memory, keyed by their normalised relative path.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: &str, bytes: impl Into<Vec<u8>>) {
        self.files.insert(asset_path(path), bytes.into());
    }

    pub fn with(mut self, path: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }
}

impl AssetSource for MemoryAssets {
    fn read(&self, path: &Path) -> Result<Vec<u8>, EngineError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| EngineError::AssetNotFound {
                path: path.to_path_buf(),
            })
    }
}

/// Collaborators every asset load needs.
pub struct AssetLoader<'a> {
    pub log: &'a Logger,
    pub assets: &'a dyn AssetSource,
    pub gpu: &'a mut dyn GraphicsApi,
    pub resources: &'a mut ResourceTracker,
}

/// Check `filename` against `allowed` (lowercase, without dots).
///
/// A name without an extension gets the first allowed one appended, with a
/// warning unless `suppress_warning` is set. A name whose extension is not
/// allowed is rejected.
pub fn verify_extension(
    log: &Logger,
    filename: &str,
    allowed: &[&str],
    suppress_warning: bool,
) -> Result<String, EngineError> {
    let Some(default_extension) = allowed.first() else {
        return Err(EngineError::DeveloperMisuse(
            "verify_extension needs at least one allowed extension".to_string(),
        ));
    };
    let file_name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);

    match Path::new(file_name).extension().and_then(|e| e.to_str()) {
        None => {
            let fixed = format!("{}.{default_extension}", filename.trim_end_matches('.'));
            if !suppress_warning {
                log.warning(format!(
                    "The file '{filename}' has no extension; assuming '{fixed}'"
                ));
            }
            Ok(fixed)
        }
        Some(extension) if allowed.iter().any(|a| a.eq_ignore_ascii_case(extension)) => {
            Ok(filename.to_string())
        }
        Some(extension) => Err(EngineError::AssetFileInvalid(format!(
            "The file '{filename}' has the extension '.{extension}', expected one of: {}",
            allowed
                .iter()
                .map(|a| format!(".{a}"))
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

/// Turn a `/`- or `\`-separated asset name into a relative path with the
/// platform separator.
pub fn asset_path(name: &str) -> PathBuf {
    let normalised: String = name
        .trim_start_matches(['/', '\\'])
        .chars()
        .map(|c| if c == '/' || c == '\\' { MAIN_SEPARATOR } else { c })
        .collect();
    PathBuf::from(normalised)
}
