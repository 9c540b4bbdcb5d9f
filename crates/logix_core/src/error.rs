use std::path::PathBuf;

use crate::graphics::{GraphicsError, NativeHandle, ShaderStage};

/// Every failure the engine itself can raise.
///
/// Hooks written by games return `anyhow::Result`, so these usually reach the
/// host wrapped in context layers; `kind()` gives the crash report a stable
/// name for each variant regardless of wrapping.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("'{raw}' is not a valid identifier: {reason}")]
    InvalidIdentifier { raw: String, reason: &'static str },

    #[error("The identifier '{id}' is not unique in the {registry} registry.")]
    DuplicateIdentifier { id: String, registry: &'static str },

    #[error("An item with the identifier '{id}' could not be found in the {registry} registry.")]
    RegistryEntryNotFound { id: String, registry: &'static str },

    #[error("Could not load asset file '{}' because the file does not appear to exist", path.display())]
    AssetNotFound { path: PathBuf },

    #[error("Could not read asset file '{}'", path.display())]
    AssetReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not load asset file '{}': {reason}", path.display())]
    AssetLoadFailed { path: PathBuf, reason: String },

    #[error("{0}")]
    AssetFileInvalid(String),

    #[error("Failed to compile {stage} shader '{id}': {log}")]
    ShaderCompilationFailed {
        id: String,
        stage: ShaderStage,
        log: String,
    },

    #[error("Failed to link the shader program for '{id}': {log}")]
    ShaderLinkFailed { id: String, log: String },

    #[error("Cannot set the target {what} to {value}!")]
    InvalidTargetRate { what: &'static str, value: u32 },

    #[error("{0}")]
    DeveloperMisuse(String),

    #[error("Invalid host configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Graphics(#[from] GraphicsError),

    #[error("{} unmanaged resource(s) failed to release", failures.len())]
    ResourceCleanupFailed { failures: Vec<CleanupFailure> },
}

/// One resource that could not be released during `cleanup_all`.
#[derive(Debug)]
pub struct CleanupFailure {
    pub id: String,
    pub handle: NativeHandle,
    pub error: GraphicsError,
}

impl EngineError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier { .. } => "InvalidIdentifier",
            Self::DuplicateIdentifier { .. } => "DuplicateIdentifier",
            Self::RegistryEntryNotFound { .. } => "RegistryEntryNotFound",
            Self::AssetNotFound { .. } => "AssetNotFound",
            Self::AssetReadFailed { .. } => "AssetReadFailed",
            Self::AssetLoadFailed { .. } => "AssetLoadFailed",
            Self::AssetFileInvalid(_) => "AssetFileInvalid",
            Self::ShaderCompilationFailed { .. } => "ShaderCompilationFailed",
            Self::ShaderLinkFailed { .. } => "ShaderLinkFailed",
            Self::InvalidTargetRate { .. } => "InvalidTargetRate",
            Self::DeveloperMisuse(_) => "DeveloperMisuse",
            Self::InvalidConfig(_) => "InvalidConfig",
            Self::Graphics(_) => "GraphicsError",
            Self::ResourceCleanupFailed { .. } => "ResourceCleanupFailed",
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_registry() {
        let err = EngineError::DuplicateIdentifier {
            id: "loading_texture".to_string(),
            registry: "Texture",
        };
        assert_eq!(
            err.to_string(),
            "The identifier 'loading_texture' is not unique in the Texture registry."
        );
        assert_eq!(err.kind(), "DuplicateIdentifier");
    }

    #[test]
    fn read_failure_keeps_io_source() {
        let err = EngineError::AssetReadFailed {
            path: PathBuf::from("textures/a.png"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let source = std::error::Error::source(&err).expect("io source");
        assert_eq!(source.to_string(), "denied");
    }

    #[test]
    fn graphics_errors_convert_transparently() {
        let err: EngineError = GraphicsError::UnknownHandle(7).into();
        assert_eq!(err.kind(), "GraphicsError");
        assert_eq!(err.to_string(), "unknown native handle 7");
    }
}
