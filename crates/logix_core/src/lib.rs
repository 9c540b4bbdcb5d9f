pub mod args;
pub mod config;
pub mod crash;
pub mod error;
pub mod graphics;
pub mod identifier;
pub mod logger;
pub mod registry;
pub mod resources;
pub mod time;
pub mod title;

pub use args::LaunchOptions;
pub use config::{HostConfig, WindowMode};
pub use crash::{CrashReport, FaultRecord};
pub use error::{EngineError, EngineResult};
pub use graphics::{GraphicsApi, GraphicsError, NativeHandle, ShaderStage};
pub use identifier::Identifier;
pub use logger::{Logger, Severity};
pub use registry::{Identifiable, Registry};
pub use resources::{ResourceTracker, UnmanagedResource};

pub const LOGIX_ENGINE_VERSION: &str = "1.0.0";
