pub mod app;
pub mod engine;
pub mod game;
pub mod host;

#[cfg(test)]
mod testing;

pub use app::run;
pub use engine::Engine;
pub use game::{CloseVote, Game};
pub use host::{GameWindow, Host, HostState, RunOutcome};

pub use logix_core::{EngineError, HostConfig, Identifier, WindowMode, LOGIX_ENGINE_VERSION};
pub use logix_render::TextureOptions;
