pub mod console;
pub mod window;

pub use window::{create_window, WindowConfig};
