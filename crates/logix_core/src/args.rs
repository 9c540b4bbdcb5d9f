//! Startup argument handling.
//!
//! Flags are single-dash and case-insensitive. Anything unrecognised is kept
//! so the host can warn about it; an unknown argument never stops the game.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOptions {
    /// `-debug`: debug records are kept and the console is shown.
    pub debug: bool,
    /// `-console`: show the console without debug records.
    pub console: bool,
    /// `-drwr`: don't render while the window is being resized.
    pub dont_render_while_resizing: bool,
    pub unknown: Vec<String>,
}

impl LaunchOptions {
    /// Parse process arguments, excluding the program name.
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        for arg in args {
            let arg = arg.as_ref();
            match arg.to_ascii_lowercase().as_str() {
                "-debug" => options.debug = true,
                "-console" => options.console = true,
                "-drwr" => options.dont_render_while_resizing = true,
                _ => options.unknown.push(arg.to_string()),
            }
        }
        options
    }

    pub fn console_visible(&self) -> bool {
        self.debug || self.console
    }
}
