//! Window title templating.
//!
//! A title format is plain text with placeholders that are substituted on
//! every refresh:
//!
//! | placeholder | value                                   |
//! |-------------|-----------------------------------------|
//! | `%name%`    | game name                               |
//! | `%version%` | game version                            |
//! | `%cps%`     | measured cycles (updates) per second    |
//! | `%tcps%`    | target cycles per second                |
//! | `%fps%`     | measured frames per second              |
//! | `%tfps%`    | target frames per second                |
//! | `%res%`     | window resolution, `1280×720`           |
//!
//! Rates use two integer digits (`05.0`) when their target is below 100 and
//! three (`060.0`) otherwise. While a resize is in progress, or when a
//! measured rate is implausible (above 999), the rate fields show a row of
//! `─` glyphs of the same width instead of numbers. Unknown placeholders are
//! left as they are.

pub const UNKNOWN_GLYPH: char = '─';
pub const MULTIPLY: char = '×';

pub const DEFAULT_TITLE_FORMAT: &str = "%name% %version%     ≡     %cps%/%tcps% cycles/sec     ≡     %fps%/%tfps% frames/sec     ≡     %res% px";

const IMPLAUSIBLE_RATE: f64 = 999.0;

/// Snapshot of everything a title can show.
#[derive(Debug, Clone, Copy)]
pub struct TitleValues<'a> {
    pub name: &'a str,
    pub version: &'a str,
    pub measured_cps: f64,
    pub target_cps: u32,
    pub measured_fps: f64,
    pub target_fps: u32,
    pub width: u32,
    pub height: u32,
    /// Force the glyph placeholders for every rate (used mid-resize).
    pub rates_unknown: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleTemplate {
    format: String,
}

impl Default for TitleTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE_FORMAT)
    }
}

impl TitleTemplate {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn set_format(&mut self, format: impl Into<String>) {
        self.format = format.into();
    }

    pub fn render(&self, values: &TitleValues<'_>) -> String {
        let cps_unknown = values.rates_unknown || values.measured_cps > IMPLAUSIBLE_RATE;
        let fps_unknown = values.rates_unknown || values.measured_fps > IMPLAUSIBLE_RATE;

        self.format
            .replace("%name%", values.name)
            .replace("%version%", values.version)
            .replace(
                "%cps%",
                &format_rate(values.measured_cps, values.target_cps, cps_unknown),
            )
            .replace(
                "%tcps%",
                &format_rate(f64::from(values.target_cps), values.target_cps, cps_unknown),
            )
            .replace(
                "%fps%",
                &format_rate(values.measured_fps, values.target_fps, fps_unknown),
            )
            .replace(
                "%tfps%",
                &format_rate(f64::from(values.target_fps), values.target_fps, fps_unknown),
            )
            .replace(
                "%res%",
                &format!("{}{MULTIPLY}{}", values.width, values.height),
            )
    }
}

/// Format `value` with the digit count implied by `target`, or as glyphs.
pub fn format_rate(value: f64, target: u32, unknown: bool) -> String {
    let three_digits = target > 99;
    if unknown {
        let width = if three_digits { 4 } else { 3 };
        return std::iter::repeat(UNKNOWN_GLYPH).take(width).collect();
    }
    if three_digits {
        format!("{value:05.1}")
    } else {
        format!("{value:04.1}")
    }
}
