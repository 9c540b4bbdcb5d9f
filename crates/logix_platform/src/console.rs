//! The text console the game was launched from.
//!
//! Everything here is best effort: a console that cannot report its size or
//! take a title just gets the fallbacks.

use std::io::{self, IsTerminal, Write};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal;

pub const FALLBACK_WIDTH: usize = 120;

/// True when stdin and stderr are both attached to a terminal.
pub fn is_interactive() -> bool {
    io::stdin().is_terminal() && io::stderr().is_terminal()
}

/// Console width in columns.
pub fn width() -> usize {
    terminal::size()
        .map(|(cols, _)| usize::from(cols))
        .unwrap_or(FALLBACK_WIDTH)
}

pub fn set_title(title: &str) {
    if let Err(err) = crossterm::execute!(io::stderr(), terminal::SetTitle(title)) {
        log::debug!("Could not set console title: {err}");
    }
}

/// Print `prompt` and block until a key is pressed.
pub fn wait_for_key(prompt: &str) -> io::Result<()> {
    let mut stderr = io::stderr();
    writeln!(stderr, "{prompt}")?;
    stderr.flush()?;

    terminal::enable_raw_mode()?;
    let result: io::Result<()> = (|| loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(());
            }
        }
    })();
    terminal::disable_raw_mode()?;
    result
}
