//! CrosstermPort: the real terminal behind [`RenderPort`].
//!
//! Writes are queued into an in-memory byte buffer and pushed to stdout on
//! [`RenderPort::flush`], so one engine tick costs one `write` syscall.

use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use log::{debug, info};

use crossterm::{
    cursor,
    style::{self, Attribute, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal, QueueableCommand,
};

use crate::core::{RenderPort, WriteError};
use crate::types::Color;

/// Terminal color for each palette entry, indexed by [`Color::index`].
pub const COLOR_TABLE: [style::Color; Color::COUNT] = [
    style::Color::DarkRed,
    style::Color::DarkGreen,
    style::Color::DarkYellow,
    style::Color::DarkBlue,
    style::Color::DarkMagenta,
    style::Color::DarkCyan,
    style::Color::Grey,
    style::Color::Black,
];

/// Terminal color for a palette entry.
pub fn terminal_color(color: Color) -> style::Color {
    COLOR_TABLE[color.index()]
}

/// Fewest colors the palette needs.
pub const MIN_COLORS: u16 = 8;

pub struct CrosstermPort {
    stdout: io::Stdout,
    buf: Vec<u8>,
    width: u16,
    height: u16,
    current: Option<Color>,
    entered: bool,
}

impl CrosstermPort {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            buf: Vec::with_capacity(16 * 1024),
            width: 0,
            height: 0,
            current: None,
            entered: false,
        }
    }

    /// Switch the terminal into animation mode.
    ///
    /// Fails if the terminal cannot report its size or lacks color support.
    pub fn enter(&mut self) -> Result<()> {
        let colors = style::available_color_count();
        if colors < MIN_COLORS {
            bail!("terminal reports {} colors, need at least {}", colors, MIN_COLORS);
        }

        let (w, h) = terminal::size().context("terminal size unavailable")?;
        self.set_size(w, h);

        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        self.entered = true;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.buf.queue(terminal::Clear(terminal::ClearType::All))?;
        self.flush_buf()?;
        self.current = None;
        info!("terminal entered ({}x{}, {} colors)", w, h, colors);
        Ok(())
    }

    /// Restore the terminal. Safe to call more than once.
    pub fn exit(&mut self) -> Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::Clear(terminal::ClearType::All))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        self.entered = false;
        info!("terminal restored");
        Ok(())
    }

    fn flush_buf(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        self.buf.clear();
        Ok(())
    }
}

impl Default for CrosstermPort {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CrosstermPort {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}

impl RenderPort for CrosstermPort {
    fn write(&mut self, x: u16, y: u16, glyph: char, color: Color) -> Result<(), WriteError> {
        if x >= self.width || y >= self.height {
            return Err(WriteError::Boundary { x, y });
        }
        encode_cell_into(&mut self.buf, &mut self.current, x, y, glyph, color)?;
        Ok(())
    }

    fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn set_size(&mut self, width: u16, height: u16) {
        if (width, height) != (self.width, self.height) {
            debug!("port size {}x{} -> {}x{}", self.width, self.height, width, height);
        }
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self) -> Result<(), WriteError> {
        self.buf.queue(ResetColor)?;
        self.buf.queue(terminal::Clear(terminal::ClearType::All))?;
        self.current = None;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), WriteError> {
        self.flush_buf()?;
        Ok(())
    }
}

/// Encode one positioned glyph into `out`.
///
/// The foreground color is only emitted when it differs from `current`.
pub fn encode_cell_into(
    out: &mut Vec<u8>,
    current: &mut Option<Color>,
    x: u16,
    y: u16,
    glyph: char,
    color: Color,
) -> io::Result<()> {
    out.queue(cursor::MoveTo(x, y))?;
    if *current != Some(color) {
        out.queue(SetForegroundColor(terminal_color(color)))?;
        *current = Some(color);
    }
    out.queue(Print(glyph))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_table_matches_palette_order() {
        assert_eq!(terminal_color(Color::Red), style::Color::DarkRed);
        assert_eq!(terminal_color(Color::Black), style::Color::Black);
        assert_eq!(COLOR_TABLE.len(), Color::ALL.len());
    }

    #[test]
    fn out_of_bounds_write_reports_boundary() {
        let mut port = CrosstermPort::new();
        port.set_size(4, 3);
        assert!(matches!(
            port.write(4, 0, 'x', Color::Red),
            Err(WriteError::Boundary { x: 4, y: 0 })
        ));
        assert!(port.buf.is_empty());
    }

    #[test]
    fn repeated_color_is_emitted_once() {
        let mut out = Vec::new();
        let mut current = None;
        encode_cell_into(&mut out, &mut current, 0, 0, 'a', Color::Blue).unwrap();
        let first = out.len();
        out.clear();
        encode_cell_into(&mut out, &mut current, 1, 0, 'b', Color::Blue).unwrap();
        assert!(out.len() < first);
        assert_eq!(current, Some(Color::Blue));
    }
}
