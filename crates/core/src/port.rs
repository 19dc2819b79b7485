//! Render port: the narrow drawing seam between the engine and a surface.
//!
//! The engine never talks to a terminal directly. It calls [`RenderPort::write`]
//! for single cells and relies on [`RenderPort::size`] to know where the
//! surface ends. [`MemoryPort`] is a headless surface used by tests and
//! benchmarks; the terminal implementation lives in the `term` crate.

use std::collections::HashMap;
use std::io;

use thiserror::Error;

use crate::types::Color;

/// Failure reported by a surface write.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The write touched (or ran past) the edge of the surface.
    #[error("write at ({x}, {y}) hit the surface boundary")]
    Boundary { x: u16, y: u16 },
    /// Any other surface failure.
    #[error("surface write failed: {0}")]
    Io(#[from] io::Error),
}

/// Something that can show a colored glyph at a screen position.
pub trait RenderPort {
    /// Draw `glyph` at screen column `x`, row `y`.
    fn write(&mut self, x: u16, y: u16, glyph: char, color: Color) -> Result<(), WriteError>;

    /// Current surface dimensions as `(width, height)`.
    fn size(&self) -> (u16, u16);

    /// Adopt new surface dimensions after a resize.
    fn set_size(&mut self, width: u16, height: u16);

    /// Blank the whole surface.
    fn clear(&mut self) -> Result<(), WriteError>;

    /// Push queued output to the device.
    fn flush(&mut self) -> Result<(), WriteError> {
        Ok(())
    }

    /// Screen position of the last addressable cell (bottom-right corner).
    fn last_cell(&self) -> Option<(u16, u16)> {
        let (w, h) = self.size();
        if w == 0 || h == 0 {
            return None;
        }
        Some((w - 1, h - 1))
    }

    /// Draw a run of characters starting at `(x, y)`, clipped to the surface.
    ///
    /// Spaces are written too, so callers can overwrite old text.
    fn write_str(&mut self, x: u16, y: u16, s: &str, color: Color) -> Result<(), WriteError> {
        let (w, h) = self.size();
        if y >= h {
            return Ok(());
        }
        let mut cx = x;
        for ch in s.chars() {
            if cx >= w {
                break;
            }
            match self.write(cx, y, ch, color) {
                Ok(()) => {}
                // Trailing corner writes are expected to report a boundary.
                Err(WriteError::Boundary { .. }) if Some((cx, y)) == self.last_cell() => {}
                Err(e) => return Err(e),
            }
            cx += 1;
        }
        Ok(())
    }
}

/// Scripted failure for [`MemoryPort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailMode {
    /// Report a boundary error but still show the glyph (terminal corner quirk).
    Boundary,
    /// Report an I/O error and leave the cell untouched.
    Io,
}

/// In-memory surface that records every write.
#[derive(Debug, Clone, Default)]
pub struct MemoryPort {
    width: u16,
    height: u16,
    screen: HashMap<(u16, u16), (char, Color)>,
    writes: usize,
    clears: usize,
    flushes: usize,
    failures: HashMap<(u16, u16), FailMode>,
}

impl MemoryPort {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Make writes at `(x, y)` fail the given way.
    pub fn fail_at(&mut self, x: u16, y: u16, mode: FailMode) {
        self.failures.insert((x, y), mode);
    }

    pub fn clear_failures(&mut self) {
        self.failures.clear();
    }

    /// Content currently shown at `(x, y)`; blanks are reported as `None`.
    pub fn shown(&self, x: u16, y: u16) -> Option<(char, Color)> {
        self.screen.get(&(x, y)).copied()
    }

    /// Number of `write` calls received so far (including failed ones).
    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn reset_write_count(&mut self) {
        self.writes = 0;
    }

    pub fn clear_count(&self) -> usize {
        self.clears
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Text of row `y`, blanks as spaces.
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .map(|x| self.shown(x, y).map(|(c, _)| c).unwrap_or(' '))
            .collect()
    }
}

impl RenderPort for MemoryPort {
    fn write(&mut self, x: u16, y: u16, glyph: char, color: Color) -> Result<(), WriteError> {
        self.writes += 1;
        if x >= self.width || y >= self.height {
            return Err(WriteError::Boundary { x, y });
        }

        let shown = |screen: &mut HashMap<(u16, u16), (char, Color)>| {
            if glyph == ' ' {
                screen.remove(&(x, y));
            } else {
                screen.insert((x, y), (glyph, color));
            }
        };

        match self.failures.get(&(x, y)) {
            None => {
                shown(&mut self.screen);
                Ok(())
            }
            Some(FailMode::Boundary) => {
                shown(&mut self.screen);
                Err(WriteError::Boundary { x, y })
            }
            Some(FailMode::Io) => Err(WriteError::Io(io::Error::new(
                io::ErrorKind::Other,
                "scripted write failure",
            ))),
        }
    }

    fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Content outside the new bounds is dropped, as a terminal would.
    fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.screen.retain(|&(x, y), _| x < width && y < height);
    }

    fn clear(&mut self) -> Result<(), WriteError> {
        self.clears += 1;
        self.screen.clear();
        Ok(())
    }

    fn flush(&mut self) -> Result<(), WriteError> {
        self.flushes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_port_rejects_out_of_bounds_writes() {
        let mut port = MemoryPort::new(3, 2);
        assert!(matches!(
            port.write(3, 0, 'x', Color::Red),
            Err(WriteError::Boundary { x: 3, y: 0 })
        ));
        assert!(port.shown(3, 0).is_none());
        assert_eq!(port.write_count(), 1);
    }

    #[test]
    fn memory_port_boundary_quirk_still_shows_glyph() {
        let mut port = MemoryPort::new(3, 2);
        port.fail_at(2, 1, FailMode::Boundary);
        assert!(port.write(2, 1, 'x', Color::Red).is_err());
        assert_eq!(port.shown(2, 1), Some(('x', Color::Red)));
    }

    #[test]
    fn write_str_clips_and_tolerates_the_corner() {
        let mut port = MemoryPort::new(4, 1);
        port.fail_at(3, 0, FailMode::Boundary);
        port.write_str(1, 0, "abcdef", Color::White).unwrap();
        assert_eq!(port.row_text(0), " abc");
    }

    #[test]
    fn shrinking_drops_content_outside_bounds() {
        let mut port = MemoryPort::new(4, 4);
        port.write(3, 3, 'x', Color::Red).unwrap();
        port.write(0, 0, 'y', Color::Red).unwrap();
        port.set_size(2, 2);
        assert!(port.shown(3, 3).is_none());
        assert_eq!(port.shown(0, 0), Some(('y', Color::Red)));
    }

    #[test]
    fn last_cell_of_empty_surface_is_none() {
        let port = MemoryPort::new(0, 5);
        assert_eq!(port.last_cell(), None);
        assert_eq!(MemoryPort::new(5, 4).last_cell(), Some((4, 3)));
    }
}
