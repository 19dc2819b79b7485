//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (animation engine, terminal port, runtime glue).
//!
//! # Coordinates
//!
//! The animation works on a rectangular **region** of the terminal (the inside
//! of the defrag box). Coordinates handed to the engine are local to that
//! region; [`Region::to_screen`] maps them onto terminal columns/rows.
//!
//! - **Row-major index**: `y * width + x`
//! - **Capacity**: `width * height`
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DRAW_INTERVAL_MS` | 8 | Pause between two engine ticks |
//! | `WAIT_MS` | 2000 | Hold time for the sorted picture |
//! | `INPUT_POLL_MS` | 100 | Foreground input poll timeout |
//! | `JOIN_TIMEOUT_MS` | 2000 | Upper bound for joining the pulse thread |
//! | `STATUS_REFRESH_MS` | 250 | Minimum status panel refresh period |
//!
//! # Examples
//!
//! ```
//! use tui_defrag_types::{Cell, Color, Coord, Region};
//!
//! let region = Region::new(Coord::new(2, 1), 4, 3);
//! assert_eq!(region.capacity(), 12);
//! assert_eq!(region.index(Coord::new(1, 2)), 9);
//! assert_eq!(region.coord_at(9), Coord::new(1, 2));
//! assert_eq!(region.to_screen(Coord::new(0, 0)), (2, 1));
//!
//! let cell = Cell::new('A', Color::Blue);
//! assert_eq!(cell.color.id(), 4);
//! assert_eq!(Color::from_id(4), Some(Color::Blue));
//! ```

/// Pause between two engine ticks (8ms).
pub const DRAW_INTERVAL_MS: u64 = 8;

/// How long the sorted picture stays on screen before a new cycle (2 seconds).
pub const WAIT_MS: u64 = 2000;

/// Foreground input poll timeout (100ms).
pub const INPUT_POLL_MS: u64 = 100;

/// Upper bound for joining the pulse thread on shutdown (2 seconds).
pub const JOIN_TIMEOUT_MS: u64 = 2000;

/// Minimum refresh period of the status panel when nothing changed.
pub const STATUS_REFRESH_MS: u64 = 250;

/// Printable glyph ordering used for placement and sorting.
///
/// All visible, non-whitespace ASCII characters from `!` (0x21) to `~` (0x7E).
/// A glyph's position in this table is its sort rank.
pub const GLYPHS: [char; 94] = {
    let mut out = ['!'; 94];
    let mut i = 0;
    while i < 94 {
        out[i] = (b'!' + i as u8) as char;
        i += 1;
    }
    out
};

/// Sort rank of a glyph inside [`GLYPHS`].
///
/// # Examples
///
/// ```
/// use tui_defrag_types::glyph_rank;
///
/// assert_eq!(glyph_rank('!'), Some(0));
/// assert_eq!(glyph_rank('~'), Some(93));
/// assert_eq!(glyph_rank(' '), None);
/// ```
pub fn glyph_rank(glyph: char) -> Option<usize> {
    if ('!'..='~').contains(&glyph) {
        Some(glyph as usize - '!' as usize)
    } else {
        None
    }
}

/// The fixed color set.
///
/// Each color has a small positive id (1..=8) used by the terminal
/// attribute table; the mapping is static and closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Black,
}

impl Color {
    /// Number of colors in the palette.
    pub const COUNT: usize = 8;

    /// Every color, in id order.
    pub const ALL: [Color; Color::COUNT] = [
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
        Color::White,
        Color::Black,
    ];

    /// Attribute id (1..=8).
    pub const fn id(self) -> u8 {
        match self {
            Color::Red => 1,
            Color::Green => 2,
            Color::Yellow => 3,
            Color::Blue => 4,
            Color::Magenta => 5,
            Color::Cyan => 6,
            Color::White => 7,
            Color::Black => 8,
        }
    }

    /// Zero-based slot for static tables indexed by color.
    pub const fn index(self) -> usize {
        self.id() as usize - 1
    }

    /// Look a color up by attribute id.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1..=8 => Some(Color::ALL[id as usize - 1]),
            _ => None,
        }
    }

    /// Parse color from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_defrag_types::Color;
    ///
    /// assert_eq!(Color::from_str("red"), Some(Color::Red));
    /// assert_eq!(Color::from_str("CYAN"), Some(Color::Cyan));
    /// assert_eq!(Color::from_str("orange"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(Color::Red),
            "green" => Some(Color::Green),
            "yellow" => Some(Color::Yellow),
            "blue" => Some(Color::Blue),
            "magenta" => Some(Color::Magenta),
            "cyan" => Some(Color::Cyan),
            "white" => Some(Color::White),
            "black" => Some(Color::Black),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Blue => "blue",
            Color::Magenta => "magenta",
            Color::Cyan => "cyan",
            Color::White => "white",
            Color::Black => "black",
        }
    }
}

/// A position inside the drawable region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: u16,
    pub y: u16,
}

impl Coord {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Rendered content of one coordinate: a glyph and its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub glyph: char,
    pub color: Color,
}

impl Cell {
    pub const fn new(glyph: char, color: Color) -> Self {
        Self { glyph, color }
    }
}

/// Rectangular drawable area, positioned on the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    /// Screen column of local x = 0.
    pub origin_x: u16,
    /// Screen row of local y = 0.
    pub origin_y: u16,
    pub width: u16,
    pub height: u16,
}

impl Region {
    pub fn new(origin: Coord, width: u16, height: u16) -> Self {
        Self {
            origin_x: origin.x,
            origin_y: origin.y,
            width,
            height,
        }
    }

    /// Total addressable cells.
    pub fn capacity(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.capacity() == 0
    }

    pub fn contains(&self, c: Coord) -> bool {
        c.x < self.width && c.y < self.height
    }

    /// Row-major index of a local coordinate.
    #[inline(always)]
    pub fn index(&self, c: Coord) -> usize {
        (c.y as usize) * (self.width as usize) + (c.x as usize)
    }

    /// Inverse of [`Region::index`].
    #[inline(always)]
    pub fn coord_at(&self, index: usize) -> Coord {
        let w = self.width.max(1) as usize;
        Coord::new((index % w) as u16, (index / w) as u16)
    }

    /// Screen position of a local coordinate.
    pub fn to_screen(&self, c: Coord) -> (u16, u16) {
        (
            self.origin_x.saturating_add(c.x),
            self.origin_y.saturating_add(c.y),
        )
    }

    /// Every coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.capacity()).map(move |i| self.coord_at(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_table_is_printable_and_ordered() {
        assert_eq!(GLYPHS[0], '!');
        assert_eq!(GLYPHS[93], '~');
        for (i, g) in GLYPHS.iter().enumerate() {
            assert!(!g.is_whitespace());
            assert_eq!(glyph_rank(*g), Some(i));
        }
    }

    #[test]
    fn color_ids_are_one_to_one() {
        for (i, c) in Color::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
            assert_eq!(Color::from_id(c.id()), Some(*c));
            assert_eq!(Color::from_str(c.as_str()), Some(*c));
        }
        assert_eq!(Color::from_id(0), None);
        assert_eq!(Color::from_id(9), None);
    }

    #[test]
    fn region_index_round_trips_for_every_cell() {
        let region = Region::new(Coord::new(3, 4), 7, 5);
        for (i, c) in region.coords().enumerate() {
            assert_eq!(region.index(c), i);
            assert!(region.contains(c));
        }
        assert!(!region.contains(Coord::new(7, 0)));
        assert!(!region.contains(Coord::new(0, 5)));
    }

    #[test]
    fn empty_region_has_no_cells() {
        let region = Region::default();
        assert!(region.is_empty());
        assert_eq!(region.coords().count(), 0);
    }
}
