//! Cell buffer - what is currently rendered where.
//!
//! The buffer mirrors the visible content of the drawable region: a coordinate
//! is present iff the surface shows a glyph there. [`CellBuffer::render`] is the
//! only path from the engine to the [`RenderPort`] for grid cells, which keeps
//! redraws idempotent (identical content is never re-emitted).

use std::collections::HashMap;

use log::{debug, warn};

use crate::port::{RenderPort, WriteError};
use crate::types::{Cell, Color, Coord, Region};

/// Result of a [`CellBuffer::render`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The buffer already held this cell; nothing was written.
    Unchanged,
    /// The cell was written and recorded.
    Drawn,
    /// The surface rejected the write; the entry was rolled back.
    Dropped,
}

#[derive(Debug, Clone, Default)]
pub struct CellBuffer {
    region: Region,
    cells: HashMap<Coord, Cell>,
}

impl CellBuffer {
    pub fn new(region: Region) -> Self {
        Self {
            region,
            cells: HashMap::with_capacity(region.capacity()),
        }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// Forget every cell and adopt a (possibly new) region.
    pub fn reset(&mut self, region: Region) {
        self.region = region;
        self.cells.clear();
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn put(&mut self, coord: Coord, cell: Cell) {
        self.cells.insert(coord, cell);
    }

    pub fn get(&self, coord: Coord) -> Option<Cell> {
        self.cells.get(&coord).copied()
    }

    pub fn occupancy(&self) -> usize {
        self.cells.len()
    }

    pub fn capacity(&self) -> usize {
        self.region.capacity()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        self.cells.iter().map(|(c, cell)| (*c, *cell))
    }

    /// Copy of every cell currently present, in no particular order.
    pub fn cells(&self) -> Vec<Cell> {
        self.cells.values().copied().collect()
    }

    /// Draw `cell` at `coord` unless it is already shown there.
    ///
    /// A boundary error at the surface's bottom-right cell is accepted as a
    /// successful write. Any other error removes the entry for `coord`.
    pub fn render<P: RenderPort + ?Sized>(
        &mut self,
        coord: Coord,
        cell: Cell,
        port: &mut P,
    ) -> RenderOutcome {
        if self.get(coord) == Some(cell) {
            return RenderOutcome::Unchanged;
        }

        self.cells.insert(coord, cell);
        let (sx, sy) = self.region.to_screen(coord);
        match port.write(sx, sy, cell.glyph, cell.color) {
            Ok(()) => RenderOutcome::Drawn,
            Err(WriteError::Boundary { .. }) if port.last_cell() == Some((sx, sy)) => {
                RenderOutcome::Drawn
            }
            Err(e) => {
                warn!("render at {:?} (screen {},{}) failed: {}", coord, sx, sy, e);
                self.cells.remove(&coord);
                RenderOutcome::Dropped
            }
        }
    }

    /// Blank every recorded cell on the surface and empty the buffer.
    ///
    /// Used between cycles so the next fill starts from a clean region
    /// without clearing the rest of the screen.
    pub fn wipe<P: RenderPort + ?Sized>(&mut self, port: &mut P) {
        let coords: Vec<Coord> = self.cells.keys().copied().collect();
        for coord in coords {
            self.erase(coord, port);
        }
        self.cells.clear();
    }

    /// Write the recorded content of `coord` again, or a blank if it is empty.
    ///
    /// The entry is kept whether or not the surface accepts the write.
    pub fn repaint<P: RenderPort + ?Sized>(&mut self, coord: Coord, port: &mut P) -> bool {
        let (glyph, color) = match self.get(coord) {
            Some(cell) => (cell.glyph, cell.color),
            None => (' ', Color::White),
        };
        let (sx, sy) = self.region.to_screen(coord);
        match port.write(sx, sy, glyph, color) {
            Ok(()) => true,
            Err(WriteError::Boundary { .. }) if port.last_cell() == Some((sx, sy)) => true,
            Err(e) => {
                debug!("repaint at {:?} failed: {}", coord, e);
                false
            }
        }
    }

    /// Blank `coord` on the surface and drop it from the buffer.
    ///
    /// Returns `false` if the surface refused the blank; the entry is dropped
    /// either way since its on-screen state is no longer known.
    pub fn erase<P: RenderPort + ?Sized>(&mut self, coord: Coord, port: &mut P) -> bool {
        if self.cells.remove(&coord).is_none() {
            return true;
        }
        let (sx, sy) = self.region.to_screen(coord);
        match port.write(sx, sy, ' ', Color::White) {
            Ok(()) => true,
            Err(WriteError::Boundary { .. }) if port.last_cell() == Some((sx, sy)) => true,
            Err(e) => {
                debug!("erase at {:?} failed: {}", coord, e);
                false
            }
        }
    }
}
