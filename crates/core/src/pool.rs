//! Coordinate pool - collision-free random placement
//!
//! Holds every coordinate of the region that has not been drawn yet in the
//! current cycle. The universe is shuffled once on reset (Fisher-Yates), so
//! popping from the back yields a uniformly random unused coordinate in O(1).

use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::{Coord, Region};

#[derive(Debug, Clone, Default)]
pub struct CoordinatePool {
    free: Vec<Coord>,
}

impl CoordinatePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the full coordinate universe of `region` and shuffle it.
    pub fn reset<R: Rng + ?Sized>(&mut self, region: Region, rng: &mut R) {
        self.free.clear();
        self.free.reserve(region.capacity());
        self.free.extend(region.coords());
        self.free.shuffle(rng);
    }

    /// Remove and return a random unused coordinate.
    ///
    /// `None` means the pool is exhausted; callers are expected to check
    /// occupancy against capacity first.
    pub fn take(&mut self) -> Option<Coord> {
        self.free.pop()
    }

    /// Put back a coordinate whose draw did not make it to the screen.
    ///
    /// It lands at a random slot so later takes stay uniform.
    pub fn restore<R: Rng + ?Sized>(&mut self, coord: Coord, rng: &mut R) {
        let slot = rng.gen_range(0..=self.free.len());
        self.free.insert(slot, coord);
    }

    pub fn clear(&mut self) {
        self.free.clear();
    }

    pub fn len(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.free.contains(&coord)
    }
}
