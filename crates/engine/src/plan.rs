//! Sort plan construction.
//!
//! When the region is full, the engine snapshots every cell and orders the
//! snapshot by (color rank, glyph rank). Color ranks are reshuffled each cycle
//! so a different color leads every time.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::{glyph_rank, Cell, Color};

/// Rank of each color for one cycle, indexed by [`Color::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorRanks([u8; Color::COUNT]);

impl ColorRanks {
    /// Palette order: red first, black last.
    pub fn identity() -> Self {
        let mut ranks = [0u8; Color::COUNT];
        for (i, r) in ranks.iter_mut().enumerate() {
            *r = i as u8;
        }
        Self(ranks)
    }

    /// A fresh uniformly random permutation.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut order = Color::ALL;
        order.shuffle(rng);
        Self::from_order(&order)
    }

    /// Ranks from a leading-first color order.
    pub fn from_order(order: &[Color; Color::COUNT]) -> Self {
        let mut ranks = [0u8; Color::COUNT];
        for (rank, color) in order.iter().enumerate() {
            ranks[color.index()] = rank as u8;
        }
        Self(ranks)
    }

    pub fn rank(&self, color: Color) -> u8 {
        self.0[color.index()]
    }

    /// Colors sorted by rank.
    pub fn order(&self) -> [Color; Color::COUNT] {
        let mut out = Color::ALL;
        out.sort_by_key(|c| self.rank(*c));
        out
    }
}

/// Order `cells` into the target arrangement.
///
/// The result is a permutation of the input: nothing is added or dropped.
pub fn build_sort_plan(mut cells: Vec<Cell>, ranks: &ColorRanks) -> Vec<Cell> {
    cells.sort_by_key(|c| (ranks.rank(c.color), glyph_rank(c.glyph).unwrap_or(usize::MAX)));
    cells
}
