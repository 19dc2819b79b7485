//! Core grid state - pure, testable building blocks of the animation
//!
//! This crate owns the data the animation engine mutates every tick. It has
//! **no dependency** on a real terminal: drawing goes through the
//! [`port::RenderPort`] trait, so everything here runs headless in tests.
//!
//! # Module Structure
//!
//! - [`pool`]: shuffled set of coordinates not yet drawn in the current cycle
//! - [`buffer`]: coordinate → cell map mirroring what the surface shows
//! - [`port`]: the drawing seam, its error type, and an in-memory surface
//!
//! # Invariants
//!
//! While the engine is drawing, the pool and the buffer partition the region:
//!
//! - `pool ∩ keys(buffer) = ∅`
//! - `|pool| + occupancy = capacity`
//!
//! # Example
//!
//! ```
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use tui_defrag_core::{CellBuffer, CoordinatePool, MemoryPort};
//! use tui_defrag_types::{Cell, Color, Coord, Region};
//!
//! let region = Region::new(Coord::new(0, 0), 3, 2);
//! let mut rng = StdRng::seed_from_u64(1);
//! let mut pool = CoordinatePool::new();
//! let mut buffer = CellBuffer::new(region);
//! let mut port = MemoryPort::new(3, 2);
//!
//! pool.reset(region, &mut rng);
//! let c = pool.take().unwrap();
//! buffer.render(c, Cell::new('@', Color::Red), &mut port);
//!
//! assert_eq!(pool.len() + buffer.occupancy(), region.capacity());
//! ```

pub mod buffer;
pub mod pool;
pub mod port;

pub use tui_defrag_types as types;

// Re-export commonly used types for convenience
pub use buffer::{CellBuffer, RenderOutcome};
pub use pool::CoordinatePool;
pub use port::{FailMode, MemoryPort, RenderPort, WriteError};
