//! Animation engine module - the defrag state machine
//!
//! Drives the [`tui_defrag_core`] grid state through its cycle:
//!
//! ```text
//! DRAWING ──(region full)──▶ SORTING ──(cursor == capacity)──▶ WAITING
//!    ▲                                                           │
//!    └──────────────────(wait elapsed: wipe + reset)─────────────┘
//! ```
//!
//! Each call to [`AnimationEngine::tick`] performs one step, so the caller
//! (the pulse scheduler) fully controls pacing.
//!
//! # Example
//!
//! ```
//! use std::time::Instant;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use tui_defrag_core::MemoryPort;
//! use tui_defrag_engine::{AnimationEngine, Phase};
//! use tui_defrag_types::{Coord, Region};
//!
//! let region = Region::new(Coord::new(0, 0), 4, 2);
//! let mut engine = AnimationEngine::new(region, StdRng::seed_from_u64(7));
//! let mut port = MemoryPort::new(4, 2);
//!
//! let now = Instant::now();
//! for _ in 0..8 {
//!     engine.tick(now, &mut port);
//! }
//! assert_eq!(engine.buffer().occupancy(), 8);
//! assert_eq!(engine.tick(now, &mut port), Phase::Sorting);
//! ```

pub mod animation;
pub mod plan;

pub use tui_defrag_core as core;
pub use tui_defrag_types as types;

pub use animation::{AnimationEngine, EngineConfig, Phase};
pub use plan::{build_sort_plan, ColorRanks};
